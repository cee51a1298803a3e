use super::*;

#[test]
fn needle_inside_comments_and_literals_is_never_found() {
    let text = "// Foo\n/* Foo */\nconst char* s = \"Foo\";\n";
    assert_eq!(find_outside_literals_and_comments(text, "Foo", 0, Direction::Forward), None);
    assert_eq!(
        find_outside_literals_and_comments(text, "Foo", text.len(), Direction::Backward),
        None
    );
}

#[test]
fn needle_in_code_is_found_past_a_comment() {
    let text = "// Foo\nFoo();";
    assert_eq!(find_outside_literals_and_comments(text, "Foo", 0, Direction::Forward), Some(7));
}

#[test]
fn backward_search_returns_last_code_occurrence() {
    let text = "Foo(); // Foo";
    assert_eq!(
        find_outside_literals_and_comments(text, "Foo", text.len(), Direction::Backward),
        Some(0)
    );
}

#[test]
fn escaped_quote_does_not_close_a_string() {
    let text = "const char* s = \"a\\\"Foo\";";
    assert_eq!(find_outside_literals_and_comments(text, "Foo", 0, Direction::Forward), None);
}

#[test]
fn unterminated_block_comment_hides_the_rest_of_the_file() {
    let text = "/* Foo\nFoo();";
    assert_eq!(find_outside_literals_and_comments(text, "Foo", 0, Direction::Forward), None);
}

#[test]
fn block_comment_closes_and_code_resumes() {
    let text = "/* x */ Foo();";
    assert_eq!(find_outside_literals_and_comments(text, "Foo", 0, Direction::Forward), Some(8));
}

#[test]
fn forward_search_respects_the_from_position() {
    let text = "Foo(); Foo();";
    assert_eq!(find_outside_literals_and_comments(text, "Foo", 1, Direction::Forward), Some(7));
}

#[test]
fn bracket_match_skips_parens_inside_strings() {
    let text = "foo(a, (b), \"c)\")";
    let open = 3;
    assert_eq!(find_matching_bracket(text, open, '(', ')', true), Some(text.len() - 1));
}

#[test]
fn bracket_match_skips_close_paren_in_char_literal() {
    let text = "f(')')";
    assert_eq!(find_matching_bracket(text, 1, '(', ')', true), Some(5));
}

#[test]
fn bracket_match_survives_digit_separators_when_char_literals_are_off() {
    let text = "idx(1'000'000)";
    assert_eq!(find_matching_bracket(text, 3, '(', ')', false), Some(text.len() - 1));
}

#[test]
fn unbalanced_bracket_yields_none() {
    assert_eq!(find_matching_bracket("f(a, (b)", 1, '(', ')', true), None);
}

#[test]
fn bracket_match_requires_the_open_char_at_position() {
    assert_eq!(find_matching_bracket("f(a)", 0, '(', ')', true), None);
}

#[test]
fn backward_bracket_match_crosses_a_comment() {
    let text = "( /* ) */ x )";
    let close = text.len() - 1;
    assert_eq!(find_matching_bracket_backward(text, close, '(', ')', true), Some(0));
}

#[test]
fn region_at_classifies_block_comments() {
    let text = "a /* b */ c";
    assert_eq!(region_at(text, 5), Region::BlockComment);
    assert_eq!(region_at(text, 0), Region::Normal);
    assert_eq!(region_at(text, text.len() - 1), Region::Normal);
}

#[test]
fn line_comment_ends_at_newline() {
    let text = "a // b\nc";
    assert_eq!(region_at(text, 5), Region::LineComment);
    assert_eq!(region_at(text, 7), Region::Normal);
}
