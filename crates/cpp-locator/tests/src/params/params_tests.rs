use super::*;

#[test]
fn splits_simple_parameters() {
    assert_eq!(split_parameters("int32 A, const FString& B"), vec!["int32 A", "const FString& B"]);
}

#[test]
fn empty_list_yields_no_parameters() {
    assert!(split_parameters("").is_empty());
    assert!(split_parameters("   ").is_empty());
}

#[test]
fn template_commas_do_not_split() {
    assert_eq!(
        split_parameters("TMap<FString, int32> Map, float F"),
        vec!["TMap<FString, int32> Map", "float F"]
    );
}

#[test]
fn function_pointer_parameters_stay_whole() {
    assert_eq!(
        split_parameters("int (*Callback)(int, float), bool bEnabled"),
        vec!["int (*Callback)(int, float)", "bool bEnabled"]
    );
}

#[test]
fn braced_default_values_stay_whole() {
    assert_eq!(
        split_parameters("FVector V = {0, 0, 0}, int32 N"),
        vec!["FVector V = {0, 0, 0}", "int32 N"]
    );
}

#[test]
fn commas_inside_string_literals_do_not_split() {
    assert_eq!(
        split_parameters(r#"const TCHAR* Sep = TEXT(","), int32 Limit"#),
        vec![r#"const TCHAR* Sep = TEXT(",")"#, "int32 Limit"]
    );
}

#[test]
fn spaced_less_than_is_not_a_template_open() {
    assert_eq!(split_parameters("bool B = a < b, int C"), vec!["bool B = a < b", "int C"]);
}

#[test]
fn adversarial_spaced_angle_pair_still_splits() {
    // `a <b>(c)` is a comparison chain, and the heuristic reads it as
    // one: the `<` is preceded by a space, so no template opens.
    assert_eq!(split_parameters("T x = a <b>(c), int y"), vec!["T x = a <b>(c)", "int y"]);
}

#[test]
fn adjacent_less_than_is_swallowed_as_template() {
    // Known limitation: `a<b` looks like a template open, so the
    // following comma never splits.
    assert_eq!(split_parameters("bool B = a<b, int C"), vec!["bool B = a<b, int C"]);
}

#[test]
fn nested_templates_balance() {
    assert_eq!(
        split_parameters("TMap<FString, TArray<int32>> Lookup, uint8 Flags"),
        vec!["TMap<FString, TArray<int32>> Lookup", "uint8 Flags"]
    );
}

#[test]
fn unbalanced_input_returns_partial_split() {
    assert_eq!(split_parameters("int a, (unclosed"), vec!["int a", "(unclosed"]);
}
