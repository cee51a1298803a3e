//! Parameter-list splitting.

use tracing::warn;

use crate::scan::{self, Region};

/// Split the raw text between a function's outermost parentheses into
/// its top-level parameter declarations.
///
/// Commas split only at zero nesting depth for `()`, `{}` and
/// (heuristically) `<>`, and only in plain code — commas inside string
/// literals or comments are passed through verbatim. Segments are
/// trimmed; empty segments are dropped. Unbalanced nesting at
/// end-of-input is logged and whatever was segmented so far is
/// returned.
pub fn split_parameters(param_list: &str) -> Vec<String> {
    let map = scan::region_map(param_list, true);

    let mut segments = Vec::new();
    let mut segment_start = 0usize;
    let mut paren_depth = 0i32;
    let mut brace_depth = 0i32;
    let mut angle_depth = 0i32;

    for (pos, ch) in param_list.char_indices() {
        if map[pos] != Region::Normal {
            continue;
        }
        let prev = param_list[..pos].chars().next_back();
        match ch {
            '(' => paren_depth += 1,
            ')' => paren_depth -= 1,
            '{' => brace_depth += 1,
            '}' => brace_depth -= 1,
            '<' if angle_opens_template(prev) => angle_depth += 1,
            '>' if angle_depth > 0 && prev != Some('-') => angle_depth -= 1,
            ',' if paren_depth == 0 && brace_depth == 0 && angle_depth == 0 => {
                push_segment(&mut segments, &param_list[segment_start..pos]);
                segment_start = pos + 1;
            },
            _ => {},
        }
    }
    push_segment(&mut segments, &param_list[segment_start..]);

    if paren_depth != 0 || brace_depth != 0 {
        warn!(
            "[params] unbalanced nesting in parameter list (paren {paren_depth}, brace {brace_depth}); returning partial split"
        );
    }

    segments
}

/// Template-open heuristic: `<` opens a template argument list only
/// when the character immediately before it could end a type name that
/// a template attaches to. `a < b` stays a comparison; `TMap<...>`
/// nests. Known to misread unusual formatting such as `a <b>(c)`.
fn angle_opens_template(prev: Option<char>) -> bool {
    match prev {
        Some(c) => scan::is_ident_char(c) || c == '>' || c == ')' || c == ':',
        None => false,
    }
}

fn push_segment(
    segments: &mut Vec<String>,
    raw: &str,
) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
}

#[cfg(test)]
#[path = "../../tests/src/params/params_tests.rs"]
mod tests;
