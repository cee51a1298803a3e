//! Type normalization and comparison.
//!
//! A parameter declaration as it appears in source (`const FString &
//! DisplayName = TEXT("")`) is reduced to a canonical string and then
//! to a [`TypeDescriptor`] so that a declaration and its implementation
//! can be compared without caring about whitespace, parameter names, or
//! default values.

pub mod signature;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::scan::{self, Region};

static CONST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bconst\b").unwrap());
static VOLATILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bvolatile\b").unwrap());

/// Keywords that must never be stripped as a "parameter name": a
/// trailing `int` in `unsigned int` is part of the type.
const TYPE_KEYWORDS: &[&str] = &[
    "const", "volatile", "unsigned", "signed", "int", "char", "short", "long", "float", "double",
    "bool", "wchar_t", "auto", "void",
];

/// Structured summary of a normalized parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub base_type: String,
    pub is_const: bool,
    pub is_volatile: bool,
    pub is_pointer: bool,
    pub is_reference: bool,
}

impl TypeDescriptor {
    /// Field-for-field equivalence.
    pub fn equivalent(
        &self,
        other: &TypeDescriptor,
    ) -> bool {
        self == other
    }

    /// Equivalence that tolerates a `const` difference.
    pub fn equivalent_ignoring_const(
        &self,
        other: &TypeDescriptor,
    ) -> bool {
        self.base_type == other.base_type
            && self.is_volatile == other.is_volatile
            && self.is_pointer == other.is_pointer
            && self.is_reference == other.is_reference
    }
}

/// Canonicalize a raw parameter declaration.
///
/// Strips the default value (everything from a top-level `=`),
/// optionally strips the parameter name, collapses whitespace runs to
/// single spaces, and tightens spaces around `*`, `&`, `<` and `>`.
/// Idempotent: normalizing an already-normalized string is a no-op.
pub fn normalize(
    param: &str,
    strip_default: bool,
    strip_name: bool,
) -> String {
    let mut text = param.trim();

    if strip_default {
        if let Some(pos) = find_top_level_equals(text) {
            text = text[..pos].trim_end();
        }
    }

    if strip_name {
        if let Some(stripped) = strip_parameter_name(text) {
            return tighten_whitespace(&stripped);
        }
    }

    tighten_whitespace(text)
}

/// Parse a normalized type string into its descriptor.
///
/// `const`/`volatile` are detected by whole-word search anywhere in the
/// string; a reference is an un-nested `&` (or trailing `&&`); a
/// pointer is a trailing `*` run outside `<...>`. The base type is the
/// string with those markers, the qualifier keywords, and all
/// whitespace removed.
pub fn parse_descriptor(normalized: &str) -> TypeDescriptor {
    let is_const = CONST_RE.is_match(normalized);
    let is_volatile = VOLATILE_RE.is_match(normalized);

    let mut is_reference = false;
    let mut trailing_stars = 0usize;
    let mut angle_depth = 0i32;
    for ch in normalized.chars() {
        match ch {
            '<' => angle_depth += 1,
            '>' => angle_depth = (angle_depth - 1).max(0),
            '&' if angle_depth == 0 => is_reference = true,
            '*' if angle_depth == 0 => trailing_stars += 1,
            _ if angle_depth == 0 && !ch.is_whitespace() && ch != '&' => trailing_stars = 0,
            _ => {},
        }
    }
    let is_pointer = trailing_stars > 0;

    let mut base = CONST_RE.replace_all(normalized, "").into_owned();
    base = VOLATILE_RE.replace_all(&base, "").into_owned();
    let mut base_type = String::with_capacity(base.len());
    let mut depth = 0i32;
    for ch in base.chars() {
        match ch {
            '<' => {
                depth += 1;
                base_type.push(ch);
            },
            '>' => {
                depth = (depth - 1).max(0);
                base_type.push(ch);
            },
            '*' | '&' if depth == 0 => {},
            c if c.is_whitespace() => {},
            c => base_type.push(c),
        }
    }

    TypeDescriptor {
        base_type,
        is_const,
        is_volatile,
        is_pointer,
        is_reference,
    }
}

/// Compare two raw parameter declarations for type equivalence.
/// Symmetric; `match_const = false` excludes `const` from the
/// comparison.
pub fn types_match(
    a: &str,
    b: &str,
    match_const: bool,
) -> bool {
    let da = parse_descriptor(&normalize(a, true, true));
    let db = parse_descriptor(&normalize(b, true, true));
    if match_const {
        da.equivalent(&db)
    } else {
        da.equivalent_ignoring_const(&db)
    }
}

/// Position of the first `=` at zero nesting depth outside comments and
/// literals — the start of a default-value initializer.
fn find_top_level_equals(text: &str) -> Option<usize> {
    let map = scan::region_map(text, true);
    let mut paren_depth = 0i32;
    let mut brace_depth = 0i32;
    let mut angle_depth = 0i32;
    for (pos, ch) in text.char_indices() {
        if map[pos] != Region::Normal {
            continue;
        }
        let prev = text[..pos].chars().next_back();
        match ch {
            '(' => paren_depth += 1,
            ')' => paren_depth -= 1,
            '{' => brace_depth += 1,
            '}' => brace_depth -= 1,
            '<' if angle_opens(prev) => angle_depth += 1,
            '>' if angle_depth > 0 && prev != Some('-') => angle_depth -= 1,
            '=' if paren_depth == 0 && brace_depth == 0 && angle_depth == 0 => {
                // `==`, `<=`, `>=`, `!=` are operators, not defaults.
                let next = text[pos + 1..].chars().next();
                if next == Some('=') || matches!(prev, Some('=') | Some('<') | Some('>') | Some('!')) {
                    continue;
                }
                return Some(pos);
            },
            _ => {},
        }
    }
    None
}

fn angle_opens(prev: Option<char>) -> bool {
    matches!(prev, Some(c) if scan::is_ident_char(c) || c == '>' || c == ')' || c == ':')
}

/// Remove the trailing parameter name, when one is present.
///
/// The last maximal identifier run at the end of the string is treated
/// as the name only when removing it leaves a non-empty prefix, the
/// character before it can end a type (`space`, `*`, `&`, `>`), and the
/// run is not itself a type keyword.
fn strip_parameter_name(text: &str) -> Option<String> {
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        return None;
    }

    let mut name_start = trimmed.len();
    for (pos, ch) in trimmed.char_indices().rev() {
        if scan::is_ident_char(ch) {
            name_start = pos;
        } else {
            break;
        }
    }
    if name_start == trimmed.len() || name_start == 0 {
        return None;
    }

    let name = &trimmed[name_start..];
    if TYPE_KEYWORDS.contains(&name) {
        return None;
    }

    let prev = trimmed[..name_start].chars().next_back();
    if !matches!(prev, Some(c) if c.is_whitespace() || c == '*' || c == '&' || c == '>') {
        return None;
    }

    let prefix = trimmed[..name_start].trim_end();
    if prefix.is_empty() {
        return None;
    }
    Some(prefix.to_string())
}

/// Collapse whitespace runs to single spaces, dropping spaces directly
/// adjacent to `*`, `&`, `<` or `>`.
fn tighten_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.trim().chars() {
        if ch.is_whitespace() {
            in_space = true;
            continue;
        }
        if in_space {
            let tight_next = matches!(ch, '*' | '&' | '<' | '>');
            let tight_prev = matches!(collapsed.chars().next_back(), Some('*' | '&' | '<' | '>'));
            if !tight_next && !tight_prev {
                collapsed.push(' ');
            }
            in_space = false;
        }
        collapsed.push(ch);
    }
    collapsed
}

#[cfg(test)]
#[path = "../../tests/src/types/types_tests.rs"]
mod tests;
