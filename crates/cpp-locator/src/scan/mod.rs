//! Context-aware character scanning.
//!
//! Everything above this module (parameter splitting, candidate
//! filtering, span extension) relies on being able to ask "is this
//! position real code, or is it inside a comment or a literal?". The
//! answer comes from a small state machine replayed over the text; no
//! AST is ever built.

use serde::{Deserialize, Serialize};

/// Scan direction for [`find_outside_literals_and_comments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Classification of a single byte of source text.
///
/// The opening and closing delimiters of a region (the `//`, the
/// quotes, the `/*` and `*/`) are classified as part of that region, so
/// a span that starts or ends on a delimiter is never mistaken for
/// plain code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    Normal,
    LineComment,
    BlockComment,
    DoubleQuoted,
    SingleQuoted,
}

impl Region {
    pub fn is_comment(self) -> bool {
        matches!(self, Region::LineComment | Region::BlockComment)
    }

    pub fn is_literal(self) -> bool {
        matches!(self, Region::DoubleQuoted | Region::SingleQuoted)
    }
}

/// Classify every byte of `text`.
///
/// `track_char_literals` controls whether `'` opens a character-literal
/// region. Callers scanning code that may contain C++14 digit
/// separators (`1'000'000`) disable it, since a lone `'` would
/// otherwise swallow the rest of the line.
pub(crate) fn region_map(
    text: &str,
    track_char_literals: bool,
) -> Vec<Region> {
    let mut map = vec![Region::Normal; text.len()];
    let mut state = Region::Normal;
    let mut escape_next = false;

    let mut chars = text.char_indices().peekable();
    while let Some((pos, ch)) = chars.next() {
        let next = chars.peek().map(|&(_, c)| c);
        match state {
            Region::Normal => match ch {
                '/' if next == Some('/') => {
                    state = Region::LineComment;
                    mark(&mut map, pos, 2, state);
                    chars.next();
                },
                '/' if next == Some('*') => {
                    state = Region::BlockComment;
                    mark(&mut map, pos, 2, state);
                    chars.next();
                },
                '"' => {
                    state = Region::DoubleQuoted;
                    map[pos] = state;
                },
                '\'' if track_char_literals => {
                    state = Region::SingleQuoted;
                    map[pos] = state;
                },
                _ => {},
            },
            Region::LineComment => {
                if ch == '\n' {
                    state = Region::Normal;
                } else {
                    map[pos] = Region::LineComment;
                }
            },
            Region::BlockComment => {
                if ch == '*' && next == Some('/') {
                    mark(&mut map, pos, 2, Region::BlockComment);
                    state = Region::Normal;
                    chars.next();
                } else {
                    mark(&mut map, pos, ch.len_utf8(), Region::BlockComment);
                }
            },
            Region::DoubleQuoted | Region::SingleQuoted => {
                mark(&mut map, pos, ch.len_utf8(), state);
                if escape_next {
                    escape_next = false;
                } else if ch == '\\' {
                    escape_next = true;
                } else if (state == Region::DoubleQuoted && ch == '"')
                    || (state == Region::SingleQuoted && ch == '\'')
                {
                    state = Region::Normal;
                }
            },
        }
    }

    map
}

fn mark(
    map: &mut [Region],
    pos: usize,
    len: usize,
    region: Region,
) {
    let end = (pos + len).min(map.len());
    for slot in &mut map[pos..end] {
        *slot = region;
    }
}

/// Classification of the byte at `pos` (Normal past end-of-text).
pub fn region_at(
    text: &str,
    pos: usize,
) -> Region {
    let map = region_map(text, true);
    map.get(pos).copied().unwrap_or(Region::Normal)
}

/// Find the nearest occurrence of `needle` from `from` (inclusive) in
/// the given direction that lies entirely in plain code — never inside
/// a comment, string literal, or character literal.
pub fn find_outside_literals_and_comments(
    text: &str,
    needle: &str,
    from: usize,
    direction: Direction,
) -> Option<usize> {
    if needle.is_empty() || needle.len() > text.len() {
        return None;
    }
    let from = clamp_to_char_boundary(text, from);
    let map = region_map(text, true);

    let all_normal =
        |pos: usize| map[pos..pos + needle.len()].iter().all(|r| *r == Region::Normal);

    match direction {
        Direction::Forward => text[from..]
            .match_indices(needle)
            .map(|(offset, _)| from + offset)
            .find(|&pos| all_normal(pos)),
        Direction::Backward => text
            .match_indices(needle)
            .map(|(pos, _)| pos)
            .take_while(|&pos| pos <= from)
            .filter(|&pos| all_normal(pos))
            .last(),
    }
}

/// Find the position of the bracket matching the one at `open_pos`,
/// scanning forward. Starts at depth 1 and counts `open_char` /
/// `close_char` only in plain code; returns the position where the
/// depth reaches zero, or `None` when the text runs out first.
pub fn find_matching_bracket(
    text: &str,
    open_pos: usize,
    open_char: char,
    close_char: char,
    include_char_literals: bool,
) -> Option<usize> {
    if text[open_pos..].chars().next() != Some(open_char) {
        return None;
    }
    let map = region_map(text, include_char_literals);
    let mut depth = 1usize;
    for (offset, ch) in text[open_pos + open_char.len_utf8()..].char_indices() {
        let pos = open_pos + open_char.len_utf8() + offset;
        if map[pos] != Region::Normal {
            continue;
        }
        if ch == open_char {
            depth += 1;
        } else if ch == close_char {
            depth -= 1;
            if depth == 0 {
                return Some(pos);
            }
        }
    }
    None
}

/// Backward companion of [`find_matching_bracket`]: given the position
/// of a `close_char`, find its matching `open_char` earlier in the
/// text.
pub fn find_matching_bracket_backward(
    text: &str,
    close_pos: usize,
    open_char: char,
    close_char: char,
    include_char_literals: bool,
) -> Option<usize> {
    if text[close_pos..].chars().next() != Some(close_char) {
        return None;
    }
    let map = region_map(text, include_char_literals);
    let mut depth = 1usize;
    for (pos, ch) in text[..close_pos].char_indices().rev() {
        if map[pos] != Region::Normal {
            continue;
        }
        if ch == close_char {
            depth += 1;
        } else if ch == open_char {
            depth -= 1;
            if depth == 0 {
                return Some(pos);
            }
        }
    }
    None
}

pub(crate) fn is_ident_char(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}

pub(crate) fn clamp_to_char_boundary(
    text: &str,
    pos: usize,
) -> usize {
    let mut pos = pos.min(text.len());
    while pos > 0 && !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

#[cfg(test)]
#[path = "../../tests/src/scan/scan_tests.rs"]
mod tests;
