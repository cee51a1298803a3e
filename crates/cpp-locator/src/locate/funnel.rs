//! The five-stage candidate funnel.
//!
//! 1. name occurrences on identifier boundaries
//! 2. comment / literal exclusion
//! 3. annotation-macro or class-scope gate
//! 4. parameter count + type match (strict, then const-relaxed)
//! 5. uniqueness gate and span extension

use tracing::debug;

use crate::config::MatchingSettings;
use crate::locate::{Located, LocateError};
use crate::params;
use crate::scan::{self, Region};
use crate::span::SourceSpan;
use crate::types;
use crate::types::signature::ParameterSignature;

pub(crate) struct FunnelInput<'a> {
    pub text: &'a str,
    pub function_name: &'a str,
    pub expected: &'a ParameterSignature,
    pub class_hint: Option<&'a str>,
    pub require_annotation_macro: bool,
    pub settings: &'a MatchingSettings,
}

pub(crate) fn run(input: FunnelInput<'_>) -> Result<Located, LocateError> {
    let FunnelInput {
        text,
        function_name,
        expected,
        class_hint,
        require_annotation_macro,
        settings,
    } = input;

    let no_match = || LocateError::NoMatch {
        function: function_name.to_string(),
    };
    if function_name.is_empty() {
        return Err(no_match());
    }

    let regions = scan::region_map(text, true);

    // Stage 1: literal name occurrences on identifier boundaries.
    let candidates = name_candidates(text, function_name);
    debug!("[locate] '{function_name}' stage 1: {} name occurrences", candidates.len());
    if candidates.is_empty() {
        return Err(no_match());
    }

    // Stage 2: drop occurrences inside comments or literals.
    let candidates: Vec<usize> = candidates
        .into_iter()
        .filter(|&pos| regions[pos..pos + function_name.len()].iter().all(|r| *r == Region::Normal))
        .collect();
    debug!("[locate] '{function_name}' stage 2: {} outside comments/literals", candidates.len());
    if candidates.is_empty() {
        return Err(no_match());
    }

    // Stage 3: macro gate (declarations) or scope gate (implementations).
    let candidates = if require_annotation_macro && !settings.annotation_macro.is_empty() {
        let gated: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&pos| {
                attached_annotation(text, &regions, pos, &settings.annotation_macro, settings.max_lookback_lines)
                    .is_some()
            })
            .collect();
        debug!("[locate] '{function_name}' stage 3: {} with {} attached", gated.len(), settings.annotation_macro);
        gated
    } else if let Some(class_name) = class_hint {
        let scoped: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&pos| has_class_scope_prefix(text, &regions, pos, class_name))
            .collect();
        debug!("[locate] '{function_name}' stage 3: {} behind {class_name}::", scoped.len());
        if scoped.is_empty() && settings.fallback_to_unscoped {
            debug!("[locate] '{function_name}' stage 3: scope gate empty, falling back to unscoped set");
            candidates
        } else {
            scoped
        }
    } else {
        candidates
    };
    if candidates.is_empty() {
        return Err(no_match());
    }

    // Stage 4: parameter count + type match. Strict first; when that
    // eliminates everyone, retry ignoring const on by-reference
    // parameters (tolerates cosmetic drift between a declaration and
    // its implementation).
    let with_params: Vec<(usize, Vec<String>, SourceSpan)> = candidates
        .iter()
        .filter_map(|&pos| {
            let (param_texts, paren_span) = extract_parameter_texts(text, &regions, pos + function_name.len())?;
            Some((pos, param_texts, paren_span))
        })
        .collect();

    let strict: Vec<&(usize, Vec<String>, SourceSpan)> =
        with_params.iter().filter(|(_, texts, _)| signature_matches(texts, expected, false)).collect();
    let survivors = if strict.is_empty() && settings.relax_const_on_reference {
        let relaxed: Vec<&(usize, Vec<String>, SourceSpan)> =
            with_params.iter().filter(|(_, texts, _)| signature_matches(texts, expected, true)).collect();
        debug!("[locate] '{function_name}' stage 4: 0 strict, {} const-relaxed", relaxed.len());
        relaxed
    } else {
        debug!("[locate] '{function_name}' stage 4: {} strict", strict.len());
        strict
    };

    // Stage 5: exactly one survivor, span extended to its terminator.
    match survivors.as_slice() {
        [] => Err(no_match()),
        [(pos, _, paren_span)] => {
            extend_to_terminator(text, &regions, *pos, *paren_span).ok_or_else(no_match)
        },
        many => Err(LocateError::AmbiguousMatch {
            function: function_name.to_string(),
            count: many.len(),
        }),
    }
}

/// Stage 1: occurrences of `name` where the character before is absent,
/// whitespace, or `:`, and the character after is absent, whitespace,
/// or `(`.
fn name_candidates(
    text: &str,
    name: &str,
) -> Vec<usize> {
    text.match_indices(name)
        .filter(|&(pos, _)| {
            let prev = text[..pos].chars().next_back();
            let next = text[pos + name.len()..].chars().next();
            let prev_ok = matches!(prev, None | Some(':')) || prev.is_some_and(char::is_whitespace);
            let next_ok = matches!(next, None | Some('(')) || next.is_some_and(char::is_whitespace);
            prev_ok && next_ok
        })
        .map(|(pos, _)| pos)
        .collect()
}

/// Stage 3, declaration mode: scan backward line-by-line (bounded) for
/// an annotation macro invocation attached to this candidate. A
/// statement terminator (`;` or `}`) after the macro means the macro
/// belongs to a previous declaration, so the candidate is rejected.
///
/// Returns the byte positions of the macro name and its closing paren
/// when one is attached.
pub(crate) fn attached_annotation(
    text: &str,
    regions: &[Region],
    candidate: usize,
    macro_name: &str,
    max_lookback_lines: usize,
) -> Option<(usize, usize)> {
    let mut window_start = line_start(text, candidate);
    for _ in 0..max_lookback_lines {
        if window_start == 0 {
            break;
        }
        window_start = line_start(text, window_start - 1);
    }

    let window = &text[window_start..candidate];
    let mut last_macro: Option<(usize, usize)> = None;
    let mut search_from = 0usize;
    while let Some(offset) = window[search_from..].find(macro_name) {
        let pos = window_start + search_from + offset;
        search_from += offset + macro_name.len();
        if regions[pos] != Region::Normal {
            continue;
        }
        let prev = text[..pos].chars().next_back();
        if prev.is_some_and(scan::is_ident_char) {
            continue;
        }
        let after = pos + macro_name.len();
        let Some(open) = next_code_char(text, regions, after) else {
            continue;
        };
        if text[open..].chars().next() != Some('(') {
            continue;
        }
        let Some(close) = scan::find_matching_bracket(text, open, '(', ')', true) else {
            continue;
        };
        if close < candidate {
            last_macro = Some((pos, close));
        }
    }

    let (macro_pos, macro_end) = last_macro?;

    // Any terminator between the macro and the candidate disqualifies.
    let clean = !text[macro_end..candidate]
        .char_indices()
        .any(|(offset, ch)| (ch == ';' || ch == '}') && regions[macro_end + offset] == Region::Normal);
    clean.then_some((macro_pos, macro_end))
}

/// Stage 3, implementation mode: require `Class ::` immediately before
/// the candidate, outside comments and literals.
fn has_class_scope_prefix(
    text: &str,
    regions: &[Region],
    candidate: usize,
    class_name: &str,
) -> bool {
    let mut pos = prev_code_char(text, regions, candidate);
    for _ in 0..2 {
        match pos {
            Some(p) if text[p..].starts_with(':') => pos = prev_code_char(text, regions, p),
            _ => return false,
        }
    }
    let Some(ident_end_char) = pos else {
        return false;
    };
    let ident_end = ident_end_char + text[ident_end_char..].chars().next().map_or(0, char::len_utf8);
    let mut ident_start = ident_end_char;
    while ident_start > 0 {
        let Some(prev) = text[..ident_start].chars().next_back() else {
            break;
        };
        if scan::is_ident_char(prev) {
            ident_start -= prev.len_utf8();
        } else {
            break;
        }
    }
    let ident = &text[ident_start..ident_end];
    ident == class_name && scan::is_ident_char(text[ident_start..].chars().next().unwrap_or(' '))
}

/// Stage 4 extraction: the candidate's parameter-list text between its
/// outermost parentheses.
fn extract_parameter_texts(
    text: &str,
    regions: &[Region],
    name_end: usize,
) -> Option<(Vec<String>, SourceSpan)> {
    let open = next_code_char(text, regions, name_end)?;
    if text[open..].chars().next() != Some('(') {
        return None;
    }
    let close = scan::find_matching_bracket(text, open, '(', ')', true)?;
    let inner = &text[open + 1..close];
    Some((params::split_parameters(inner), SourceSpan::new(open, close + 1)))
}

fn signature_matches(
    param_texts: &[String],
    expected: &ParameterSignature,
    relax_const_on_reference: bool,
) -> bool {
    if param_texts.len() != expected.len() {
        return false;
    }
    param_texts.iter().zip(expected.params()).all(|(raw, exp)| {
        let match_const = !(relax_const_on_reference && exp.by_reference);
        types::types_match(raw, &exp.normalized, match_const)
    })
}

/// Stage 5 span extension: from the close paren forward to the
/// terminating `;`, or to the matching `}` when an opening `{` appears
/// first (an inline body). Also detects a trailing `const` qualifier.
fn extend_to_terminator(
    text: &str,
    regions: &[Region],
    name_pos: usize,
    paren_span: SourceSpan,
) -> Option<Located> {
    let tail_start = paren_span.end;
    let mut is_const = false;
    let mut word = String::new();

    for (offset, ch) in text[tail_start..].char_indices() {
        let pos = tail_start + offset;
        if regions[pos] != Region::Normal {
            word.clear();
            continue;
        }
        if scan::is_ident_char(ch) {
            word.push(ch);
            continue;
        }
        if word == "const" {
            is_const = true;
        }
        word.clear();
        match ch {
            ';' => {
                return Some(Located {
                    name_pos,
                    span: SourceSpan::new(name_pos, pos + 1),
                    param_list_span: paren_span,
                    is_const,
                    has_inline_body: false,
                });
            },
            '{' => {
                let close = scan::find_matching_bracket(text, pos, '{', '}', true)?;
                return Some(Located {
                    name_pos,
                    span: SourceSpan::new(name_pos, close + 1),
                    param_list_span: paren_span,
                    is_const,
                    has_inline_body: true,
                });
            },
            _ => {},
        }
    }
    None
}

// ── small scanning helpers ──────────────────────────────────────────────────

fn line_start(
    text: &str,
    pos: usize,
) -> usize {
    text[..pos].rfind('\n').map(|p| p + 1).unwrap_or(0)
}

/// Position of the next non-whitespace character at or after `from`
/// that is plain code.
fn next_code_char(
    text: &str,
    regions: &[Region],
    from: usize,
) -> Option<usize> {
    text[from..]
        .char_indices()
        .map(|(offset, ch)| (from + offset, ch))
        .find(|&(pos, ch)| !ch.is_whitespace() && regions[pos] == Region::Normal)
        .map(|(pos, _)| pos)
}

/// Position of the previous non-whitespace character before `before`
/// that is plain code.
fn prev_code_char(
    text: &str,
    regions: &[Region],
    before: usize,
) -> Option<usize> {
    text[..before]
        .char_indices()
        .rev()
        .find(|&(pos, ch)| !ch.is_whitespace() && regions[pos] == Region::Normal)
        .map(|(pos, _)| pos)
}
