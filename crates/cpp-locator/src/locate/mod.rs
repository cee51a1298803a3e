//! Candidate location.
//!
//! Narrows every textual occurrence of a function name down to exactly
//! one true declaration or implementation site through a five-stage
//! filter funnel. The funnel never guesses: zero survivors and multiple
//! survivors are both hard errors.

mod funnel;

use std::fmt::{Display, Formatter};

pub(crate) use funnel::{FunnelInput, attached_annotation};

use crate::config::MatchingSettings;
use crate::span::SourceSpan;
use crate::types::signature::ParameterSignature;

/// A uniquely located function occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// Byte position of the function name itself.
    pub name_pos: usize,
    /// Name through terminating `;`, or through the matching `}` when
    /// an inline body is attached.
    pub span: SourceSpan,
    /// The parenthesized parameter list, including both parentheses.
    pub param_list_span: SourceSpan,
    /// Trailing `const` qualifier on the parameter list.
    pub is_const: bool,
    /// Whether the span ends at an inline `{ ... }` body rather than a
    /// `;`.
    pub has_inline_body: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    /// The file could not be read at all.
    NotFound {
        path: String,
        reason: String,
    },
    /// The funnel eliminated every candidate.
    NoMatch {
        function: String,
    },
    /// More than one candidate survived; the caller must not guess.
    AmbiguousMatch {
        function: String,
        count: usize,
    },
}

impl Display for LocateError {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::NotFound {
                path,
                reason,
            } => {
                write!(f, "cannot read {path}: {reason}")
            },
            Self::NoMatch {
                function,
            } => {
                write!(f, "no unambiguous occurrence of '{function}' found")
            },
            Self::AmbiguousMatch {
                function,
                count,
            } => {
                write!(f, "'{function}' matched {count} candidate sites; refusing to guess")
            },
        }
    }
}

impl std::error::Error for LocateError {}

/// Run the five-stage funnel over `text`.
///
/// `require_annotation_macro` selects declaration mode (candidates must
/// carry the configured annotation macro within the lookback window);
/// otherwise a `class_hint` selects implementation mode (candidates
/// must sit behind a `Class::` scope operator, falling back to the
/// unscoped set when configured and nothing passes).
pub fn locate(
    text: &str,
    function_name: &str,
    expected: &ParameterSignature,
    class_hint: Option<&str>,
    require_annotation_macro: bool,
    settings: &MatchingSettings,
) -> Result<Located, LocateError> {
    funnel::run(FunnelInput {
        text,
        function_name,
        expected,
        class_hint,
        require_annotation_macro,
        settings,
    })
}

#[cfg(test)]
#[path = "../../tests/src/locate/locate_tests.rs"]
mod tests;
