use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` byte range into a specific document's
/// text.
///
/// Spans produced by the locator never begin or end strictly inside a
/// comment, string literal, or character literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub fn new(
        start: usize,
        end: usize,
    ) -> Self {
        assert!(start <= end, "invalid span: {start}..{end}");
        Self {
            start,
            end,
        }
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn contains(
        self,
        offset: usize,
    ) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Slice `text` to this span. Panics only if the span is out of
    /// bounds for the text it was created against.
    pub fn slice(
        self,
        text: &str,
    ) -> &str {
        &text[self.start..self.end]
    }
}
