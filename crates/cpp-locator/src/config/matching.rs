use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

pub const MIN_LOOKBACK_LINES: usize = 1;
pub const MAX_LOOKBACK_LINES: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchingSettings {
    /// Annotation macro required above declarations (`UFUNCTION` in
    /// Unreal-style codebases).
    pub annotation_macro: String,
    /// How many lines above a candidate to scan for the annotation
    /// macro before giving up.
    pub max_lookback_lines: usize,
    /// Whether a declaration read requires the annotation macro at all.
    pub require_annotation_macro: bool,
    /// Re-run the type-match pass ignoring `const` on by-reference
    /// parameters when the strict pass eliminates every candidate.
    pub relax_const_on_reference: bool,
    /// When a class-scoped implementation search matches nothing, fall
    /// back to the unscoped candidate set instead of failing.
    pub fallback_to_unscoped: bool,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            annotation_macro: "UFUNCTION".to_string(),
            max_lookback_lines: 20,
            require_annotation_macro: true,
            relax_const_on_reference: true,
            fallback_to_unscoped: true,
        }
    }
}

impl MatchingSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: MatchingSettingsPatch,
    ) {
        if let Some(v) = patch.annotation_macro {
            self.annotation_macro = v;
        }
        if let Some(v) = patch.max_lookback_lines {
            self.max_lookback_lines = v;
        }
        if let Some(v) = patch.require_annotation_macro {
            self.require_annotation_macro = v;
        }
        if let Some(v) = patch.relax_const_on_reference {
            self.relax_const_on_reference = v;
        }
        if let Some(v) = patch.fallback_to_unscoped {
            self.fallback_to_unscoped = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.max_lookback_lines = self.max_lookback_lines.clamp(MIN_LOOKBACK_LINES, MAX_LOOKBACK_LINES);
        self.annotation_macro = self.annotation_macro.trim().to_string();
        if self.annotation_macro.is_empty() {
            self.require_annotation_macro = false;
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct MatchingSettingsPatch {
    pub(crate) annotation_macro: Option<String>,
    pub(crate) max_lookback_lines: Option<usize>,
    pub(crate) require_annotation_macro: Option<bool>,
    pub(crate) relax_const_on_reference: Option<bool>,
    pub(crate) fallback_to_unscoped: Option<bool>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
