use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct BackupSettings {
    /// Suffix appended to the original path for the pre-write backup
    /// copy.
    pub suffix: String,
}

impl Default for BackupSettings {
    fn default() -> Self {
        Self {
            suffix: ".backup".to_string(),
        }
    }
}

impl BackupSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: BackupSettingsPatch,
    ) {
        if let Some(v) = patch.suffix {
            self.suffix = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        let trimmed = self.suffix.trim();
        self.suffix = if trimmed.is_empty() {
            ".backup".to_string()
        } else if trimmed.starts_with('.') {
            trimmed.to_string()
        } else {
            format!(".{trimmed}")
        };
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct BackupSettingsPatch {
    pub(crate) suffix: Option<String>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
