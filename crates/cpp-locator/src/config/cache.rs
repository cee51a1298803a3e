use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

pub const MIN_CACHE_CAPACITY: usize = 1;
pub const MAX_CACHE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Maximum number of cached records held by a reader.
    pub capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: 16,
        }
    }
}

impl CacheSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: CacheSettingsPatch,
    ) {
        if let Some(v) = patch.capacity {
            self.capacity = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.capacity = self.capacity.clamp(MIN_CACHE_CAPACITY, MAX_CACHE_CAPACITY);
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct CacheSettingsPatch {
    pub(crate) capacity: Option<usize>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
