//! Declarative configuration system.
//!
//! Settings are split into one file per category. [`LocatorSettings`]
//! aggregates all categories and handles JSON deserialization from
//! host-supplied payloads, with an optional `cpp-locator.toml`
//! discovered by walking parent directories.

pub(crate) mod backup;
pub(crate) mod cache;
pub(crate) mod logging;
pub(crate) mod matching;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use backup::BackupSettingsPatch;
pub use backup::BackupSettings;
use cache::CacheSettingsPatch;
pub use cache::{CacheSettings, MAX_CACHE_CAPACITY, MIN_CACHE_CAPACITY};
use logging::LoggingSettingsPatch;
pub use logging::{LogLevel, LoggingSettings};
use matching::MatchingSettingsPatch;
pub use matching::{MAX_LOOKBACK_LINES, MIN_LOOKBACK_LINES, MatchingSettings};
use serde::Deserialize;
use serde_json::Value;

pub const SETTINGS_SECTION_KEY: &str = "cpp-locator";
const SETTINGS_TOML_FILENAME: &str = "cpp-locator.toml";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocatorSettings {
    pub matching: MatchingSettings,
    pub cache: CacheSettings,
    pub backup: BackupSettings,
    pub logging: LoggingSettings,
}

impl LocatorSettings {
    /// Build settings from an optional host JSON payload, starting
    /// from defaults.
    pub fn from_host_payload(payload: Option<&Value>) -> Self {
        let mut settings = Self::default();
        if let Some(payload) = payload {
            settings = settings.merged_with_payload(payload);
        }
        settings
    }

    pub fn merged_with_payload(
        &self,
        payload: &Value,
    ) -> Self {
        let mut merged = self.clone();

        for candidate in payload_candidates(payload) {
            if let Ok(patch) = serde_json::from_value::<LocatorSettingsPatch>(candidate.clone()) {
                merged.apply_patch(patch);
            }
        }

        merged.normalize();
        merged
    }

    /// Walk parent directories from `start` looking for
    /// `cpp-locator.toml` and merge it over `self` when found.
    pub fn merged_with_discovered_toml(
        &self,
        start: &Path,
    ) -> Self {
        let Some(path) = find_settings_toml(start) else {
            return self.clone();
        };
        self.merged_with_toml_file(&path)
    }

    pub fn merged_with_toml_file(
        &self,
        path: &Path,
    ) -> Self {
        let mut merged = self.clone();
        if let Some(patch) = load_toml_patch(path) {
            merged.apply_patch(patch);
        }
        merged.normalize();
        merged
    }

    fn apply_patch(
        &mut self,
        patch: LocatorSettingsPatch,
    ) {
        if let Some(p) = patch.matching {
            self.matching.apply_patch(p);
        }
        if let Some(p) = patch.cache {
            self.cache.apply_patch(p);
        }
        if let Some(p) = patch.backup {
            self.backup.apply_patch(p);
        }
        if let Some(p) = patch.logging {
            self.logging.apply_patch(p);
        }
    }

    fn normalize(&mut self) {
        self.matching.normalize();
        self.cache.normalize();
        self.backup.normalize();
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct LocatorSettingsPatch {
    matching: Option<MatchingSettingsPatch>,
    cache: Option<CacheSettingsPatch>,
    backup: Option<BackupSettingsPatch>,
    logging: Option<LoggingSettingsPatch>,
    #[serde(flatten)]
    _extra: HashMap<String, Value>,
}

fn payload_candidates(payload: &Value) -> Vec<Value> {
    let mut candidates = Vec::new();
    candidates.push(payload.clone());
    if let Some(scoped) = payload.get(SETTINGS_SECTION_KEY) {
        candidates.push(scoped.clone());
    }
    candidates
}

/// Walks parent directories from `start` looking for
/// `cpp-locator.toml`. Returns the first one found, or `None`.
pub fn find_settings_toml(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_file() {
        start.parent()?
    } else {
        start
    };
    loop {
        let candidate = dir.join(SETTINGS_TOML_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

fn load_toml_patch(path: &Path) -> Option<LocatorSettingsPatch> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str::<LocatorSettingsPatch>(&content).ok()
}

#[cfg(test)]
#[path = "../../tests/src/config/settings_tests.rs"]
mod tests;
