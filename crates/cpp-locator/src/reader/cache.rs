//! Bounded keyed record cache.
//!
//! Records are keyed by `(class, function, signature hash, kind)` so
//! concurrent multi-function sessions never see a stale hit from a
//! different target. When full, the least recently touched entry is
//! evicted.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::reader::records::{DeclarationRecord, ImplementationRecord};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct RecordKey {
    pub class_name: Option<String>,
    pub function_name: String,
    pub signature_hash: u64,
    pub kind: RecordKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum RecordKind {
    Declaration,
    Implementation,
}

#[derive(Debug, Clone)]
pub(crate) enum CachedRecord {
    Declaration(DeclarationRecord),
    Implementation(ImplementationRecord),
}

#[derive(Debug)]
struct Entry {
    record: CachedRecord,
    last_used: u64,
}

#[derive(Debug)]
pub(crate) struct RecordCache {
    entries: DashMap<RecordKey, Entry>,
    capacity: usize,
    tick: AtomicU64,
}

impl RecordCache {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: capacity.max(1),
            tick: AtomicU64::new(0),
        }
    }

    pub(crate) fn get(
        &self,
        key: &RecordKey,
    ) -> Option<CachedRecord> {
        let mut entry = self.entries.get_mut(key)?;
        entry.last_used = self.tick.fetch_add(1, Ordering::Relaxed);
        Some(entry.record.clone())
    }

    pub(crate) fn insert(
        &self,
        key: RecordKey,
        record: CachedRecord,
    ) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_least_recent();
        }
        let last_used = self.tick.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(key, Entry {
            record,
            last_used,
        });
    }

    pub(crate) fn invalidate(
        &self,
        key: &RecordKey,
    ) {
        self.entries.remove(key);
    }

    pub(crate) fn clear(&self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn evict_least_recent(&self) {
        let oldest =
            self.entries.iter().min_by_key(|e| e.value().last_used).map(|e| e.key().clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/reader/cache_tests.rs"]
mod tests;
