// User lists (favorites, recent, notes, bookmarks, viewed) and settings.
//
// Every list is an independent JSON value under its own storage key; there are
// no cross-list constraints. Each operation is a read-modify-write against the
// store, so callers see the persisted state immediately.
pub mod bookmarks;
pub mod favorites;
pub mod notes;
pub mod recent;
pub mod settings;
pub mod stats;
pub mod viewed;

use crate::context::AppContext;
use crate::storage::{
    BOOKMARKS_KEY, FAVORITES_KEY, FileStore, KeyValueStore, MemoryStore, NOTES_KEY, RECENT_KEY,
    SETTINGS_KEY, VIEWED_KEY,
};
use anyhow::Result;
use serde_json::{Map, Value};
use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

pub use settings::{FontSize, Settings, SettingsPatch, Theme};
pub use stats::Statistics;

pub const ALL_KEYS: &[&str] = &[
    FAVORITES_KEY,
    RECENT_KEY,
    SETTINGS_KEY,
    NOTES_KEY,
    BOOKMARKS_KEY,
    VIEWED_KEY,
];

/// Source of "now" for bookmark and history timestamps (epoch milliseconds).
pub trait Clock: Send + Sync + Debug {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for tests.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self(AtomicI64::new(start))
    }

    pub fn advance(&self, millis: i64) {
        self.0.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct Library {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl Library {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// File-backed library under the context's data directory.
    pub fn open(ctx: &dyn AppContext) -> Result<Self> {
        let store = FileStore::new(ctx)?;
        log::debug!("Opened store at {}", store.dir().display());
        Ok(Self::new(Arc::new(store), Arc::new(SystemClock)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock))
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub(crate) fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Snapshot of every list as one JSON object keyed by storage key.
    pub fn export(&self) -> Result<Value> {
        let mut out = Map::new();
        for key in ALL_KEYS {
            if let Some(raw) = self.store.get_item(key)? {
                match serde_json::from_str::<Value>(&raw) {
                    Ok(v) => {
                        out.insert((*key).to_string(), v);
                    }
                    Err(e) => log::warn!("Skipping unreadable {} in export: {}", key, e),
                }
            }
        }
        Ok(Value::Object(out))
    }

    /// Restores an `export` snapshot. Unknown keys are ignored; lists missing
    /// from the snapshot are left untouched. Returns the number of keys written.
    pub fn import(&self, snapshot: &Value) -> Result<usize> {
        let obj = snapshot
            .as_object()
            .ok_or_else(|| anyhow::anyhow!("Backup must be a JSON object"))?;
        let mut written = 0;
        for key in ALL_KEYS {
            if let Some(v) = obj.get(*key) {
                self.store.set_item(key, &serde_json::to_string(v)?)?;
                written += 1;
            }
        }
        log::info!("Imported {} lists from backup", written);
        Ok(written)
    }
}

#[cfg(test)]
pub(crate) fn test_library() -> (Library, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let lib = Library::new(Arc::new(MemoryStore::new()), clock.clone());
    (lib, clock)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_import_roundtrip_between_stores() {
        let (source, _) = test_library();
        source.add_favorite(3).unwrap();
        source.save_note(3, "key of G").unwrap();

        let snapshot = source.export().unwrap();
        assert!(snapshot.get(FAVORITES_KEY).is_some());
        assert!(snapshot.get(BOOKMARKS_KEY).is_none());

        let (target, _) = test_library();
        target.add_bookmark(9, 0).unwrap();
        let written = target.import(&snapshot).unwrap();

        assert_eq!(written, 2);
        assert_eq!(target.get_favorites().unwrap(), vec![3]);
        assert_eq!(target.get_note(3).unwrap(), "key of G");
        // Lists absent from the backup survive
        assert!(target.is_bookmarked(9, 0).unwrap());
    }

    #[test]
    fn test_import_rejects_non_object() {
        let (lib, _) = test_library();
        assert!(lib.import(&serde_json::json!([1, 2])).is_err());
    }
}
