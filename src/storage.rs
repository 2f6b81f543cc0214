// Local key-value storage backing every user list.
//
// Each key lives in its own JSON file so that a corrupted list never takes the
// others down with it. Writes go through `with_lock` + `atomic_write`.
use crate::context::AppContext;
use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// --- Android Specific Imports ---
#[cfg(target_os = "android")]
use std::sync::{Arc, OnceLock};

// --- Desktop Specific Imports ---
#[cfg(not(target_os = "android"))]
use fs2::FileExt;

pub const FAVORITES_KEY: &str = "@hosanna_favorites";
pub const RECENT_KEY: &str = "@hosanna_recent";
pub const SETTINGS_KEY: &str = "@hosanna_settings";
pub const NOTES_KEY: &str = "@hosanna_notes";
pub const BOOKMARKS_KEY: &str = "@hosanna_bookmarks";
pub const VIEWED_KEY: &str = "@hosanna_viewed";

const STORE_FILE_EXT: &str = "json";

/// String-valued key-value store with the same contract as a device store:
/// missing keys read as `None`, removing a missing key is not an error.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

// --- Android Global Lock Map ---
#[cfg(target_os = "android")]
static ANDROID_FILE_LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();

/// Filesystem helpers shared by the file store and the config writer.
pub struct LocalStorage;

impl LocalStorage {
    /// Helper to get a sidecar lock file path (Desktop only)
    #[cfg(not(target_os = "android"))]
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    // --- DESKTOP IMPLEMENTATION (fs2) ---
    #[cfg(not(target_os = "android"))]
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {:?}", lock_path))?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    // --- ANDROID IMPLEMENTATION (In-Memory Mutex) ---
    #[cfg(target_os = "android")]
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let map_mutex = ANDROID_FILE_LOCKS.get_or_init(|| Mutex::new(HashMap::new()));

        // Canonicalize to avoid race conditions via symlinks or relative paths
        let key = file_path.canonicalize().unwrap_or(file_path.to_path_buf());

        let file_mutex = {
            let mut map = map_mutex
                .lock()
                .map_err(|_| anyhow::anyhow!("lock map poisoned"))?;
            map.entry(key)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        let _guard = file_mutex
            .lock()
            .map_err(|_| anyhow::anyhow!("file lock poisoned"))?;
        f()
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }
}

/// Maps a storage key to a safe file stem.
/// `@hosanna_favorites` -> `hosanna_favorites`
pub fn key_to_file_stem(key: &str) -> String {
    key.trim_start_matches('@')
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// One JSON file per key under the context's store directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(ctx: &dyn AppContext) -> Result<Self> {
        Ok(Self {
            dir: ctx.get_store_dir()?,
        })
    }

    pub fn with_dir(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create directory: {:?}", dir))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", key_to_file_stem(key), STORE_FILE_EXT))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        LocalStorage::with_lock(&path, || {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            Ok(Some(raw))
        })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        LocalStorage::with_lock(&path, || {
            LocalStorage::atomic_write(&path, value)
                .with_context(|| format!("Failed to write {:?}", path))
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        LocalStorage::with_lock(&path, || {
            match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e).with_context(|| format!("Failed to remove {:?}", path)),
            }
        })
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(STORE_FILE_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(format!("@{}", stem));
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// In-memory store for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.lock()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// Reads and decodes a JSON value.
///
/// A payload that is present but unreadable as `T` is reported and treated as
/// absent; the next write replaces it.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.get_item(key)? else {
        return Ok(None);
    };
    match serde_json::from_str::<T>(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("Discarding unreadable value under {}: {}", key, e);
            Ok(None)
        }
    }
}

pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.set_item(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn test_key_to_file_stem() {
        assert_eq!(key_to_file_stem(FAVORITES_KEY), "hosanna_favorites");
        assert_eq!(key_to_file_stem("@a/b c"), "a_b_c");
    }

    #[test]
    fn test_file_store_roundtrip_and_remove() {
        let ctx = TestContext::new();
        let store = FileStore::new(&ctx).unwrap();

        assert_eq!(store.get_item(FAVORITES_KEY).unwrap(), None);
        store.set_item(FAVORITES_KEY, "[1,2]").unwrap();
        assert_eq!(store.get_item(FAVORITES_KEY).unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(store.keys().unwrap(), vec![FAVORITES_KEY.to_string()]);

        store.remove_item(FAVORITES_KEY).unwrap();
        assert_eq!(store.get_item(FAVORITES_KEY).unwrap(), None);
        // Removing twice is fine
        store.remove_item(FAVORITES_KEY).unwrap();
    }

    #[test]
    fn test_file_store_leaves_no_tmp_file() {
        let ctx = TestContext::new();
        let store = FileStore::new(&ctx).unwrap();
        store.set_item(NOTES_KEY, "{}").unwrap();

        let leftovers: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_read_json_treats_garbage_as_absent() {
        let store = MemoryStore::new();
        store.set_item(RECENT_KEY, "not json").unwrap();
        let value: Option<Vec<usize>> = read_json(&store, RECENT_KEY).unwrap();
        assert!(value.is_none());
    }
}
