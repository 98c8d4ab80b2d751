//! Key-value store backends.

use giftbox_common::GiftboxError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Synchronous string-keyed store
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>, GiftboxError>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<(), GiftboxError>;

    /// Write several values; backends that can fail apply all or none
    fn set_many(&self, pairs: &[(&str, &str)]) -> Result<(), GiftboxError> {
        for (key, value) in pairs {
            self.set(key, value)?;
        }
        Ok(())
    }
}

fn lock(entries: &Mutex<BTreeMap<String, String>>) -> MutexGuard<'_, BTreeMap<String, String>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process store that forgets everything when dropped
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, GiftboxError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), GiftboxError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store persisted as a single JSON object file.
///
/// The file is read once on open and rewritten in full on every change
/// (temp file + rename, so a crash never leaves a half-written file).
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, creating nothing until the first write
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GiftboxError> {
        let path = path.as_ref().to_path_buf();

        let entries = match std::fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str::<BTreeMap<String, String>>(&data) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Store file is malformed, starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(GiftboxError::Storage(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Store opened");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), GiftboxError> {
        let storage_err =
            |e: std::io::Error| GiftboxError::Storage(format!("{}: {e}", self.path.display()));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(storage_err)?;
        }

        let data = serde_json::to_string_pretty(entries)
            .map_err(|e| GiftboxError::Storage(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, data).map_err(storage_err)?;
        std::fs::rename(&tmp, &self.path).map_err(storage_err)?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, GiftboxError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), GiftboxError> {
        self.set_many(&[(key, value)])
    }

    /// Write the updated map to disk first; memory only changes once it is persisted
    fn set_many(&self, pairs: &[(&str, &str)]) -> Result<(), GiftboxError> {
        let mut entries = lock(&self.entries);

        let mut updated = entries.clone();
        for (key, value) in pairs {
            updated.insert(key.to_string(), value.to_string());
        }

        if let Err(e) = self.persist(&updated) {
            tracing::warn!(path = %self.path.display(), error = %e, "Store write failed");
            return Err(e);
        }

        *entries = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("giftbox-kv-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));

        store.set("b", "").unwrap();
        assert_eq!(store.get("b").unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let path = temp_path("reopen/store.json");
        let _ = std::fs::remove_file(&path);

        let store = FileStore::open(&path).unwrap();
        store.set("quiz-pin", "777").unwrap();
        store.set("quiz-questions", "[]").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("quiz-pin").unwrap().as_deref(), Some("777"));
        assert_eq!(reopened.get("quiz-questions").unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get("other").unwrap(), None);

        let _ = std::fs::remove_file(&path);
    }

    /// A store whose parent directory is replaced by a plain file after opening
    fn unwritable_store(name: &str) -> (FileStore, PathBuf) {
        let blocker = temp_path(name);
        let _ = std::fs::remove_dir_all(&blocker);
        let _ = std::fs::remove_file(&blocker);

        let store = FileStore::open(blocker.join("store.json")).unwrap();
        std::fs::create_dir_all(blocker.parent().unwrap()).unwrap();
        std::fs::write(&blocker, "in the way").unwrap();
        (store, blocker)
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let (store, blocker) = unwritable_store("blocked-set");

        let err = store.set("quiz-pin", "999").unwrap_err();
        assert!(matches!(err, GiftboxError::Storage(_)));
        assert_eq!(store.get("quiz-pin").unwrap(), None);

        let err = store
            .set_many(&[("quiz-questions", "[]"), ("quiz-pin", "1")])
            .unwrap_err();
        assert!(matches!(err, GiftboxError::Storage(_)));
        assert_eq!(store.get("quiz-questions").unwrap(), None);
        assert_eq!(store.get("quiz-pin").unwrap(), None);

        let _ = std::fs::remove_file(&blocker);
    }

    #[test]
    fn test_set_many_on_memory_store() {
        let store = MemoryStore::new();
        store.set_many(&[("a", "1"), ("b", "2")]).unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_file_store_treats_garbage_as_empty() {
        let path = temp_path("garbage/store.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json at all").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("quiz-pin").unwrap(), None);

        store.set("quiz-pin", "1").unwrap();
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("quiz-pin").unwrap().as_deref(), Some("1"));

        let _ = std::fs::remove_file(&path);
    }
}
