//! File-backed cache store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde_json::Value;
use tracing::{debug, error};

use crate::uri::resolve_path;
use crate::{CacheStore, ReadMiss, WriteError};

/// [`CacheStore`] rooted at a directory on disk.
///
/// Directory layout:
/// ```text
/// {root}/
/// +-- notion/          # one subdirectory per namespace
///     +-- 83d2fa25...  # one JSON file per content item, no extension
/// ```
///
/// The file's mtime doubles as the entry's stored-at time; there is no
/// separate metadata record. Namespace directories are created lazily on
/// first write; creation tolerates concurrent first use.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CacheStore for FileStore {
    fn get(&self, uri: &str) -> Result<Value, ReadMiss> {
        debug!("get cache {uri:?}");
        let path = resolve_path(&self.root, uri)?;

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ReadMiss::Absent),
            Err(e) => {
                error!("failed to read cache {}: {e}", path.display());
                return Err(ReadMiss::Io(e));
            }
        };

        match serde_json::from_str(&text) {
            Ok(blob) => Ok(blob),
            Err(e) => {
                error!("failed to parse cache {}: {e}", path.display());
                Err(ReadMiss::Corrupt(e))
            }
        }
    }

    fn set(&self, uri: &str, blob: &Value) -> Result<(), WriteError> {
        debug!("set cache {uri:?}");
        let path = resolve_path(&self.root, uri)?;

        if let Some(namespace_dir) = path.parent() {
            // create_dir_all is idempotent under concurrent callers
            fs::create_dir_all(namespace_dir).map_err(WriteError::Io)?;
        }

        let text = serde_json::to_string(blob).map_err(WriteError::Serialize)?;
        fs::write(&path, text).map_err(WriteError::Io)
    }

    fn fresher_than(&self, uri: &str, unix_ms: i64) -> bool {
        let Ok(path) = resolve_path(&self.root, uri) else {
            return false;
        };
        let Ok(meta) = fs::metadata(&path) else {
            return false;
        };
        let Ok(modified) = meta.modified() else {
            return false;
        };
        let Ok(since_epoch) = modified.duration_since(UNIX_EPOCH) else {
            return false;
        };
        let stored_ms = i64::try_from(since_epoch.as_millis()).unwrap_or(i64::MAX);
        stored_ms > unix_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileStore) {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("source"));
        (tmp, store)
    }

    /// Stored-at time of an entry, in millis since the epoch.
    fn stored_ms(store: &FileStore, uri: &str) -> i64 {
        let path = resolve_path(store.root(), uri).unwrap();
        let modified = fs::metadata(path).unwrap().modified().unwrap();
        i64::try_from(modified.duration_since(UNIX_EPOCH).unwrap().as_millis()).unwrap()
    }

    #[test]
    fn set_then_get_round_trips() {
        let (_tmp, store) = store();
        let blob = json!({"id": "p1", "blocks": [{"type": "text", "title": "hi"}]});

        store.set("notion://p1", &blob).unwrap();
        assert_eq!(store.get("notion://p1").unwrap(), blob);
    }

    #[test]
    fn get_on_empty_store_is_absent() {
        let (_tmp, store) = store();
        assert!(matches!(store.get("notion://never"), Err(ReadMiss::Absent)));
    }

    #[test]
    fn keys_differing_by_separators_share_an_entry() {
        let (_tmp, store) = store();

        store.set("notion://123/456\\789", &json!("first")).unwrap();
        assert_eq!(store.get("notion://123456789").unwrap(), json!("first"));

        // Last writer wins on the shared path
        store.set("notion://123456789", &json!("second")).unwrap();
        assert_eq!(store.get("notion://123/456\\789").unwrap(), json!("second"));
    }

    #[test]
    fn unknown_protocol_is_a_clean_noop() {
        let (_tmp, store) = store();

        assert!(matches!(
            store.get("gopher://key"),
            Err(ReadMiss::Unresolved(_))
        ));
        assert!(matches!(
            store.set("gopher://key", &json!(1)),
            Err(WriteError::Unresolved(_))
        ));
        assert!(!store.fresher_than("gopher://key", 0));

        // Nothing was created on disk
        assert!(!store.root().exists());
    }

    #[test]
    fn malformed_uri_is_a_clean_noop() {
        let (_tmp, store) = store();
        assert!(matches!(
            store.get("not-a-uri"),
            Err(ReadMiss::Unresolved(_))
        ));
        assert!(!store.fresher_than("not-a-uri", 0));
    }

    #[test]
    fn corrupt_entry_is_a_categorized_miss() {
        let (_tmp, store) = store();
        store.set("notion://p1", &json!({"ok": true})).unwrap();

        let path = resolve_path(store.root(), "notion://p1").unwrap();
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(store.get("notion://p1"), Err(ReadMiss::Corrupt(_))));
    }

    #[test]
    fn freshness_is_strictly_greater_than() {
        let (_tmp, store) = store();
        store.set("notion://p1", &json!("content")).unwrap();
        let t_write = stored_ms(&store, "notion://p1");

        assert!(store.fresher_than("notion://p1", t_write - 1));
        assert!(!store.fresher_than("notion://p1", t_write));
        assert!(!store.fresher_than("notion://p1", t_write + 1000));
    }

    #[test]
    fn absent_entry_is_never_fresh() {
        let (_tmp, store) = store();
        assert!(!store.fresher_than("notion://nothing", 0));
        assert!(!store.fresher_than("notion://nothing", i64::MIN));
    }

    #[test]
    fn set_creates_namespace_directory_lazily() {
        let (_tmp, store) = store();
        assert!(!store.root().join("notion").exists());

        store.set("notion://p1", &json!(1)).unwrap();
        assert!(store.root().join("notion").is_dir());
    }
}
