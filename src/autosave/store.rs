//! Durable key/value storage for auto-saved forms.
//!
//! Directory layout of [`FileStore`]:
//!   {dir}/{key}.json

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{QuizpilotError, Result};

/// String key/value storage that survives restarts.
pub trait LocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// One file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            QuizpilotError::Storage(format!("cannot create {}: {e}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_key(key)))
    }
}

/// Percent-encode everything but ASCII alphanumerics, `-` and `_`, so
/// distinct keys never share a file and nothing escapes the directory.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

impl LocalStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.item_path(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(QuizpilotError::Storage(format!(
                "cannot read {}: {e}",
                path.display()
            ))),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.item_path(key);
        // Write beside the target and rename so a crash never leaves half a record.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)
            .and_then(|_| std::fs::rename(&tmp, &path))
            .map_err(|e| QuizpilotError::Storage(format!("cannot write {}: {e}", path.display())))?;
        debug!("Stored {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        let path = self.item_path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", key);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(QuizpilotError::Storage(format!(
                "cannot remove {}: {e}",
                path.display()
            ))),
        }
    }
}

/// Process-local store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl LocalStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path().join("autosave")).unwrap();

        assert_eq!(store.get_item("autosave_quiz-form").unwrap(), None);
        store.set_item("autosave_quiz-form", r#"{"title":"x"}"#).unwrap();
        assert_eq!(
            store.get_item("autosave_quiz-form").unwrap().as_deref(),
            Some(r#"{"title":"x"}"#)
        );

        store.remove_item("autosave_quiz-form").unwrap();
        assert_eq!(store.get_item("autosave_quiz-form").unwrap(), None);
        store.remove_item("autosave_quiz-form").unwrap();
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = FileStore::open(dir.path()).unwrap();
            store.set_item("k", "v").unwrap();
        }
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_keys_are_encoded() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.set_item("../escape", "v").unwrap();
        assert!(dir.path().join("%2E%2E%2Fescape.json").exists());
    }

    #[test]
    fn test_similar_keys_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.set_item("autosave_a.b", "dot").unwrap();
        store.set_item("autosave_a_b", "underscore").unwrap();
        store.set_item("autosave_a%2Eb", "literal").unwrap();

        assert_eq!(store.get_item("autosave_a.b").unwrap().as_deref(), Some("dot"));
        assert_eq!(store.get_item("autosave_a_b").unwrap().as_deref(), Some("underscore"));
        assert_eq!(store.get_item("autosave_a%2Eb").unwrap().as_deref(), Some("literal"));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        store.set_item("a", "1").unwrap();
        store.set_item("a", "2").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_item("a").unwrap().as_deref(), Some("2"));
        store.remove_item("a").unwrap();
        assert!(store.is_empty());
    }
}
