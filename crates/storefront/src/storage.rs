//! File-backed key-value slot.
//!
//! The file holds a single JSON object mapping keys to string values, the
//! same shape a browser's local storage exposes. Writes replace the whole
//! file via a uniquely named temporary sibling and a rename, so readers never
//! observe a half-written file and concurrent writers never share a temp file.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use asn_store_core::{KeyValueStore, StorageError};

/// A [`KeyValueStore`] persisted to one JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Use `path` as the backing file. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Entries to rewrite. A corrupt file is replaced rather than blocking
    /// every future write.
    fn entries_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_entries() {
            Ok(entries) => Ok(entries),
            Err(StorageError::Json(e)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "store file is corrupt, replacing it"
                );
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(entries)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries_for_write()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write_entries(&entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.get("cart").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested/store.json"));

        store.set("cart", r#"{"p1":{"id":"p1","quantity":1}}"#).unwrap();
        store.set("other", "x").unwrap();

        let reopened = FileStore::new(store.path());
        assert_eq!(
            reopened.get("cart").unwrap().as_deref(),
            Some(r#"{"p1":{"id":"p1","quantity":1}}"#)
        );
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_set_replaces_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("store.json"));
        store.set("cart", r#"{"p1":{"id":"p1","quantity":1}}"#).unwrap();
        store.set("cart", "{}").unwrap();
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_corrupt_file_errors_on_read_and_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{{{ not json").unwrap();

        let mut store = FileStore::new(&path);
        assert!(matches!(store.get("cart"), Err(StorageError::Json(_))));

        store.set("cart", "{}").unwrap();
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("store.json"));
        store.set("cart", "{}").unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["store.json"]);
    }

    #[test]
    fn test_stale_fixed_name_temp_does_not_block_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::create_dir(dir.path().join("store.json.tmp")).unwrap();

        let mut store = FileStore::new(&path);
        store.set("cart", "{}").unwrap();
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_concurrent_writers_never_fail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let writers: Vec<_> = (0..4)
            .map(|n| {
                let mut store = FileStore::new(&path);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        store.set("cart", &format!(r#"{{"w":{n},"i":{i}}}"#)).unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let store = FileStore::new(&path);
        assert!(store.get("cart").unwrap().is_some());
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["store.json"]);
    }
}
