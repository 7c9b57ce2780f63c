//! Mock content store for testing.
//!
//! Provides [`MockStore`] for unit testing without filesystem access.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::storage::{ContentStore, SourceEntry, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock content store for testing.
///
/// Stores sources in memory. Use the builder methods to configure the mock
/// with test data.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use pedia_storage::{ContentStore, MockStore};
///
/// let store = MockStore::new()
///     .with_file("hash-map.md", "# HashMap\n")
///     .with_file("guide/index.md", "# Guide\n");
///
/// let entries = store.scan().unwrap();
/// assert_eq!(entries[0].slug, "guide");
/// assert_eq!(store.read(Path::new("hash-map.md")).unwrap(), "# HashMap\n");
/// ```
#[derive(Debug, Default)]
pub struct MockStore {
    files: RwLock<BTreeMap<PathBuf, String>>,
    assets: RwLock<BTreeMap<PathBuf, Vec<u8>>>,
    unreadable: RwLock<BTreeSet<PathBuf>>,
    scan_error: RwLock<bool>,
}

impl MockStore {
    /// Create a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source with content.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.set_file(path, content);
        self
    }

    /// Add a static file.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_asset(self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        self.assets.write().unwrap().insert(path.into(), bytes.into());
        self
    }

    /// Add a source that is listed by `scan` but fails to read.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_unreadable(self, path: impl Into<PathBuf>) -> Self {
        self.unreadable.write().unwrap().insert(path.into());
        self
    }

    /// Make `scan` fail.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_scan_error(self) -> Self {
        *self.scan_error.write().unwrap() = true;
        self
    }

    /// Insert or replace a source after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_file(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), content.into());
    }

    /// Remove a source after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn remove_file(&self, path: &Path) {
        self.files.write().unwrap().remove(path);
    }
}

impl ContentStore for MockStore {
    fn scan(&self) -> Result<Vec<SourceEntry>, StorageError> {
        if *self.scan_error.read().unwrap() {
            return Err(StorageError::new(StorageErrorKind::Other).with_backend(BACKEND));
        }
        let files = self.files.read().unwrap();
        let unreadable = self.unreadable.read().unwrap();
        let mut entries: Vec<SourceEntry> = files
            .keys()
            .chain(unreadable.iter())
            .map(|path| SourceEntry::new(path.clone()))
            .collect();
        entries.sort();
        entries.dedup();
        Ok(entries)
    }

    fn read(&self, source_path: &Path) -> Result<String, StorageError> {
        if self.unreadable.read().unwrap().contains(source_path) {
            return Err(StorageError::new(StorageErrorKind::PermissionDenied)
                .with_path(source_path)
                .with_backend(BACKEND));
        }
        self.files
            .read()
            .unwrap()
            .get(source_path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(source_path).with_backend(BACKEND))
    }

    fn scan_assets(&self) -> Result<Vec<PathBuf>, StorageError> {
        Ok(self.assets.read().unwrap().keys().cloned().collect())
    }

    fn read_asset(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        self.assets
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }
}
