//! Filesystem content store.

use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::{ContentStore, SourceEntry, StorageError, StorageErrorKind, is_content_file};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Content store backed by a directory tree.
///
/// Scans `.md` and `.mdx` files recursively. Entries whose name starts with
/// `.` (hidden) or `_` (partials, drafts) are skipped, directories included.
#[derive(Debug, Clone)]
pub struct FsStore {
    source_dir: PathBuf,
}

impl FsStore {
    /// Create a store rooted at `source_dir`.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
        }
    }

    /// Root directory of the store.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Collect every visible file under `dir_path`, relative to the root.
    fn collect_files(&self, dir_path: &Path, files: &mut Vec<PathBuf>) -> Result<(), StorageError> {
        let read_dir = fs::read_dir(dir_path)
            .map_err(|e| StorageError::io(e, Some(dir_path.to_path_buf())).with_backend(BACKEND))?;

        for entry in read_dir {
            let entry = entry
                .map_err(|e| StorageError::io(e, Some(dir_path.to_path_buf())).with_backend(BACKEND))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with('.') || name.starts_with('_') {
                continue;
            }

            let path = entry.path();
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            if is_dir {
                self.collect_files(&path, files)?;
            } else if let Ok(rel_path) = path.strip_prefix(&self.source_dir) {
                files.push(rel_path.to_path_buf());
            }
        }
        Ok(())
    }

    fn walk(&self) -> Result<Vec<PathBuf>, StorageError> {
        if !self.source_dir.is_dir() {
            return Err(StorageError::not_found(&self.source_dir).with_backend(BACKEND));
        }
        let mut files = Vec::new();
        self.collect_files(&self.source_dir, &mut files)?;
        files.sort();
        Ok(files)
    }

    /// Reject paths that would escape the source directory.
    fn validate_path(source_path: &Path) -> Result<(), StorageError> {
        let escapes = source_path.is_absolute()
            || source_path
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir));
        if escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(source_path)
                .with_backend(BACKEND));
        }
        Ok(())
    }
}

impl ContentStore for FsStore {
    fn scan(&self) -> Result<Vec<SourceEntry>, StorageError> {
        let mut entries: Vec<SourceEntry> = self
            .walk()?
            .into_iter()
            .filter(|path| is_content_file(path))
            .map(SourceEntry::new)
            .collect();
        entries.sort();
        tracing::debug!(
            source_dir = %self.source_dir.display(),
            count = entries.len(),
            "Scanned content sources"
        );
        Ok(entries)
    }

    fn read(&self, source_path: &Path) -> Result<String, StorageError> {
        Self::validate_path(source_path)?;
        fs::read_to_string(self.source_dir.join(source_path))
            .map_err(|e| StorageError::io(e, Some(source_path.to_path_buf())).with_backend(BACKEND))
    }

    fn scan_assets(&self) -> Result<Vec<PathBuf>, StorageError> {
        let mut assets = self.walk()?;
        assets.retain(|path| !is_content_file(path));
        Ok(assets)
    }

    fn read_asset(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        Self::validate_path(path)?;
        fs::read(self.source_dir.join(path))
            .map_err(|e| StorageError::io(e, Some(path.to_path_buf())).with_backend(BACKEND))
    }
}
