//! Content store trait and error types.
//!
//! Provides the core [`ContentStore`] trait for listing and reading content
//! sources, along with [`StorageError`] for unified error handling across
//! backends.
//!
//! # Slug Convention
//!
//! Every source maps to a slug, the URL path of its page:
//! - `index.md` -> `""` (root page)
//! - `guide.md` -> `"guide"`
//! - `guide/index.md` -> `"guide"`
//! - `collections/hash-map.mdx` -> `"collections/hash-map"`

use std::path::{Component, Path, PathBuf};

/// File extensions recognized as content sources.
pub const CONTENT_EXTENSIONS: &[&str] = &["md", "mdx"];

/// A content source found by [`ContentStore::scan`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceEntry {
    /// Source path relative to the store root (e.g., "guide/index.md").
    pub source_path: PathBuf,
    /// Slug derived from `source_path`.
    pub slug: String,
}

impl SourceEntry {
    /// Create an entry, deriving the slug from the source path.
    #[must_use]
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        let source_path = source_path.into();
        let slug = slug_for_path(&source_path);
        Self { source_path, slug }
    }
}

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid path or identifier.
    InvalidPath,
    /// Content is not valid UTF-8 text.
    InvalidData,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            std::io::ErrorKind::InvalidData => StorageErrorKind::InvalidData,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::InvalidData => "Invalid data",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Read access to the set of content sources for one build.
///
/// `scan` lists sources in `source_path` order; `read` takes a
/// `source_path` from that listing.
pub trait ContentStore: Send + Sync {
    /// List all content sources, sorted by source path.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store cannot be listed (e.g., the
    /// source directory is missing).
    fn scan(&self) -> Result<Vec<SourceEntry>, StorageError>;

    /// Read the full text of one source.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the source doesn't exist or can't be read.
    fn read(&self, source_path: &Path) -> Result<String, StorageError>;

    /// List static files (images, downloads) published next to the pages,
    /// sorted. Stores without static files list none.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the store cannot be listed.
    fn scan_assets(&self) -> Result<Vec<PathBuf>, StorageError> {
        Ok(Vec::new())
    }

    /// Read the bytes of one static file from [`scan_assets`](Self::scan_assets).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file doesn't exist or can't be read.
    fn read_asset(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        Err(StorageError::not_found(path))
    }
}

/// Convert a relative source path to its slug.
///
/// Examples:
/// - `index.md` -> `""`
/// - `guide.md` -> `"guide"`
/// - `domain/index.mdx` -> `"domain"`
/// - `domain/setup.md` -> `"domain/setup"`
#[must_use]
pub fn slug_for_path(rel_path: &Path) -> String {
    let mut segments: Vec<String> = rel_path
        .with_extension("")
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if segments.last().is_some_and(|s| s == "index") {
        segments.pop();
    }
    segments.join("/")
}

/// Whether a file path has a content extension.
#[must_use]
pub fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| CONTENT_EXTENSIONS.contains(&e))
}
