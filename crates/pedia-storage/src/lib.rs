//! Content store abstraction for Pedia.
//!
//! This crate provides a [`ContentStore`] trait for listing and reading
//! content sources from the underlying storage backend. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Clean separation** between site assembly and I/O operations
//!
//! # Architecture
//!
//! The crate provides:
//! - [`ContentStore`] trait listing and reading sources and static files
//! - [`FsStore`] implementation for a directory of `.md`/`.mdx` files
//! - [`MockStore`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```no_run
//! use pedia_storage::{ContentStore, FsStore};
//!
//! let store = FsStore::new("docs");
//! for entry in store.scan()? {
//!     println!("{} <- {}", entry.slug, entry.source_path.display());
//! }
//! # Ok::<(), pedia_storage::StorageError>(())
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStore;
#[cfg(feature = "mock")]
pub use mock::MockStore;
pub use storage::{
    CONTENT_EXTENSIONS, ContentStore, SourceEntry, StorageError, StorageErrorKind,
    is_content_file, slug_for_path,
};
