//! Build outcome and error types.

use std::fmt;
use std::path::PathBuf;

use pedia_content::MalformedContentError;
use pedia_storage::StorageError;

use crate::navigation::NavigationWarning;

/// Fatal build error. No output is produced, or writing stopped midway.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The content store cannot be listed.
    #[error("cannot scan content sources: {0}")]
    Storage(#[source] StorageError),
    /// A file under the output root cannot be created or written.
    #[error("cannot write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A manifest cannot be serialized.
    #[error("cannot serialize {name}: {source}")]
    Manifest {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a single document produced no page.
#[derive(Debug, thiserror::Error)]
pub enum FailureReason {
    /// The source parsed into an invalid block tree.
    #[error("{}", .0.detail())]
    Malformed(MalformedContentError),
    /// The source could not be read.
    #[error("cannot read source: {0}")]
    Read(StorageError),
}

/// A document that failed to build.
#[derive(Debug)]
pub struct PageFailure {
    pub slug: String,
    pub source_path: PathBuf,
    pub reason: FailureReason,
}

impl fmt::Display for PageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = if self.slug.is_empty() { "/" } else { &self.slug };
        write!(f, "{slug}: {}", self.reason)
    }
}

/// Summary of one assembly pass.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Number of document pages rendered.
    pub pages: usize,
    /// Documents that failed, in source path order.
    pub failures: Vec<PageFailure>,
    /// Navigation inconsistencies.
    pub warnings: Vec<NavigationWarning>,
}

impl BuildReport {
    /// True when every document built.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
