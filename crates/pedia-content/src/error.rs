//! Content error types.

use std::fmt;
use std::path::{Path, PathBuf};

/// A document that cannot be turned into a block tree.
///
/// Names the document, the offending block and its 1-based source line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MalformedContentError {
    /// Slug of the offending document.
    pub slug: String,
    /// 1-based line where the offending block starts.
    pub line: usize,
    /// Short description of the block (e.g. "code fence ```java").
    pub block: String,
    /// What is wrong with it.
    pub reason: MalformedReason,
}

impl MalformedContentError {
    /// Error for a source whose slug is already taken by `other`.
    #[must_use]
    pub fn duplicate_slug(slug: &str, other: &Path) -> Self {
        Self {
            slug: slug.to_owned(),
            line: 1,
            block: "document".to_owned(),
            reason: MalformedReason::DuplicateSlug {
                other: other.to_path_buf(),
            },
        }
    }

    /// Error message without the slug prefix.
    #[must_use]
    pub fn detail(&self) -> String {
        format!("line {}: {} ({})", self.line, self.reason, self.block)
    }
}

impl fmt::Display for MalformedContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = if self.slug.is_empty() { "/" } else { &self.slug };
        write!(f, "{slug}: {}", self.detail())
    }
}

impl std::error::Error for MalformedContentError {}

/// Reason a document is malformed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MalformedReason {
    /// Fenced code block without a matching closing fence.
    #[error("unterminated code fence, expected closing {fence}")]
    UnterminatedFence { fence: String },
    /// Leading `---` without a closing delimiter.
    #[error("front matter is never closed")]
    UnterminatedFrontMatter,
    /// Front matter that is not a YAML mapping of the expected shape.
    #[error("invalid front matter: {0}")]
    InvalidFrontMatter(String),
    /// Two sources map to the same slug.
    #[error("slug is already provided by {}", .other.display())]
    DuplicateSlug { other: PathBuf },
}
