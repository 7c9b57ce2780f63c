//! CLI error types.

use pedia_config::ConfigError;
use pedia_server::ServerError;
use pedia_site::BuildError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Server(#[from] ServerError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Some documents failed; the rest of the site was written.
    #[error("{failed} of {total} documents failed to build")]
    PageFailures { failed: usize, total: usize },
}
