//! Error types for the preview server.

use pedia_site::BuildError;

/// Error that stops the server from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The initial build failed.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// `host:port` is not a socket address.
    #[error("Invalid listen address {addr}: {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// The source directory cannot be watched.
    #[error("Cannot watch source directory: {0}")]
    Watch(#[from] notify::Error),

    /// Binding or serving failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
