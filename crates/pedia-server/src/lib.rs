//! Preview server for Pedia sites.
//!
//! Serves the in-memory output of the site pipeline over HTTP and, when
//! live reload is enabled, rebuilds on source changes and tells open pages
//! to reload over a WebSocket.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use pedia_server::{ServerConfig, ServerError, run_server};
//! use pedia_site::SiteBuilder;
//!
//! async fn preview(builder: SiteBuilder) -> Result<(), ServerError> {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_owned(),
//!         port: 7979,
//!         source_dir: PathBuf::from("pages"),
//!         live_reload_enabled: true,
//!         watch_patterns: None,
//!     };
//!     run_server(config, builder).await
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (pedia-server)
//!                        │
//!                        ├─► fallback ──► current Assembly (RwLock<Arc<_>>)
//!                        │
//!                        └─► /__pedia/live-reload (WebSocket)
//!                                 ▲
//!                   notify ──► debouncer ──► rebuild ──► broadcast
//! ```

mod app;
mod error;
mod handlers;
mod live_reload;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use pedia_site::SiteBuilder;
use tokio::sync::broadcast;

pub use error::ServerError;
use state::{AppState, SiteSnapshot};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Content source directory, watched for live reload.
    pub source_dir: PathBuf,
    /// Enable live reload.
    pub live_reload_enabled: bool,
    /// Watch patterns for live reload.
    pub watch_patterns: Option<Vec<String>>,
}

/// Build the site and serve it until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the initial build fails fatally, the address is
/// invalid, the watcher cannot start, or the listener cannot bind.
pub async fn run_server(config: ServerConfig, builder: SiteBuilder) -> Result<(), ServerError> {
    let addr_str = format!("{}:{}", config.host, config.port);
    let addr: SocketAddr = addr_str.parse().map_err(|source| ServerError::Address {
        addr: addr_str.clone(),
        source,
    })?;

    let site = Arc::new(SiteSnapshot::new(builder)?);

    let live_reload = if config.live_reload_enabled {
        let (tx, _rx) = broadcast::channel::<live_reload::ReloadEvent>(100);
        let mut manager = live_reload::LiveReloadManager::new(
            config.source_dir.clone(),
            config.watch_patterns.clone(),
            Arc::clone(&site),
            tx,
        );
        manager.start()?;
        Some(manager)
    } else {
        None
    };

    let state = Arc::new(AppState { site, live_reload });
    let app = app::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Serving at http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Cannot listen for Ctrl-C, stop the process to exit");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}
