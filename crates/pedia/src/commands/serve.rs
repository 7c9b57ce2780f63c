//! `pedia serve` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use pedia_config::{CliSettings, Config};
use pedia_server::{ServerConfig, run_server};
use pedia_site::SiteBuilder;
use pedia_storage::FsStore;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover pedia.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long, env = "PEDIA_HOST")]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long, env = "PEDIA_PORT")]
    port: Option<u16>,

    /// Enable verbose output (rebuild logs).
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable live reload (default: enabled).
    #[arg(long)]
    live_reload: Option<bool>,

    /// Disable live reload.
    #[arg(long, conflicts_with = "live_reload")]
    no_live_reload: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// Blocks until the server shuts down.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host.clone(),
            port: self.port,
            source_dir: self.source_dir.clone(),
            live_reload_enabled: self.resolve_live_reload_enabled(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let server_config = ServerConfig {
            host: config.server.host.clone(),
            port: config.server.port,
            source_dir: config.docs_resolved.source_dir.clone(),
            live_reload_enabled: config.live_reload.enabled,
            watch_patterns: config.live_reload.watch_patterns.clone(),
        };

        output.serving(
            &config.site_resolved.name,
            &server_config.host,
            server_config.port,
        );
        output.info(&format!(
            "Source directory: {}",
            server_config.source_dir.display()
        ));
        output.info(if server_config.live_reload_enabled {
            "Live reload: enabled"
        } else {
            "Live reload: disabled"
        });

        let builder = SiteBuilder::new(
            Arc::new(FsStore::new(&server_config.source_dir)),
            config.site_resolved,
            config.navigation,
        );

        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(run_server(server_config, builder))?;
        Ok(())
    }

    /// Resolve `live_reload_enabled` from --live-reload/--no-live-reload flags.
    fn resolve_live_reload_enabled(&self) -> Option<bool> {
        self.no_live_reload.then_some(false).or(self.live_reload)
    }
}
