//! `pedia build` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use pedia_config::{CliSettings, Config};
use pedia_site::{BuildReport, SiteBuilder};
use pedia_storage::FsStore;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args, Default)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover pedia.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for the generated site (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Site display name (overrides config).
    #[arg(long)]
    site_name: Option<String>,

    /// Enable verbose output (per-page logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// Pages that build are written even when others fail; the failures
    /// are printed and turned into an error.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            site_name: self.site_name,
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let source_dir = config.docs_resolved.source_dir.clone();
        let output_dir = config.docs_resolved.output_dir.clone();

        let builder = SiteBuilder::new(
            Arc::new(FsStore::new(&source_dir)),
            config.site_resolved,
            config.navigation,
        );
        let assembly = builder.assemble()?;
        let files = assembly.write(&output_dir)?;
        tracing::info!(files, output_dir = %output_dir.display(), "Site written");

        let report = assembly.report();
        for warning in &report.warnings {
            output.warning(warning);
        }
        if !report.is_success() {
            for failure in &report.failures {
                output.failure(failure);
            }
            return Err(failure_error(report));
        }

        output.built(report.pages, &output_dir);
        Ok(())
    }
}

fn failure_error(report: &BuildReport) -> CliError {
    CliError::PageFailures {
        failed: report.failures.len(),
        total: report.failures.len() + report.pages,
    }
}
