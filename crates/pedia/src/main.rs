//! Pedia CLI - static documentation site generator.
//!
//! Provides commands for:
//! - `build` (default): Render the content directory into a static site
//! - `serve`: Preview the site with live reload

mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, ServeArgs};
use output::Output;

/// Pedia - static documentation site generator.
#[derive(Parser)]
#[command(name = "pedia", version, about)]
struct Cli {
    /// Defaults to `build` when omitted.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the static site.
    Build(BuildArgs),
    /// Preview the site with live reload.
    Serve(ServeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Build(BuildArgs::default()));

    // --verbose enables INFO level, otherwise use RUST_LOG or default to ERROR
    let verbose = match &command {
        Commands::Build(args) => args.verbose,
        Commands::Serve(args) => args.verbose,
    };
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match command {
        Commands::Build(args) => args.execute(),
        Commands::Serve(args) => args.execute(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&err);
            ExitCode::FAILURE
        }
    }
}
