//! Site assembly for Pedia.
//!
//! This crate provides:
//! - [`SiteBuilder`]: scans a [`ContentStore`](pedia_storage::ContentStore),
//!   parses every source and renders the pages
//! - [`Navigation`]: roadmap-ordered navigation with prev/next positions
//! - [`Assembly`]: the in-memory output, writable to a directory
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use std::sync::Arc;
//! use pedia_config::{NavigationConfig, SiteConfig};
//! use pedia_site::SiteBuilder;
//! use pedia_storage::FsStore;
//!
//! let site = SiteConfig {
//!     name: "Javapedia".to_owned(),
//!     logo: "Javapedia".to_owned(),
//!     ..SiteConfig::default()
//! };
//! let builder = SiteBuilder::new(Arc::new(FsStore::new("pages")), site, NavigationConfig::default());
//! let assembly = builder.assemble()?;
//! assembly.write(Path::new("dist"))?;
//! for failure in &assembly.report().failures {
//!     eprintln!("{failure}");
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod manifest;
mod navigation;
mod report;

pub use builder::{Assembly, SiteBuilder};
pub use manifest::{NAVIGATION_MANIFEST, SEARCH_INDEX};
pub use navigation::{Navigation, NavigationWarning};
pub use report::{BuildError, BuildReport, FailureReason, PageFailure};
