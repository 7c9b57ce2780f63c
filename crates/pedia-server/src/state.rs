//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::{Arc, PoisonError, RwLock};

use pedia_site::{Assembly, BuildError, SiteBuilder};

use crate::live_reload::LiveReloadManager;

/// Latest assembled site, swapped whole on every rebuild.
pub(crate) struct SiteSnapshot {
    builder: SiteBuilder,
    current: RwLock<Arc<Assembly>>,
}

impl SiteSnapshot {
    /// Assemble the site once and hold the result.
    pub(crate) fn new(builder: SiteBuilder) -> Result<Self, BuildError> {
        let assembly = builder.assemble()?;
        Ok(Self {
            builder,
            current: RwLock::new(Arc::new(assembly)),
        })
    }

    /// The assembly currently being served.
    pub(crate) fn current(&self) -> Arc<Assembly> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*current)
    }

    /// Rebuild and swap in the new assembly.
    ///
    /// On a fatal build error the previous assembly stays in place.
    pub(crate) fn rebuild(&self) -> Result<Arc<Assembly>, BuildError> {
        let assembly = Arc::new(self.builder.assemble()?);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&assembly);
        Ok(assembly)
    }
}

/// Application state shared across all handlers.
pub(crate) struct AppState {
    pub(crate) site: Arc<SiteSnapshot>,
    /// Live reload manager (if enabled).
    pub(crate) live_reload: Option<LiveReloadManager>,
}

impl AppState {
    /// Check if live reload is enabled.
    #[must_use]
    pub(crate) fn live_reload_enabled(&self) -> bool {
        self.live_reload.is_some()
    }
}
