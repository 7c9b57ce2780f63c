//! Live reload manager.
//!
//! Watches the source directory, rebuilds the site after changes settle and
//! tells connected clients to reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use pedia_storage::slug_for_path;
use serde::Serialize;
use tokio::sync::{broadcast, mpsc};

use super::debouncer::ChangeDebouncer;
use crate::state::SiteSnapshot;

/// Event sent to connected WebSocket clients after a rebuild.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct ReloadEvent {
    /// Event type (always "reload").
    #[serde(rename = "type")]
    event_type: &'static str,
    /// URL path of the page whose source changed.
    path: String,
}

impl ReloadEvent {
    fn for_slug(slug: &str) -> Self {
        let path = if slug.is_empty() {
            "/".to_owned()
        } else {
            format!("/{slug}/")
        };
        Self {
            event_type: "reload",
            path,
        }
    }
}

/// Default patterns when none are configured.
const DEFAULT_WATCH_PATTERNS: &[&str] = &["**/*.md", "**/*.mdx"];

/// Quiet period before a batch of changes triggers a rebuild.
const DEBOUNCE: Duration = Duration::from_millis(100);

/// How often the debouncer is polled.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Manages file watching, rebuilds and reload broadcasts.
pub(crate) struct LiveReloadManager {
    source_dir: PathBuf,
    watch_patterns: Vec<glob::Pattern>,
    site: Arc<SiteSnapshot>,
    broadcaster: broadcast::Sender<ReloadEvent>,
    watcher: Option<RecommendedWatcher>,
}

impl LiveReloadManager {
    /// Create a new live reload manager.
    ///
    /// Invalid glob patterns are logged and ignored.
    pub(crate) fn new(
        source_dir: PathBuf,
        watch_patterns: Option<Vec<String>>,
        site: Arc<SiteSnapshot>,
        broadcaster: broadcast::Sender<ReloadEvent>,
    ) -> Self {
        let patterns = watch_patterns.unwrap_or_else(|| {
            DEFAULT_WATCH_PATTERNS
                .iter()
                .map(|p| (*p).to_owned())
                .collect()
        });
        let watch_patterns = patterns
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!(pattern = %p, error = %e, "Ignoring invalid watch pattern");
                    None
                }
            })
            .collect();
        Self {
            source_dir,
            watch_patterns,
            site,
            broadcaster,
            watcher: None,
        }
    }

    /// Start the file watcher.
    ///
    /// Spawns one task that feeds matching events into the debouncer and
    /// one that rebuilds and broadcasts once a batch settles.
    ///
    /// # Errors
    ///
    /// Returns an error if the file watcher cannot be created.
    pub(crate) fn start(&mut self) -> Result<(), notify::Error> {
        let (tx, mut rx) = mpsc::channel::<Event>(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                // Callback runs on the notify thread
                let _ = tx.blocking_send(event);
            }
        })?;
        watcher.watch(&self.source_dir, RecursiveMode::Recursive)?;
        self.watcher = Some(watcher);

        let debouncer = Arc::new(ChangeDebouncer::new(DEBOUNCE));

        let recorder = Arc::clone(&debouncer);
        let source_dir = self.source_dir.clone();
        let watch_patterns = self.watch_patterns.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                Self::record_event(&event, &source_dir, &watch_patterns, &recorder);
            }
        });

        let site = Arc::clone(&self.site);
        let broadcaster = self.broadcaster.clone();
        let source_dir = self.source_dir.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(POLL_INTERVAL);
            loop {
                interval.tick().await;
                let changed = debouncer.drain_ready();
                if changed.is_empty() {
                    continue;
                }
                Self::rebuild(&site, &broadcaster, &source_dir, changed).await;
            }
        });

        tracing::info!(source_dir = %self.source_dir.display(), "Watching for changes");
        Ok(())
    }

    fn record_event(
        event: &Event,
        source_dir: &Path,
        watch_patterns: &[glob::Pattern],
        debouncer: &ChangeDebouncer,
    ) {
        if !matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        ) {
            return;
        }
        for path in &event.paths {
            if Self::matches_patterns(path, source_dir, watch_patterns) {
                debouncer.record(path.clone());
                tracing::debug!(path = %path.display(), kind = ?event.kind, "Recorded change");
            }
        }
    }

    /// Rebuild the snapshot off the async runtime, then notify clients.
    async fn rebuild(
        site: &Arc<SiteSnapshot>,
        broadcaster: &broadcast::Sender<ReloadEvent>,
        source_dir: &Path,
        changed: Vec<PathBuf>,
    ) {
        let start = Instant::now();
        let snapshot = Arc::clone(site);
        let result = tokio::task::spawn_blocking(move || snapshot.rebuild()).await;

        match result {
            Ok(Ok(assembly)) => {
                let report = assembly.report();
                tracing::info!(
                    pages = report.pages,
                    failures = report.failures.len(),
                    changed = changed.len(),
                    elapsed_ms = start.elapsed().as_millis(),
                    "Rebuilt site"
                );
                for path in &changed {
                    let Ok(relative) = path.strip_prefix(source_dir) else {
                        continue;
                    };
                    let _ = broadcaster.send(ReloadEvent::for_slug(&slug_for_path(relative)));
                }
            }
            Ok(Err(e)) => tracing::error!(error = %e, "Rebuild failed, serving previous site"),
            Err(e) => tracing::error!(error = %e, "Rebuild task panicked"),
        }
    }

    /// Check if a path under `source_dir` matches any watch pattern.
    fn matches_patterns(path: &Path, source_dir: &Path, patterns: &[glob::Pattern]) -> bool {
        let Ok(relative) = path.strip_prefix(source_dir) else {
            return false;
        };
        let relative = relative.to_string_lossy();
        patterns.iter().any(|pattern| pattern.matches(&relative))
    }

    /// Get a receiver for reload events.
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.broadcaster.subscribe()
    }
}
