//! Change batching for live reload.
//!
//! Every change triggers a full rebuild, so changes are collected into one
//! batch that is released once the source tree has been quiet for the
//! debounce window. Editors that emit several events per save produce a
//! single rebuild.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Pending changed paths and the instant they become ready.
#[derive(Default)]
struct Batch {
    paths: BTreeSet<PathBuf>,
    deadline: Option<Instant>,
}

/// Thread-safe change debouncer.
pub(crate) struct ChangeDebouncer {
    batch: Mutex<Batch>,
    quiet_period: Duration,
}

impl ChangeDebouncer {
    pub(crate) fn new(quiet_period: Duration) -> Self {
        Self {
            batch: Mutex::new(Batch::default()),
            quiet_period,
        }
    }

    /// Record a changed path and push the batch deadline back.
    pub(crate) fn record(&self, path: PathBuf) {
        let mut batch = self.batch.lock().unwrap_or_else(PoisonError::into_inner);
        batch.paths.insert(path);
        batch.deadline = Some(Instant::now() + self.quiet_period);
    }

    /// Take the batch if its deadline has passed.
    ///
    /// Returns changed paths in sorted order, or an empty list while the
    /// batch is still settling.
    pub(crate) fn drain_ready(&self) -> Vec<PathBuf> {
        let mut batch = self.batch.lock().unwrap_or_else(PoisonError::into_inner);
        match batch.deadline {
            Some(deadline) if deadline <= Instant::now() => {
                let taken = std::mem::take(&mut *batch);
                taken.paths.into_iter().collect()
            }
            _ => Vec::new(),
        }
    }
}
