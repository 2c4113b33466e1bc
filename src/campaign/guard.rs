//! Single-flight run guard.
//!
//! At most one batch run may be active per [`super::CampaignMailer`]. The
//! guard is advisory within the process only; it does not protect multiple
//! process instances sharing the same durable state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Advisory single-flight flag for batch runs
#[derive(Debug, Clone, Default)]
pub(crate) struct RunGuard {
    active: Arc<AtomicBool>,
}

impl RunGuard {
    /// Create a released guard
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Attempt to mark a run active
    ///
    /// Returns `None` if a run is already in progress. The returned permit
    /// releases the flag when dropped, so every exit path (early `?` returns,
    /// spawned-task completion, panics unwinding) clears it.
    pub(crate) fn try_acquire(&self) -> Option<RunPermit> {
        self.active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| RunPermit {
                active: Arc::clone(&self.active),
            })
    }

    /// Whether a run is currently active
    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// RAII permit for an active run; releases the guard on drop
#[derive(Debug)]
pub(crate) struct RunPermit {
    active: Arc<AtomicBool>,
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }
}
