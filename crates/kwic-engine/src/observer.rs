//! Progress observation and cancellation for analysis runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use kwic_config::ConfigId;
use kwic_document::DocumentId;

/// Callbacks for a running analysis.
///
/// One unit is one (document, configuration) pair. Units complete on worker
/// threads, so implementations take `&self` and must be `Sync`.
pub trait AnalysisObserver: Sync {
    /// Called after each unit completes. `completed` never decreases across
    /// calls and reaches `total` exactly when the run finishes uncancelled.
    fn on_progress(&self, completed: usize, total: usize);

    /// Called when a unit fails internally and is recorded with zero matches.
    fn on_unit_error(&self, document: &DocumentId, config: ConfigId, message: &str);
}

/// An observer that ignores everything.
pub struct SilentObserver;

impl AnalysisObserver for SilentObserver {
    fn on_progress(&self, _completed: usize, _total: usize) {}

    fn on_unit_error(&self, _document: &DocumentId, _config: ConfigId, _message: &str) {}
}

/// Cooperative cancellation signal shared between a controller and a run.
///
/// Cloning is cheap and every clone observes the same flag. The engine
/// checks the token at unit boundaries, so cancellation keeps the units
/// already finished and marks the report incomplete.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation to every clone of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns true once `cancel` has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
