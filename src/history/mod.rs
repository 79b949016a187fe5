//! History manager: snapshot log, save coalescing, and undo/redo restore.
//!
//! DESIGN
//! ======
//! [`History`] is the single owner of the log, the cursor, and the
//! "restoring" guard flag. Everything else (trigger adapter, key handler,
//! UI controls) goes through its methods or reads the [`HistoryView`]
//! projection, which is republished after every mutation and never written
//! back.
//!
//! The mutable state sits behind a `std::sync::Mutex` that is never held
//! across an `.await` or a call into the codec/surface, so surface event
//! handlers may call back into the history while a capture or restore is
//! running without deadlocking.
//!
//! Coalescing timers hold a `Weak` reference to the shared state; a timer
//! that fires after the history is dropped does nothing, and one that fires
//! after [`History::close`] is rejected at commit time.

pub mod coordinator;
pub mod log;
pub mod restore;
pub mod timer;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{info, warn};

use crate::codec::{SnapshotCodec, Token};
use crate::config::HistoryConfig;
use crate::error::{ErrorCode, HistoryError};
use crate::surface::DocumentSurface;

pub use coordinator::{SaveDecision, SaveWindow};
pub use log::{CommitSummary, HistoryLog};
pub use restore::RestoreOutcome;
pub use timer::CoalescingTimer;

/// Read-only projection of history state for UI controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryView {
    pub can_undo: bool,
    pub can_redo: bool,
    pub restoring: bool,
    pub len: usize,
    pub cursor: Option<usize>,
    pub closed: bool,
}

impl HistoryView {
    /// View reported by a session whose surface never came up.
    #[must_use]
    pub fn inert() -> Self {
        Self { closed: true, ..Self::default() }
    }
}

pub(crate) struct HistoryState {
    pub(crate) log: HistoryLog,
    pub(crate) restoring: bool,
    pub(crate) closed: bool,
}

impl HistoryState {
    fn view(&self) -> HistoryView {
        HistoryView {
            can_undo: self.log.can_undo(),
            can_redo: self.log.can_redo(),
            restoring: self.restoring,
            len: self.log.len(),
            cursor: self.log.cursor(),
            closed: self.closed,
        }
    }
}

pub(crate) struct Shared {
    state: Mutex<HistoryState>,
    codec: Arc<dyn SnapshotCodec>,
    surface: Arc<dyn DocumentSurface>,
    stroke_timer: CoalescingTimer,
    erase_timer: CoalescingTimer,
    view: watch::Sender<HistoryView>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, HistoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &HistoryState) {
        self.view.send_replace(state.view());
    }

    fn cancel_timers(&self) {
        self.stroke_timer.cancel_pending();
        self.erase_timer.cancel_pending();
    }

    fn timer(&self, window: SaveWindow) -> &CoalescingTimer {
        match window {
            SaveWindow::Stroke => &self.stroke_timer,
            SaveWindow::Erase => &self.erase_timer,
        }
    }
}

/// Cloneable handle to one document's history.
#[derive(Clone)]
pub struct History {
    shared: Arc<Shared>,
}

impl History {
    /// Create the history for a freshly initialized document and seed it
    /// with one snapshot of the current state.
    #[must_use]
    pub fn new(codec: Arc<dyn SnapshotCodec>, surface: Arc<dyn DocumentSurface>, config: HistoryConfig) -> Self {
        let mut log = HistoryLog::new(config.max_size);
        match codec.capture() {
            Ok(token) => {
                log.commit(token);
            }
            Err(e) => {
                let err = HistoryError::Capture(e);
                warn!(
                    error = %err,
                    error_code = err.error_code(),
                    retryable = err.retryable(),
                    "initial snapshot failed; history starts empty"
                );
            }
        }

        let state = HistoryState { log, restoring: false, closed: false };
        let (view, _) = watch::channel(state.view());
        info!(max_size = config.max_size, entries = state.log.len(), "history initialized");

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                codec,
                surface,
                stroke_timer: CoalescingTimer::new("stroke", config.stroke_coalesce),
                erase_timer: CoalescingTimer::new("erase", config.erase_coalesce),
                view,
            }),
        }
    }

    #[must_use]
    pub fn view(&self) -> HistoryView {
        *self.shared.view.borrow()
    }

    /// Receiver that observes every published [`HistoryView`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HistoryView> {
        self.shared.view.subscribe()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.shared.lock().log.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.shared.lock().log.can_redo()
    }

    #[must_use]
    pub fn is_restoring(&self) -> bool {
        self.shared.lock().restoring
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.lock().log.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.lock().log.is_empty()
    }

    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.shared.lock().log.cursor()
    }

    /// Token at the cursor.
    #[must_use]
    pub fn current(&self) -> Option<Token> {
        self.shared.lock().log.current().cloned()
    }

    /// Copy of every retained token, oldest first.
    #[must_use]
    pub fn tokens(&self) -> Vec<Token> {
        self.shared.lock().log.iter().cloned().collect()
    }

    /// Stop accepting saves and restores and drop pending timers.
    ///
    /// In-flight restores finish their codec call but do not touch the
    /// cursor afterwards.
    pub fn close(&self) {
        self.shared.cancel_timers();
        let mut state = self.shared.lock();
        if !state.closed {
            state.closed = true;
            self.shared.publish(&state);
            info!(entries = state.log.len(), "history closed");
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }
}

#[cfg(test)]
pub(crate) mod test_helpers;

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
