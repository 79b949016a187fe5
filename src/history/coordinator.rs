//! Save coordinator: decides when a snapshot is committed.
//!
//! DESIGN
//! ======
//! Trigger sources never commit directly. A save request arms one of two
//! coalescing timers; the capture happens when the timer fires, so the
//! committed token reflects the document after the last event of the burst.
//! Strokes use the short window because the document is already settled
//! when the stroke event fires. Erasing emits a burst of modify/remove
//! notifications per gesture and uses the long window, re-armed on every
//! request. A pointer-up ending an erase gesture forces an immediate commit
//! and cancels both timers.
//!
//! The guard flag is checked twice: when the request arrives and again at
//! commit time, since a timer armed before a restore started may fire while
//! it is still in flight.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::{History, Shared};
use crate::codec::Token;
use crate::error::{ErrorCode, HistoryError};

/// Which coalescing window a save request uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveWindow {
    /// Stroke-completed triggers.
    Stroke,
    /// Erase-completed / object-modified / object-removed while erasing.
    Erase,
}

impl SaveWindow {
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            Self::Stroke => "stroke",
            Self::Erase => "erase",
        }
    }
}

/// What happened to a save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveDecision {
    /// A coalescing timer is armed; the commit happens when it fires.
    Scheduled,
    /// A snapshot was appended and the cursor now points at it.
    Committed { cursor: usize },
    /// The document matches the entry at the cursor; nothing was appended.
    Unchanged { cursor: usize },
    /// Dropped because a restore is in flight.
    Suppressed,
    /// Dropped because the history is closed.
    Closed,
    /// The snapshot could not be captured; the log is unchanged.
    Failed,
}

impl History {
    /// Ask for a save, coalesced with other requests in the same window.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn request_save(&self, window: SaveWindow) -> SaveDecision {
        if let Some(rejected) = self.save_gate() {
            trace!(reason = window.reason(), ?rejected, "save request dropped");
            return rejected;
        }

        let weak = Arc::downgrade(&self.shared);
        self.shared.timer(window).schedule(move || {
            if let Some(shared) = weak.upgrade() {
                History { shared }.commit_now(window.reason());
            }
        });
        SaveDecision::Scheduled
    }

    /// Commit now, cancelling any pending coalesced save.
    pub fn force_save(&self, reason: &'static str) -> SaveDecision {
        if let Some(rejected) = self.save_gate() {
            trace!(reason, ?rejected, "forced save dropped");
            return rejected;
        }

        self.shared.stroke_timer.cancel_pending();
        self.shared.erase_timer.force_now(|| self.commit_now(reason))
    }

    /// Commit a coalesced save that is still waiting on its timer.
    ///
    /// Returns `None` when nothing was pending or saves are gated.
    pub(crate) fn flush_pending_save(&self, reason: &'static str) -> Option<SaveDecision> {
        if self.save_gate().is_some() {
            return None;
        }
        let stroke = self.shared.stroke_timer.cancel_pending();
        let erase = self.shared.erase_timer.cancel_pending();
        (stroke || erase).then(|| self.commit_now(reason))
    }

    /// Whether either coalescing timer is waiting to fire.
    #[must_use]
    pub fn has_pending_save(&self) -> bool {
        self.shared.stroke_timer.is_pending() || self.shared.erase_timer.is_pending()
    }

    fn save_gate(&self) -> Option<SaveDecision> {
        let state = self.shared.lock();
        if state.closed {
            Some(SaveDecision::Closed)
        } else if state.restoring {
            Some(SaveDecision::Suppressed)
        } else {
            None
        }
    }

    /// Capture the document and append it to the log.
    pub(crate) fn commit_now(&self, reason: &str) -> SaveDecision {
        if let Some(rejected) = self.save_gate() {
            debug!(reason, ?rejected, "commit rejected");
            return rejected;
        }

        // Capture outside the lock: the codec may emit surface events whose
        // handlers call back into the history.
        let token = match self.shared.codec.capture() {
            Ok(token) => token,
            Err(e) => {
                let err = HistoryError::Capture(e);
                warn!(
                    reason,
                    error = %err,
                    error_code = err.error_code(),
                    retryable = err.retryable(),
                    "snapshot capture failed"
                );
                return SaveDecision::Failed;
            }
        };

        commit_token(&self.shared, reason, token)
    }
}

fn commit_token(shared: &Shared, reason: &str, token: Token) -> SaveDecision {
    let mut state = shared.lock();
    // A restore may have started while the codec was capturing.
    if state.closed {
        return SaveDecision::Closed;
    }
    if state.restoring {
        debug!(reason, "commit rejected: restore started during capture");
        return SaveDecision::Suppressed;
    }

    if let Some(cursor) = state.log.cursor() {
        if state.log.current() == Some(&token) {
            trace!(reason, cursor, "document unchanged; commit skipped");
            return SaveDecision::Unchanged { cursor };
        }
    }

    let summary = state.log.commit(token);
    debug!(
        reason,
        cursor = summary.cursor,
        len = state.log.len(),
        truncated = summary.truncated,
        evicted = summary.evicted,
        "history commit"
    );
    shared.publish(&state);
    SaveDecision::Committed { cursor: summary.cursor }
}

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod tests;
