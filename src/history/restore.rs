//! Restore orchestrator: undo/redo through the codec.
//!
//! DESIGN
//! ======
//! `Idle --undo/redo--> Restoring --completion|failure--> Idle`.
//!
//! The guard flag is raised synchronously, before the first `.await`, so a
//! second undo/redo arriving while the first is in flight is rejected rather
//! than queued, and any save request in that window is suppressed. The flag
//! is lowered by a drop guard, which covers success, codec failure, and the
//! restore future being dropped mid-flight.
//!
//! A coalesced save still waiting on its timer is committed before the guard
//! goes up, and any timer armed after that is cancelled once it is up.
//!
//! The cursor moves only after the codec reports success. A failed restore
//! leaves the cursor where it was; the document may be partially restored
//! but the log is intact and the next undo/redo starts from a known index.

use tracing::{debug, error, info, trace};

use super::{History, Shared};
use crate::codec::Token;
use crate::error::{Direction, ErrorCode, HistoryError};

/// Result of an undo/redo request. Failures are logged, never returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The document now shows the entry at `cursor`.
    Restored { cursor: usize },
    /// Nothing to undo/redo; the codec was not called.
    OutOfRange,
    /// Another restore is in flight; the codec was not called.
    InFlight,
    /// The codec failed; the cursor is unchanged.
    Failed,
    /// The history is closed.
    Closed,
}

impl History {
    /// Restore the previous snapshot.
    pub async fn undo(&self) -> RestoreOutcome {
        self.step(Direction::Back).await
    }

    /// Restore the next snapshot.
    pub async fn redo(&self) -> RestoreOutcome {
        self.step(Direction::Forward).await
    }

    async fn step(&self, direction: Direction) -> RestoreOutcome {
        // Undo steps back from the latest edit, not from the last commit.
        if let Some(decision) = self.flush_pending_save(direction.as_str()) {
            debug!(%direction, ?decision, "pending save flushed before restore");
        }

        let (target, token) = match self.begin_restore(direction) {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };
        let _guard = RestoreGuard { shared: &self.shared };
        // Anything armed after the flush would capture the restored document.
        self.shared.cancel_timers();

        match self.apply(&token).await {
            Ok(()) => self.finish_restore(direction, target),
            Err(err) if self.is_closed() => {
                debug!(%direction, error = %err, "restore failed after close");
                RestoreOutcome::Closed
            }
            Err(err) => {
                error!(
                    %direction,
                    error = %err,
                    error_code = err.error_code(),
                    retryable = err.retryable(),
                    "restore failed; cursor unchanged"
                );
                RestoreOutcome::Failed
            }
        }
    }

    /// Raise the guard and pick the target entry, or explain why not.
    fn begin_restore(&self, direction: Direction) -> Result<(usize, Token), RestoreOutcome> {
        let mut state = self.shared.lock();
        if state.closed {
            return Err(RestoreOutcome::Closed);
        }
        if state.restoring {
            debug!(%direction, "restore already in flight; request rejected");
            return Err(RestoreOutcome::InFlight);
        }

        let (target, token) = match state.log.neighbor(direction) {
            Ok((target, token)) => (target, token.clone()),
            Err(e) => {
                trace!(error = %e, "restore skipped");
                return Err(RestoreOutcome::OutOfRange);
            }
        };

        state.restoring = true;
        self.shared.publish(&state);
        Ok((target, token))
    }

    async fn apply(&self, token: &Token) -> Result<(), HistoryError> {
        self.shared.surface.clear();
        self.shared.codec.restore(token).await.map_err(HistoryError::Restore)
    }

    fn finish_restore(&self, direction: Direction, target: usize) -> RestoreOutcome {
        {
            let mut state = self.shared.lock();
            if state.closed {
                debug!(%direction, "restore finished after close; ignoring");
                return RestoreOutcome::Closed;
            }
            if let Err(err) = state.log.seek(target) {
                error!(
                    %direction,
                    error = %err,
                    error_code = err.error_code(),
                    retryable = err.retryable(),
                    "restore target vanished"
                );
                return RestoreOutcome::Failed;
            }
        }

        self.shared.surface.render();
        self.shared.surface.set_drawing_mode(true);
        info!(%direction, cursor = target, "restore applied");
        RestoreOutcome::Restored { cursor: target }
    }
}

/// Lowers the guard flag on every exit path of a restore.
struct RestoreGuard<'a> {
    shared: &'a Shared,
}

impl Drop for RestoreGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        state.restoring = false;
        self.shared.publish(&state);
    }
}

#[cfg(test)]
#[path = "restore_test.rs"]
mod tests;
