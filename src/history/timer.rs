//! Cancellable coalescing timer.
//!
//! DESIGN
//! ======
//! Each `schedule` spawns a Tokio task that sleeps for the configured delay
//! and then runs its callback. Re-scheduling aborts the previous task first,
//! so a burst of requests collapses into one run at the end of the burst.
//! The callback is synchronous: once the sleep completes it runs to the end
//! without yielding, so an abort either prevents it entirely or not at all.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

pub struct CoalescingTimer {
    label: &'static str,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl CoalescingTimer {
    #[must_use]
    pub fn new(label: &'static str, delay: Duration) -> Self {
        Self { label, delay, pending: Mutex::new(None) }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `fire` after the delay, replacing any pending run.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire();
        });

        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            if !previous.is_finished() {
                previous.abort();
                trace!(timer = self.label, "coalescing timer re-armed");
            }
        }
    }

    /// Drop the pending run, if any. Returns whether one was still waiting.
    pub fn cancel_pending(&self) -> bool {
        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match previous {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    /// Cancel any pending run and invoke `fire` immediately.
    pub fn force_now<F, R>(&self, fire: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.cancel_pending();
        fire()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for CoalescingTimer {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
#[path = "timer_test.rs"]
mod tests;
