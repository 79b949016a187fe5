//! History tuning parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_HISTORY_MAX_SIZE: usize = 50;
pub const DEFAULT_STROKE_COALESCE_MS: u64 = 10;
pub const DEFAULT_ERASE_COALESCE_MS: u64 = 50;

/// Tuning knobs for the history subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of snapshots retained. Never below 1.
    pub max_size: usize,
    /// Coalescing window for stroke-completed triggers.
    pub stroke_coalesce: Duration,
    /// Coalescing window for erase-related triggers.
    pub erase_coalesce: Duration,
}

impl HistoryConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `SKETCHPAD_HISTORY_MAX_SIZE`: default 50, clamped to at least 1
    /// - `SKETCHPAD_STROKE_COALESCE_MS`: default 10
    /// - `SKETCHPAD_ERASE_COALESCE_MS`: default 50
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_size: env_parse("SKETCHPAD_HISTORY_MAX_SIZE", DEFAULT_HISTORY_MAX_SIZE).max(1),
            stroke_coalesce: Duration::from_millis(env_parse(
                "SKETCHPAD_STROKE_COALESCE_MS",
                DEFAULT_STROKE_COALESCE_MS,
            )),
            erase_coalesce: Duration::from_millis(env_parse(
                "SKETCHPAD_ERASE_COALESCE_MS",
                DEFAULT_ERASE_COALESCE_MS,
            )),
        }
    }

    #[must_use]
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size.max(1);
        self
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_HISTORY_MAX_SIZE,
            stroke_coalesce: Duration::from_millis(DEFAULT_STROKE_COALESCE_MS),
            erase_coalesce: Duration::from_millis(DEFAULT_ERASE_COALESCE_MS),
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
