//! Error types for the history subsystem and its collaborators.
//!
//! ERROR HANDLING
//! ==============
//! Errors are typed per boundary and carry a stable code via [`ErrorCode`]
//! so log records can be filtered without string matching. None of these
//! escape the public `History` / `DrawingSession` operations: callers get
//! outcome values and the failure itself lands in the log.

use std::fmt;

/// Stable machine-readable code attached to log records.
pub trait ErrorCode: fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Which way an undo/redo step moves the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Back,
    Forward,
}

impl Direction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Back => "undo",
            Self::Forward => "redo",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// CODEC
// =============================================================================

/// Failures from the snapshot codec boundary.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("snapshot encode failed: {0}")]
    Encode(String),
    #[error("snapshot decode failed: {0}")]
    Decode(String),
    #[error("document rejected snapshot: {0}")]
    Rejected(String),
}

impl ErrorCode for CodecError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Encode(_) => "E_SNAPSHOT_ENCODE",
            Self::Decode(_) => "E_SNAPSHOT_DECODE",
            Self::Rejected(_) => "E_SNAPSHOT_REJECTED",
        }
    }
}

// =============================================================================
// HISTORY
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// Nothing to step to in the requested direction.
    #[error("nothing to {direction} (cursor {cursor:?}, {len} entries)")]
    OutOfRange { direction: Direction, cursor: Option<usize>, len: usize },
    #[error("restore failed: {0}")]
    Restore(#[source] CodecError),
    #[error("capture failed: {0}")]
    Capture(#[source] CodecError),
}

impl ErrorCode for HistoryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "E_OUT_OF_RANGE",
            Self::Restore(_) => "E_RESTORE_FAILED",
            Self::Capture(_) => "E_CAPTURE_FAILED",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Restore(_) | Self::Capture(_))
    }
}

// =============================================================================
// SURFACE
// =============================================================================

/// Failures constructing or disposing a document surface.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("surface initialization failed: {0}")]
    Initialization(String),
    #[error("surface teardown failed: {0}")]
    Teardown(String),
}

impl ErrorCode for SurfaceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Initialization(_) => "E_SURFACE_INIT",
            Self::Teardown(_) => "E_SURFACE_TEARDOWN",
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
