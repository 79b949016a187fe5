//! Snapshot codec boundary: opaque tokens and the capture/restore contract.

use std::fmt;
use std::sync::Arc;

use crate::error::CodecError;

/// Opaque, immutable serialized document state.
///
/// Cloning is cheap; equality compares the serialized bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token(Arc<str>);

impl Token {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(Arc::from(value))
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Snapshots can be large; show a bounded prefix.
        let prefix: String = self.0.chars().take(32).collect();
        if prefix.len() < self.0.len() {
            write!(f, "Token({prefix:?}.. {} bytes)", self.0.len())
        } else {
            write!(f, "Token({prefix:?})")
        }
    }
}

/// Turns the live document into a [`Token`] and back.
#[async_trait::async_trait]
pub trait SnapshotCodec: Send + Sync {
    /// Serialize the current document state.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if the document cannot be serialized.
    fn capture(&self) -> Result<Token, CodecError>;

    /// Replace the document contents with the state held in `token`.
    /// Settles exactly once.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] if the token cannot be decoded or applied.
    async fn restore(&self, token: &Token) -> Result<(), CodecError>;
}
