//! Undo/redo key combinations.

use std::str::FromStr;

/// A key press with its modifier state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyCombo {
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self { key: key.to_owned(), ctrl: false, meta: false, shift: false }
    }

    #[must_use]
    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[must_use]
    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    #[must_use]
    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Undo,
    Redo,
}

/// Ctrl/Cmd+Z undoes; Ctrl/Cmd+Shift+Z and Ctrl/Cmd+Y redo.
#[must_use]
pub fn match_shortcut(combo: &KeyCombo) -> Option<Shortcut> {
    if !(combo.ctrl || combo.meta) {
        return None;
    }
    match combo.key.to_ascii_lowercase().as_str() {
        "z" if combo.shift => Some(Shortcut::Redo),
        "z" => Some(Shortcut::Undo),
        "y" => Some(Shortcut::Redo),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("empty key combination")]
    Empty,
    #[error("unknown modifier: {0}")]
    UnknownModifier(String),
}

impl crate::error::ErrorCode for KeyParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "E_KEY_EMPTY",
            Self::UnknownModifier(_) => "E_KEY_MODIFIER",
        }
    }
}

/// Parses `ctrl+shift+z`, `cmd+y`, `z` and similar.
impl FromStr for KeyCombo {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let key = match parts.pop() {
            Some(key) if !key.is_empty() => key,
            _ => return Err(KeyParseError::Empty),
        };

        let mut combo = KeyCombo::new(key);
        for modifier in parts {
            match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => combo.ctrl = true,
                "cmd" | "meta" | "super" => combo.meta = true,
                "shift" => combo.shift = true,
                other => return Err(KeyParseError::UnknownModifier(other.to_owned())),
            }
        }
        Ok(combo)
    }
}

#[cfg(test)]
#[path = "keys_test.rs"]
mod tests;
