//! Bounded append-and-truncate log of snapshots with a cursor.
//!
//! DESIGN
//! ======
//! Entries live in a `VecDeque` so eviction from the oldest end is O(1).
//! Committing after an undo drops the redo branch; there is only ever one
//! line of history. Recency is log position, never access order.

use std::collections::VecDeque;

use crate::codec::Token;
use crate::error::{Direction, HistoryError};

#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<Token>,
    /// `None` only while empty.
    cursor: Option<usize>,
    max_size: usize,
}

/// What a commit did to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitSummary {
    pub cursor: usize,
    /// Redo entries discarded before the append.
    pub truncated: usize,
    /// Oldest entries evicted to stay within the bound.
    pub evicted: usize,
}

impl HistoryLog {
    /// Empty log holding at most `max_size` entries (at least 1).
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self { entries: VecDeque::with_capacity(max_size), cursor: None, max_size }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    #[must_use]
    pub fn current(&self) -> Option<&Token> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.entries.iter()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// Append `token` as the newest state, dropping any redo branch and
    /// evicting from the front when over capacity.
    pub fn commit(&mut self, token: Token) -> CommitSummary {
        let mut truncated = 0;
        if let Some(cursor) = self.cursor {
            truncated = self.entries.len() - (cursor + 1);
            self.entries.truncate(cursor + 1);
        }

        self.entries.push_back(token);

        let mut evicted = 0;
        while self.entries.len() > self.max_size {
            self.entries.pop_front();
            evicted += 1;
        }

        let cursor = self.entries.len() - 1;
        self.cursor = Some(cursor);
        CommitSummary { cursor, truncated, evicted }
    }

    /// Token one step back from the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::OutOfRange`] when there is nothing to undo.
    pub fn token_before(&self) -> Result<&Token, HistoryError> {
        self.neighbor(Direction::Back).map(|(_, token)| token)
    }

    /// Token one step ahead of the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::OutOfRange`] when there is nothing to redo.
    pub fn token_after(&self) -> Result<&Token, HistoryError> {
        self.neighbor(Direction::Forward).map(|(_, token)| token)
    }

    /// Index and token adjacent to the cursor in `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::OutOfRange`] when no such entry exists.
    pub fn neighbor(&self, direction: Direction) -> Result<(usize, &Token), HistoryError> {
        let allowed = match direction {
            Direction::Back => self.can_undo(),
            Direction::Forward => self.can_redo(),
        };
        let target = match (allowed, self.cursor, direction) {
            (true, Some(c), Direction::Back) => c - 1,
            (true, Some(c), Direction::Forward) => c + 1,
            _ => return Err(self.out_of_range(direction)),
        };
        self.entries
            .get(target)
            .map(|token| (target, token))
            .ok_or_else(|| self.out_of_range(direction))
    }

    /// Move the cursor to `index` after a completed restore.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::OutOfRange`] if `index` is not a valid entry.
    pub fn seek(&mut self, index: usize) -> Result<(), HistoryError> {
        if index >= self.entries.len() {
            let direction = match self.cursor {
                Some(c) if index < c => Direction::Back,
                _ => Direction::Forward,
            };
            return Err(self.out_of_range(direction));
        }
        self.cursor = Some(index);
        Ok(())
    }

    fn out_of_range(&self, direction: Direction) -> HistoryError {
        HistoryError::OutOfRange { direction, cursor: self.cursor, len: self.entries.len() }
    }
}

#[cfg(test)]
#[path = "log_test.rs"]
mod tests;
