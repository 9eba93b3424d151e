use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of throws kept for display unless configured otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 15;

/// A single throw, recorded by point index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
}

/// Fixed-capacity FIFO of the most recent throws.
///
/// Display only: nothing in the engine reads it back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryLog {
    entries: VecDeque<Transition>,
    capacity: usize,
}

impl HistoryLog {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be positive");
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a throw, evicting the oldest entry when full.
    pub fn record(&mut self, transition: Transition) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(transition);
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Transition> + '_ {
        self.entries.iter()
    }

    /// Entries from newest to oldest.
    pub fn recent_first(&self) -> impl Iterator<Item = &Transition> + '_ {
        self.entries.iter().rev()
    }

    pub fn latest(&self) -> Option<&Transition> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn to_vec(&self) -> Vec<Transition> {
        self.entries.iter().copied().collect()
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
