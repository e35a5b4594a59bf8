// src/core/history.rs — Fixed-capacity chat history
//
// Holds at most `capacity` turns. Appending past capacity drops the oldest
// turn, so the list handed to the model is always bounded.

use serde::{Serialize, Serializer};
use std::collections::VecDeque;

use super::types::ChatTurn;

/// Turns kept when no capacity is configured.
pub const DEFAULT_HISTORY_CAPACITY: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedHistory {
    turns: VecDeque<ChatTurn>,
    capacity: usize,
}

impl BoundedHistory {
    /// Empty history. A capacity of 0 is clamped to 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// History holding a single seed turn.
    pub fn seeded(capacity: usize, seed: ChatTurn) -> Self {
        let mut history = Self::with_capacity(capacity);
        history.append(seed);
        history
    }

    /// Push at the back, evicting from the front while over capacity.
    pub fn append(&mut self, turn: ChatTurn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.capacity {
            self.turns.pop_front();
        }
    }

    /// Swap in a loaded conversation, keeping only its newest `capacity` turns.
    pub fn replace<I>(&mut self, turns: I)
    where
        I: IntoIterator<Item = ChatTurn>,
    {
        self.turns.clear();
        for turn in turns {
            self.append(turn);
        }
    }

    /// Oldest first.
    pub fn to_list(&self) -> Vec<ChatTurn> {
        self.turns.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatTurn> {
        self.turns.iter()
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.back()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for BoundedHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

// Rendered as a plain list of turns.
impl Serialize for BoundedHistory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.turns.iter())
    }
}
