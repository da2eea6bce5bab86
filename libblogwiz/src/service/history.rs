//! History ledger
//!
//! Newest-first log of save/publish snapshots with a fixed capacity.
//! Appending past capacity evicts from the tail, i.e. the oldest entries.
//! Eviction follows insertion order only; reading an entry does not keep it
//! alive.

use std::collections::VecDeque;

use serde::Serialize;

use crate::types::{HistoryEntry, PostStatus};

/// Maximum number of entries kept
pub const HISTORY_CAPACITY: usize = 100;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryLedger {
    entries: VecDeque<HistoryEntry>,
}

/// Counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    pub total: usize,
    pub drafts: usize,
    pub published: usize,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from entries already in newest-first order
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        let mut ledger = Self::new();
        ledger.replace_all(entries);
        ledger
    }

    /// Insert at the front, evicting the oldest entries beyond capacity
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        while self.entries.len() > HISTORY_CAPACITY {
            if let Some(evicted) = self.entries.pop_back() {
                tracing::debug!(history_id = %evicted.id, "evicted oldest history entry");
            }
        }
    }

    /// Remove the entry with `id`; returns whether anything was removed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Entries newest-first, optionally only those with `status`
    pub fn list(&self, status: Option<PostStatus>) -> Vec<&HistoryEntry> {
        self.entries
            .iter()
            .filter(|entry| status.map_or(true, |s| entry.status == s))
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Owned copy of every entry, newest-first
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Replace the whole ledger, keeping at most the first (newest) 100
    pub fn replace_all(&mut self, entries: Vec<HistoryEntry>) {
        if entries.len() > HISTORY_CAPACITY {
            tracing::warn!(
                received = entries.len(),
                kept = HISTORY_CAPACITY,
                "history over capacity, dropping oldest entries"
            );
        }
        self.entries = entries.into_iter().take(HISTORY_CAPACITY).collect();
    }

    pub fn stats(&self) -> HistoryStats {
        let published = self
            .entries
            .iter()
            .filter(|entry| entry.status == PostStatus::Published)
            .count();
        HistoryStats {
            total: self.entries.len(),
            drafts: self.entries.len() - published,
            published,
        }
    }
}
