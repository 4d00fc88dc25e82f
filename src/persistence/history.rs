//! Query history tracking.
//!
//! Keeps a bounded, most-recent-first list of opened queries, deduplicated by
//! title. Replaying an entry never touches the list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default number of entries retained.
pub const MAX_HISTORY_ENTRIES: usize = 15;

/// A query history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Millisecond timestamp, strictly increasing across entries.
    pub id: i64,
    pub query: String,
    pub title: String,
    #[serde(alias = "timestamp")]
    pub captured_at: DateTime<Utc>,
}

/// Bounded, title-deduplicated recency list.
#[derive(Debug, Clone)]
pub struct HistoryTracker {
    /// Most recent first.
    entries: Vec<HistoryEntry>,
    max_entries: usize,
    last_id: i64,
}

impl Default for HistoryTracker {
    fn default() -> Self {
        Self::new(MAX_HISTORY_ENTRIES)
    }
}

impl HistoryTracker {
    /// Creates an empty tracker holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
            last_id: 0,
        }
    }

    /// Rebuilds a tracker from persisted entries.
    ///
    /// Later duplicates of a title are dropped and the list is cut to the cap,
    /// so a hand-edited record cannot break the invariants.
    pub fn from_entries(entries: Vec<HistoryEntry>, max_entries: usize) -> Self {
        let mut tracker = Self::new(max_entries);
        for entry in entries {
            if tracker.contains_title(&entry.title) {
                continue;
            }
            tracker.last_id = tracker.last_id.max(entry.id);
            tracker.entries.push(entry);
        }
        tracker.entries.truncate(max_entries);
        tracker
    }

    /// Records an opened query.
    ///
    /// Returns false without changing anything if an entry with the same
    /// title already exists.
    pub fn record(&mut self, query: &str, title: &str) -> bool {
        if self.contains_title(title) {
            debug!("History already has an entry titled '{title}'");
            return false;
        }

        let captured_at = Utc::now();
        let id = self.next_id(captured_at);
        self.entries.insert(
            0,
            HistoryEntry {
                id,
                query: query.to_string(),
                title: title.to_string(),
                captured_at,
            },
        );
        self.entries.truncate(self.max_entries);
        true
    }

    /// Looks up an entry for display or re-opening. Read-only.
    pub fn select(&self, id: i64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Returns true if an entry with the given title exists.
    pub fn contains_title(&self, title: &str) -> bool {
        self.entries.iter().any(|e| e.title == title)
    }

    /// Returns all entries, most recent first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Clears all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn next_id(&mut self, at: DateTime<Utc>) -> i64 {
        let id = at.timestamp_millis().max(self.last_id.saturating_add(1));
        self.last_id = id;
        id
    }
}
