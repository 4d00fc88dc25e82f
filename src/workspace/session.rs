//! Session and workspace records.

use crate::persistence::HistoryEntry;
use serde::{Deserialize, Serialize};

/// Id prefix of sessions created by "new query".
pub const SCRATCH_ID_PREFIX: &str = "query_";

/// One query-authoring tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub query_text: String,
}

impl Session {
    pub fn new(id: impl Into<String>, title: impl Into<String>, query_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            query_text: query_text.into(),
        }
    }

    /// True for "new query" sessions, which have no backing resource.
    pub fn is_scratch(&self) -> bool {
        self.id.starts_with(SCRATCH_ID_PREFIX)
    }
}

/// The open sessions, in tab order, plus which one is active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workspace {
    pub sessions: Vec<Session>,
    pub active_session_id: Option<String>,
}

impl Workspace {
    /// Returns the session with the given id.
    pub fn session(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Returns the position of the session with the given id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.sessions.iter().position(|s| s.id == id)
    }

    /// Returns the active session.
    pub fn active_session(&self) -> Option<&Session> {
        self.active_session_id
            .as_deref()
            .and_then(|id| self.session(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}

/// The document written to the keyed store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub sessions: Vec<Session>,
    /// Empty string when no session is active.
    #[serde(default)]
    pub active_session_id: String,
    #[serde(default)]
    pub history_entries: Vec<HistoryEntry>,
    #[serde(default = "default_query_count")]
    pub query_count: u64,
}

fn default_query_count() -> u64 {
    1
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            sessions: Vec::new(),
            active_session_id: String::new(),
            history_entries: Vec::new(),
            query_count: default_query_count(),
        }
    }
}
