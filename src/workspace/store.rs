//! Session store.
//!
//! Owns the workspace and the query history, routes every mutation through
//! its methods, and writes the whole record to the keyed store afterwards.

use super::session::{PersistedState, Session, Workspace, SCRATCH_ID_PREFIX};
use crate::error::{QueryDeckError, Result};
use crate::persistence::{HistoryEntry, HistoryTracker, KeyValueStore};
use std::sync::Arc;
use tracing::{debug, info, warn};

const APP_TITLE: &str = "SQL Query Editor";

/// State container for the open sessions and the history.
pub struct SessionStore {
    workspace: Workspace,
    history: HistoryTracker,
    /// Counter behind "New Query N" titles and `query_N` ids.
    query_count: u64,
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl SessionStore {
    /// Creates an empty store that persists under `key`.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, max_history: usize) -> Self {
        Self {
            workspace: Workspace::default(),
            history: HistoryTracker::new(max_history),
            query_count: 1,
            store,
            key: key.into(),
        }
    }

    /// Reads the persisted record once.
    ///
    /// A missing or unparsable record yields an empty workspace; the failure
    /// is logged and the corrupt record is moved aside.
    pub fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>, max_history: usize) -> Self {
        let mut this = Self::new(store, key, max_history);

        match this.read_state() {
            Ok(Some(state)) => this.restore(state),
            Ok(None) => debug!("No saved workspace under '{}'", this.key),
            Err(e) => {
                warn!("{e}; starting with an empty workspace");
                if let Err(e) = this.store.quarantine(&this.key) {
                    warn!("{e}");
                }
            }
        }

        this
    }

    fn read_state(&self) -> Result<Option<PersistedState>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw).map(Some).map_err(|e| {
            QueryDeckError::persistence_read(format!(
                "Saved workspace '{}' is unreadable: {e}",
                self.key
            ))
        })
    }

    fn restore(&mut self, state: PersistedState) {
        let mut sessions: Vec<Session> = Vec::with_capacity(state.sessions.len());
        for session in state.sessions {
            if sessions.iter().any(|s| s.id == session.id) {
                warn!("Dropping duplicate saved session '{}'", session.id);
                continue;
            }
            sessions.push(session);
        }

        let active = if sessions.iter().any(|s| s.id == state.active_session_id) {
            Some(state.active_session_id)
        } else {
            sessions.first().map(|s| s.id.clone())
        };

        info!(
            "Restored {} session(s) and {} history entries",
            sessions.len(),
            state.history_entries.len()
        );

        self.workspace = Workspace {
            sessions,
            active_session_id: active,
        };
        self.history = HistoryTracker::from_entries(state.history_entries, self.history.max_entries());
        self.query_count = state.query_count.max(1);
    }

    /// Returns the workspace.
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Returns the query history.
    pub fn history(&self) -> &HistoryTracker {
        &self.history
    }

    /// Returns the active session id.
    pub fn active_session_id(&self) -> Option<&str> {
        self.workspace.active_session_id.as_deref()
    }

    /// Appends a session with a fresh id and makes it active.
    pub fn create_session(&mut self, title: &str, initial_query_text: &str) -> String {
        let id = self.fresh_id();
        debug!("Creating session '{id}' ({title})");

        self.workspace
            .sessions
            .push(Session::new(id.clone(), title, initial_query_text));
        self.workspace.active_session_id = Some(id.clone());
        self.persist();
        id
    }

    /// Activates the session keyed by `title`, creating it if needed.
    ///
    /// Only a newly created session is recorded in the history. Returns true
    /// if a session was created.
    pub fn open_or_focus(&mut self, title: &str, query_text: &str) -> bool {
        if self.workspace.contains(title) {
            debug!("Focusing existing session '{title}'");
            self.set_active(title);
            return false;
        }

        debug!("Opening session '{title}'");
        self.workspace
            .sessions
            .push(Session::new(title, title, query_text));
        self.workspace.active_session_id = Some(title.to_string());
        self.history.record(query_text, title);
        self.persist();
        true
    }

    /// Re-opens a history entry without recording it again.
    ///
    /// A session already holding the same query text is activated instead
    /// of opening a duplicate. Returns the activated session id.
    pub fn open_from_history(&mut self, entry_id: i64) -> Option<String> {
        let entry: HistoryEntry = self.history.select(entry_id)?.clone();

        let existing = self
            .workspace
            .sessions
            .iter()
            .find(|s| s.query_text == entry.query)
            .map(|s| s.id.clone());
        if let Some(id) = existing {
            self.set_active(&id);
            return Some(id);
        }

        let id = format!("history-{}", entry.id);
        if !self.workspace.contains(&id) {
            self.workspace
                .sessions
                .push(Session::new(id.clone(), entry.title, entry.query));
        }
        self.workspace.active_session_id = Some(id.clone());
        self.persist();
        Some(id)
    }

    /// Removes a session and picks the new active one.
    ///
    /// The session now at the closed position (wrapping around) becomes
    /// active. Closing an unknown id changes nothing.
    pub fn close_session(&mut self, id: &str) -> Option<String> {
        let Some(index) = self.workspace.position(id) else {
            debug!("Close requested for unknown session '{id}'");
            return self.workspace.active_session_id.clone();
        };

        self.workspace.sessions.remove(index);
        let remaining = self.workspace.sessions.len();
        self.workspace.active_session_id = if remaining == 0 {
            None
        } else {
            Some(self.workspace.sessions[index % remaining].id.clone())
        };

        debug!(
            "Closed session '{id}', active is now {:?}",
            self.workspace.active_session_id
        );
        self.persist();
        self.workspace.active_session_id.clone()
    }

    /// Makes `id` the active session. Returns false if it does not exist.
    pub fn activate(&mut self, id: &str) -> bool {
        if !self.workspace.contains(id) {
            return false;
        }
        self.set_active(id);
        true
    }

    /// Replaces the query text of one session. Returns false if it does not exist.
    pub fn update_session_query_text(&mut self, id: &str, text: &str) -> bool {
        let Some(session) = self.workspace.sessions.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        session.query_text = text.to_string();
        self.persist();
        true
    }

    /// Title for the next "new query" session.
    pub fn next_query_title(&self) -> String {
        format!("New Query {}", self.query_count)
    }

    /// Window title reflecting the active session.
    pub fn window_title(&self) -> String {
        match self.active_session_id() {
            Some(id) => format!("{id} | {APP_TITLE}"),
            None => APP_TITLE.to_string(),
        }
    }

    /// Returns the record that `save` writes.
    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            sessions: self.workspace.sessions.clone(),
            active_session_id: self.workspace.active_session_id.clone().unwrap_or_default(),
            history_entries: self.history.entries().to_vec(),
            query_count: self.query_count,
        }
    }

    /// Writes the whole record to the keyed store.
    pub fn save(&self) -> Result<()> {
        let payload = serde_json::to_string(&self.snapshot()).map_err(|e| {
            QueryDeckError::persistence_write(format!("Failed to serialize workspace: {e}"))
        })?;
        self.store.set(&self.key, &payload)
    }

    /// Saves after a mutation. Failures are logged; memory stays authoritative.
    fn persist(&self) {
        if let Err(e) = self.save() {
            warn!("{e}");
        }
    }

    fn set_active(&mut self, id: &str) {
        if self.workspace.active_session_id.as_deref() == Some(id) {
            return;
        }
        self.workspace.active_session_id = Some(id.to_string());
        self.persist();
    }

    fn fresh_id(&mut self) -> String {
        loop {
            let id = format!("{SCRATCH_ID_PREFIX}{}", self.query_count);
            self.query_count += 1;
            if !self.workspace.contains(&id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use pretty_assertions::assert_eq;

    const KEY: &str = "sqlEditorState";

    fn store() -> (SessionStore, Arc<MemoryStore>) {
        let backing = Arc::new(MemoryStore::new());
        (SessionStore::load(backing.clone(), KEY, 15), backing)
    }

    fn ids(store: &SessionStore) -> Vec<&str> {
        store
            .workspace()
            .sessions
            .iter()
            .map(|s| s.id.as_str())
            .collect()
    }

    #[test]
    fn test_create_session_activates_and_persists() {
        let (mut sessions, backing) = store();
        let id = sessions.create_session("New Query 1", "SELECT 1;");

        assert_eq!(id, "query_1");
        assert_eq!(sessions.active_session_id(), Some("query_1"));
        assert!(backing.get(KEY).unwrap().unwrap().contains("query_1"));
        assert!(sessions.history().is_empty());
    }

    #[test]
    fn test_create_session_ids_are_unique() {
        let (mut sessions, _) = store();
        let a = sessions.create_session("New Query 1", "");
        let b = sessions.create_session("New Query 2", "");
        sessions.close_session(&a);
        let c = sessions.create_session("New Query 3", "");

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_next_query_title_follows_counter() {
        let (mut sessions, _) = store();
        assert_eq!(sessions.next_query_title(), "New Query 1");
        sessions.create_session("New Query 1", "");
        assert_eq!(sessions.next_query_title(), "New Query 2");
    }

    #[test]
    fn test_open_or_focus_records_once() {
        let (mut sessions, _) = store();
        assert!(sessions.open_or_focus("orders", "SELECT * FROM orders;"));
        sessions.create_session("New Query 1", "");
        assert!(!sessions.open_or_focus("orders", "SELECT 2;"));

        assert_eq!(sessions.active_session_id(), Some("orders"));
        assert_eq!(sessions.workspace().len(), 2);
        assert_eq!(
            sessions.workspace().session("orders").unwrap().query_text,
            "SELECT * FROM orders;"
        );
        assert_eq!(sessions.history().len(), 1);
        assert_eq!(sessions.history().entries()[0].query, "SELECT * FROM orders;");
    }

    #[test]
    fn test_close_session_wraps_around() {
        let (mut sessions, _) = store();
        sessions.open_or_focus("A", "");
        sessions.open_or_focus("B", "");
        sessions.open_or_focus("C", "");
        sessions.activate("B");

        assert_eq!(sessions.close_session("B").as_deref(), Some("C"));
        assert_eq!(ids(&sessions), vec!["A", "C"]);

        // Closing the last position wraps to the first
        assert_eq!(sessions.close_session("C").as_deref(), Some("A"));
        assert_eq!(sessions.close_session("A"), None);
        assert!(sessions.workspace().is_empty());
        assert_eq!(sessions.workspace().active_session_id, None);
    }

    #[test]
    fn test_close_unknown_session_is_noop() {
        let (mut sessions, _) = store();
        sessions.open_or_focus("A", "");
        sessions.open_or_focus("B", "");

        assert_eq!(sessions.close_session("Z").as_deref(), Some("B"));
        assert_eq!(ids(&sessions), vec!["A", "B"]);
    }

    #[test]
    fn test_update_query_text_touches_one_session() {
        let (mut sessions, backing) = store();
        sessions.open_or_focus("A", "a");
        sessions.open_or_focus("B", "b");

        assert!(sessions.update_session_query_text("A", "SELECT 42;"));
        assert!(!sessions.update_session_query_text("missing", "x"));

        assert_eq!(sessions.workspace().session("A").unwrap().query_text, "SELECT 42;");
        assert_eq!(sessions.workspace().session("B").unwrap().query_text, "b");
        assert!(backing.get(KEY).unwrap().unwrap().contains("SELECT 42;"));
    }

    #[test]
    fn test_open_from_history_does_not_record() {
        let (mut sessions, _) = store();
        sessions.open_or_focus("orders", "SELECT * FROM orders;");
        let entry_id = sessions.history().entries()[0].id;
        let before = sessions.history().entries().to_vec();

        sessions.close_session("orders");
        let id = sessions.open_from_history(entry_id).unwrap();

        assert_eq!(id, format!("history-{entry_id}"));
        assert_eq!(sessions.workspace().session(&id).unwrap().title, "orders");
        assert_eq!(sessions.history().entries(), before.as_slice());
    }

    #[test]
    fn test_open_from_history_focuses_matching_query() {
        let (mut sessions, _) = store();
        sessions.open_or_focus("orders", "SELECT * FROM orders;");
        sessions.open_or_focus("regions", "SELECT * FROM regions;");
        let orders_entry = sessions.history().entries()[1].id;

        assert_eq!(sessions.open_from_history(orders_entry).as_deref(), Some("orders"));
        assert_eq!(sessions.workspace().len(), 2);
        assert_eq!(sessions.open_from_history(-5), None);
    }

    #[test]
    fn test_window_title() {
        let (mut sessions, _) = store();
        assert_eq!(sessions.window_title(), "SQL Query Editor");
        sessions.open_or_focus("orders", "");
        assert_eq!(sessions.window_title(), "orders | SQL Query Editor");
    }

    #[test]
    fn test_reload_restores_everything() {
        let (mut sessions, backing) = store();
        sessions.open_or_focus("orders", "SELECT * FROM orders;");
        sessions.create_session("New Query 1", "SELECT 1;");
        sessions.activate("orders");

        let reloaded = SessionStore::load(backing, KEY, 15);
        assert_eq!(reloaded.workspace(), sessions.workspace());
        assert_eq!(reloaded.history().entries(), sessions.history().entries());
        assert_eq!(reloaded.next_query_title(), "New Query 2");
    }

    #[test]
    fn test_corrupt_record_yields_empty_workspace() {
        let backing = Arc::new(MemoryStore::with_value(KEY, "{not json"));
        let sessions = SessionStore::load(backing.clone(), KEY, 15);

        assert!(sessions.workspace().is_empty());
        assert!(sessions.history().is_empty());
        // Corrupt record moved aside
        assert_eq!(backing.get(KEY).unwrap(), None);
    }

    #[test]
    fn test_dangling_active_id_is_repaired() {
        let record = r#"{"sessions":[{"id":"a","title":"a","queryText":""}],"activeSessionId":"gone","historyEntries":[]}"#;
        let backing = Arc::new(MemoryStore::with_value(KEY, record));
        let sessions = SessionStore::load(backing, KEY, 15);

        assert_eq!(sessions.active_session_id(), Some("a"));
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let (mut sessions, backing) = store();
        backing.set_fail_writes(true);

        sessions.open_or_focus("orders", "SELECT 1;");
        assert_eq!(sessions.active_session_id(), Some("orders"));
        assert!(sessions.save().is_err());
        assert_eq!(backing.get(KEY).unwrap(), None);
    }
}
