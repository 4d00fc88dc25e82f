//! Integration tests for sessions and history.

use pretty_assertions::assert_eq;
use querydeck::persistence::{HistoryTracker, MemoryStore, MAX_HISTORY_ENTRIES};
use querydeck::workspace::SessionStore;
use std::sync::Arc;

fn sessions() -> SessionStore {
    SessionStore::load(Arc::new(MemoryStore::new()), "sqlEditorState", MAX_HISTORY_ENTRIES)
}

#[test]
fn test_close_middle_session_activates_next() {
    let mut store = sessions();
    for title in ["A", "B", "C"] {
        store.open_or_focus(title, &format!("SELECT * FROM {title};"));
    }

    assert_eq!(store.close_session("B").as_deref(), Some("C"));
    assert_eq!(store.close_session("C").as_deref(), Some("A"));
    assert_eq!(store.close_session("A"), None);
    assert!(store.workspace().is_empty());
    assert_eq!(store.window_title(), "SQL Query Editor");
}

#[test]
fn test_recording_same_title_twice_is_noop() {
    let mut history = HistoryTracker::new(MAX_HISTORY_ENTRIES);
    assert!(history.record("SELECT 1;", "Orders"));
    assert!(!history.record("SELECT 2;", "Orders"));

    assert_eq!(history.len(), 1);
    assert_eq!(history.entries()[0].query, "SELECT 1;");
}

#[test]
fn test_history_is_capped() {
    let mut store = sessions();
    for i in 0..20 {
        store.open_or_focus(&format!("table_{i}"), "SELECT 1;");
    }

    let history = store.history();
    assert_eq!(history.len(), 15);
    assert_eq!(history.entries()[0].title, "table_19");
    assert_eq!(history.entries()[14].title, "table_5");
}

#[test]
fn test_reopening_from_history_does_not_record() {
    let mut store = sessions();
    store.open_or_focus("Suppliers", "SELECT * FROM suppliers;");
    store.close_session("Suppliers");

    let entry_id = store.history().entries()[0].id;
    let id = store.open_from_history(entry_id).unwrap();

    assert_eq!(id, format!("history-{entry_id}"));
    assert_eq!(store.history().len(), 1);
    let session = store.workspace().session(&id).unwrap();
    assert_eq!(session.title, "Suppliers");
    assert_eq!(session.query_text, "SELECT * FROM suppliers;");
}

#[test]
fn test_focus_existing_keeps_text() {
    let mut store = sessions();
    store.open_or_focus("Region", "SELECT * FROM region;");
    store.update_session_query_text("Region", "SELECT RegionID FROM region;");
    store.create_session("New Query 1", "");

    assert!(!store.open_or_focus("Region", "SELECT * FROM region;"));
    assert_eq!(store.active_session_id(), Some("Region"));
    assert_eq!(
        store.workspace().session("Region").unwrap().query_text,
        "SELECT RegionID FROM region;"
    );
}
