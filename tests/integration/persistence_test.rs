//! Integration tests for the file-backed workspace store.

use querydeck::persistence::{FileStore, KeyValueStore};
use querydeck::workspace::SessionStore;
use std::sync::Arc;
use tempfile::tempdir;

const KEY: &str = "sqlEditorState";

fn open_store(dir: &std::path::Path) -> Arc<FileStore> {
    Arc::new(FileStore::open(dir).unwrap())
}

#[test]
fn test_file_store_creates_directory() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("a").join("b");

    let store = FileStore::open(&nested).unwrap();
    assert!(nested.is_dir());
    assert_eq!(store.get(KEY).unwrap(), None);
}

#[test]
fn test_file_store_round_trip() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());

    store.set(KEY, "{\"sessions\":[]}").unwrap();
    assert_eq!(store.get(KEY).unwrap().as_deref(), Some("{\"sessions\":[]}"));
    assert!(store.path_for(KEY).exists());
    assert!(!dir.path().join("sqlEditorState.json.tmp").exists());

    store.remove(KEY).unwrap();
    assert_eq!(store.get(KEY).unwrap(), None);
}

#[test]
fn test_workspace_survives_restart() {
    let dir = tempdir().unwrap();

    {
        let mut sessions = SessionStore::load(open_store(dir.path()), KEY, 15);
        sessions.open_or_focus("Customers", "SELECT * FROM customers;");
        sessions.open_or_focus("Orders", "SELECT * FROM orders;");
        let scratch = sessions.create_session("New Query 1", "");
        sessions.update_session_query_text(&scratch, "SELECT 1;");
        sessions.activate("Orders");
    }

    let sessions = SessionStore::load(open_store(dir.path()), KEY, 15);
    let workspace = sessions.workspace();
    assert_eq!(workspace.len(), 3);
    assert_eq!(sessions.active_session_id(), Some("Orders"));
    assert_eq!(workspace.sessions[2].query_text, "SELECT 1;");
    assert_eq!(sessions.history().len(), 2);
    assert_eq!(sessions.history().entries()[0].title, "Orders");
    assert_eq!(sessions.next_query_title(), "New Query 2");
}

#[test]
fn test_corrupt_file_is_backed_up() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("sqlEditorState.json"), "{ not json").unwrap();

    let mut sessions = SessionStore::load(open_store(dir.path()), KEY, 15);
    assert!(sessions.workspace().is_empty());
    assert!(dir.path().join("sqlEditorState.json.bak").exists());
    assert!(!dir.path().join("sqlEditorState.json").exists());

    // Next mutation writes a clean record
    sessions.open_or_focus("Products", "SELECT * FROM products;");
    let reloaded = SessionStore::load(open_store(dir.path()), KEY, 15);
    assert_eq!(reloaded.workspace().len(), 1);
}

#[test]
fn test_persisted_record_shape() {
    let dir = tempdir().unwrap();
    let store = open_store(dir.path());

    let mut sessions = SessionStore::load(store.clone(), KEY, 15);
    sessions.open_or_focus("Employees", "SELECT * FROM employees;");

    let raw = store.get(KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["activeSessionId"], "Employees");
    assert_eq!(json["sessions"][0]["title"], "Employees");
    assert_eq!(json["historyEntries"][0]["query"], "SELECT * FROM employees;");
}
