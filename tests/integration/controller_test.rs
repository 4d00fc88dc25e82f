//! Integration tests for the workspace controller.

use pretty_assertions::assert_eq;
use querydeck::config::Config;
use querydeck::controller::{Command, Effect, LoadKind, ResultTab, WorkspaceController};
use querydeck::data::{FieldType, StaticResourceFetcher};
use querydeck::grid::PageLink;
use querydeck::persistence::{KeyValueStore, MemoryStore};
use std::sync::Arc;

const CUSTOMERS: &str = "CustomerID,CompanyName,Notes
ALFKI,Alfreds Futterkiste,
ANATR,Ana Trujillo Emparedados y helados,\"Prefers delivery before noon, and calls ahead when the order is large\"
ANTON,Antonio Moreno Taquería,\"Line one
Line two\"
";

fn config() -> Config {
    let mut config = Config::default();
    config.resources.query_delay_ms = 0;
    config
}

fn fetcher() -> Arc<StaticResourceFetcher> {
    let many = (0..95)
        .map(|i| format!("{i},item {i}"))
        .collect::<Vec<_>>()
        .join("\n");
    Arc::new(
        StaticResourceFetcher::new()
            .with_resource("Customers", CUSTOMERS)
            .with_resource("Items", format!("ItemID,name\n{many}\n"))
            .with_resource("Broken", "a,b\n\"never closed,1\n"),
    )
}

fn open(title: &str) -> Command {
    Command::OpenResource {
        title: title.to_string(),
    }
}

#[tokio::test]
async fn test_customers_view() {
    let mut controller = WorkspaceController::new(config(), Arc::new(MemoryStore::new()), fetcher());
    controller.apply_settled(open("Customers")).await;

    let view = controller.render().active.unwrap();
    assert_eq!(
        view.query_text,
        "SELECT customer_id, company_name, contact_name, country FROM customers LIMIT 20;"
    );
    assert_eq!(view.rows.len(), 3);
    assert!(!view.rows[0].cells[2].expandable);
    assert!(view.rows[1].cells[2].expandable);
    assert!(view.rows[1].cells[2].text.ends_with("..."));
    assert!(view.rows[2].cells[2].expandable);
    assert_eq!(view.stats.results, "3 results");
    assert!(view.stats.elapsed.ends_with('s'));
    assert_eq!(view.column_details[0].field_type, FieldType::Number);
    assert_eq!(view.column_details[1].field_type, FieldType::String);
}

#[tokio::test]
async fn test_pagination_links() {
    let mut controller = WorkspaceController::new(config(), Arc::new(MemoryStore::new()), fetcher());
    controller.apply_settled(open("Items")).await;
    let id = "Items".to_string();

    controller.apply(Command::GotoPage {
        session_id: id.clone(),
        page: 4,
    });
    let view = controller.render_session(&id).unwrap();
    assert_eq!(view.pagination.page_count, 10);
    assert_eq!(view.rows[0].cells[1].text, "item 40");
    assert_eq!(view.pagination.links.len(), 7);
    assert_eq!(view.pagination.links[1], PageLink::Ellipsis);

    controller.apply(Command::SetPageSize {
        session_id: id.clone(),
        size: 50,
    });
    let view = controller.render_session(&id).unwrap();
    assert_eq!(view.pagination.page_index, 0);
    assert_eq!(view.pagination.page_count, 2);
    assert_eq!(view.pagination.page_size_options, vec![10, 25, 50, 100]);

    controller.apply(Command::NextPage {
        session_id: id.clone(),
    });
    controller.apply(Command::NextPage {
        session_id: id.clone(),
    });
    let view = controller.render_session(&id).unwrap();
    assert_eq!(view.pagination.page_index, 1);
    assert_eq!(view.rows.len(), 45);
    assert!(!view.pagination.can_next);
}

#[tokio::test]
async fn test_decode_error_gives_empty_rows_and_message() {
    let mut controller = WorkspaceController::new(config(), Arc::new(MemoryStore::new()), fetcher());
    controller.apply_settled(open("Broken")).await;

    let view = controller.render_session("Broken").unwrap();
    assert!(view.rows.is_empty());
    assert!(view.error.unwrap().contains("unterminated"));
}

#[tokio::test]
async fn test_completions_apply_in_resolution_order() {
    let mut controller = WorkspaceController::new(config(), Arc::new(MemoryStore::new()), fetcher());
    controller.apply_settled(open("Customers")).await;
    let id = "Customers".to_string();

    let older = controller
        .apply(Command::RunQuery {
            session_id: id.clone(),
        })
        .into_load()
        .unwrap();
    let newer = controller
        .apply(Command::Reload {
            session_id: id.clone(),
        })
        .into_load()
        .unwrap();
    assert_eq!(older.kind, LoadKind::Run);
    assert_eq!(newer.kind, LoadKind::Load);
    assert!(controller.is_loading(&id));

    let newer = newer.execute().await;
    let older = older.execute().await;
    controller.complete(newer);
    assert!(controller.is_loading(&id));
    controller.complete(older);
    assert!(!controller.is_loading(&id));
    assert!(controller.can_run(&id));
}

#[tokio::test]
async fn test_restored_sessions_load_on_activation() {
    let backing = Arc::new(MemoryStore::new());
    {
        let mut controller = WorkspaceController::new(config(), backing.clone(), fetcher());
        controller.apply_settled(open("Customers")).await;
        controller.apply_settled(open("Items")).await;
        controller.apply(Command::NewQuery);
    }
    assert!(backing.get("sqlEditorState").unwrap().is_some());

    let mut controller = WorkspaceController::new(config(), backing, fetcher());
    assert_eq!(controller.store().workspace().len(), 3);

    // Active session is the scratch query: nothing to load
    assert!(controller.start().is_none());

    let effect = controller
        .apply_settled(Command::Activate {
            session_id: "Items".to_string(),
        })
        .await;
    assert!(effect.is_none());
    assert_eq!(controller.result("Items").unwrap().row_count(), 95);
    assert!(controller.result("Customers").is_none());
}

#[tokio::test]
async fn test_history_replay_and_tabs() {
    let mut controller = WorkspaceController::new(config(), Arc::new(MemoryStore::new()), fetcher());
    controller.apply_settled(open("Customers")).await;
    let entry_id = controller.store().history().entries()[0].id;

    controller.apply(Command::EditQuery {
        session_id: "Customers".to_string(),
        text: "SELECT CompanyName FROM customers;".to_string(),
    });
    controller
        .apply_settled(Command::OpenHistory { entry_id })
        .await;

    let view = controller.render();
    assert_eq!(view.tabs.len(), 2);
    assert_eq!(view.history.len(), 1);
    let active = view.active.unwrap();
    assert_eq!(active.session_id, format!("history-{entry_id}"));
    assert_eq!(active.rows.len(), 3);

    controller.apply(Command::ShowTab {
        session_id: active.session_id.clone(),
        tab: ResultTab::Columns,
    });
    let view = controller.render_session(&active.session_id).unwrap();
    assert_eq!(view.tab, ResultTab::Columns);

    match controller.apply(Command::CloseSession {
        session_id: active.session_id.clone(),
    }) {
        Effect::None => {}
        other => panic!("Customers already has rows, got {other:?}"),
    }
    assert_eq!(controller.store().active_session_id(), Some("Customers"));
}
