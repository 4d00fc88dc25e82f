//! Render models handed to the presentation layer.

use super::command::ResultTab;
use crate::data::ColumnDetail;
use crate::grid::{CellDetail, CellPreview, PageLink, SortDirection};
use crate::persistence::HistoryEntry;

/// Everything needed to draw the workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceView {
    pub window_title: String,
    pub tabs: Vec<TabView>,
    pub active: Option<SessionView>,
    /// Most recent first.
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub session_id: String,
    pub title: String,
    pub active: bool,
}

/// One session's editor and result grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub session_id: String,
    pub title: String,
    pub query_text: String,
    pub tab: ResultTab,
    pub loading: bool,
    pub running: bool,
    pub can_run: bool,
    pub filter_text: String,
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    pub stats: StatsView,
    pub pagination: PaginationView,
    pub column_details: Vec<ColumnDetail>,
    pub cell_detail: Option<CellDetail>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub column: String,
    /// Column name followed by the sort indicator.
    pub label: String,
    pub sort: SortDirection,
    pub width: u32,
}

/// A visible row, addressed by its index in the decoded result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub index: usize,
    pub cells: Vec<CellPreview>,
    pub expanded: bool,
    /// Full `(column, value)` pairs, present only while expanded.
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    /// "<n> results" over the filtered rows.
    pub results: String,
    /// Load time, e.g. "1.02s".
    pub elapsed: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub links: Vec<PageLink>,
    pub can_previous: bool,
    pub can_next: bool,
}
