//! Per-session view state held by the controller.

use super::command::ResultTab;
use super::load::LoadKind;
use super::view::{HeaderView, PaginationView, RowView, SessionView, StatsView};
use crate::config::GridConfig;
use crate::data::ResultSet;
use crate::grid::layout::{format_elapsed, results_label};
use crate::grid::pipeline::{self, filter_indices, GridPage};
use crate::grid::{cell_preview, page_links, CellDetail, DragTracker, GridState, RowExpansion};
use crate::workspace::Session;

/// Result, grid state and load flags of one open session. Never persisted.
#[derive(Debug, Clone)]
pub(crate) struct SessionPane {
    pub result: Option<ResultSet>,
    pub grid: GridState,
    pub drag: DragTracker,
    pub expansion: RowExpansion,
    pub detail: Option<CellDetail>,
    pub tab: ResultTab,
    preview_chars: usize,
    /// Loads issued and not yet completed.
    pending: usize,
    running: bool,
}

impl SessionPane {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            result: None,
            grid: GridState::new(config),
            drag: DragTracker::new(config.drag_threshold),
            expansion: RowExpansion::default(),
            detail: None,
            tab: ResultTab::default(),
            preview_chars: config.preview_chars,
            pending: 0,
            running: false,
        }
    }

    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn begin(&mut self, kind: LoadKind) {
        self.pending += 1;
        if kind == LoadKind::Run {
            self.running = true;
        }
    }

    pub fn finish(&mut self, kind: LoadKind) {
        self.pending = self.pending.saturating_sub(1);
        if kind == LoadKind::Run {
            self.running = false;
        }
    }

    /// Replaces the result. Expansion and the cell detail refer to old rows, so they go.
    pub fn bind(&mut self, result: ResultSet) {
        let filtered = filter_indices(&result.rows, self.grid.filter_text()).len();
        self.result = Some(result);
        self.expansion.collapse();
        self.detail = None;
        self.grid.clamp_page(filtered);
    }

    /// Rows left after the current filter.
    pub fn filtered_count(&self) -> usize {
        self.result
            .as_ref()
            .map_or(0, |r| filter_indices(&r.rows, self.grid.filter_text()).len())
    }

    pub fn render(&mut self, session: &Session) -> SessionView {
        let empty = ResultSet::new();
        let result = self.result.as_ref().unwrap_or(&empty);
        let page = pipeline::apply(result, &mut self.grid);

        SessionView {
            session_id: session.id.clone(),
            title: session.title.clone(),
            query_text: session.query_text.clone(),
            tab: self.tab,
            loading: self.is_loading(),
            running: self.running,
            can_run: !self.running,
            filter_text: self.grid.filter_text().to_string(),
            headers: self.headers(result),
            rows: self.rows(result, &page),
            stats: StatsView {
                results: results_label(page.filtered_count),
                elapsed: format_elapsed(result.loaded_at),
            },
            pagination: PaginationView {
                page_index: page.page_index,
                page_count: page.page_count,
                page_size: page.page_size,
                page_size_options: self.grid.page_size_options().to_vec(),
                links: page_links(page.page_index, page.page_count),
                can_previous: self.grid.can_previous(),
                can_next: self.grid.can_next(page.filtered_count),
            },
            column_details: result.column_details(),
            cell_detail: self.detail.clone(),
            error: result.error.clone(),
        }
    }

    fn headers(&self, result: &ResultSet) -> Vec<HeaderView> {
        result
            .columns
            .iter()
            .map(|column| {
                let sort = self.grid.sort_for(column);
                HeaderView {
                    column: column.clone(),
                    label: format!("{column}{}", sort.indicator()),
                    sort,
                    width: self.grid.column_width(column),
                }
            })
            .collect()
    }

    fn rows(&self, result: &ResultSet, page: &GridPage) -> Vec<RowView> {
        page.rows(result)
            .map(|(index, row)| {
                let expanded = self.expansion.is_expanded(index);
                RowView {
                    index,
                    cells: row.iter().map(|v| cell_preview(v, self.preview_chars)).collect(),
                    expanded,
                    fields: if expanded {
                        result.columns.iter().cloned().zip(row.iter().cloned()).collect()
                    } else {
                        Vec::new()
                    },
                }
            })
            .collect()
    }
}
