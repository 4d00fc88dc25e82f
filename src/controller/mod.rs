//! Workspace controller.
//!
//! Composition root of the engine: presentation code sends [`Command`]s,
//! the controller routes them to the [`SessionStore`] and the grid, and
//! answers with an [`Effect`]. Loads come back as a [`LoadOutcome`]
//! through [`WorkspaceController::complete`] in whatever order they
//! resolve.

mod command;
mod load;
mod pane;
mod view;

pub use command::{Command, Effect, ResultTab};
pub use load::{LoadKind, LoadOutcome, PendingLoad};
pub use view::{
    HeaderView, PaginationView, RowView, SessionView, StatsView, TabView, WorkspaceView,
};

use crate::config::Config;
use crate::data::{CsvDecoder, ResourceFetcher, ResultSet};
use crate::grid::{self, cell_detail, GridState, NO_DATA_NOTICE};
use crate::persistence::KeyValueStore;
use crate::workspace::SessionStore;
use pane::SessionPane;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Drives the workspace and the per-session result grids.
pub struct WorkspaceController {
    config: Config,
    store: SessionStore,
    fetcher: Arc<dyn ResourceFetcher>,
    decoder: CsvDecoder,
    panes: HashMap<String, SessionPane>,
}

impl WorkspaceController {
    /// Creates a controller over the workspace saved in `store`.
    pub fn new(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        fetcher: Arc<dyn ResourceFetcher>,
    ) -> Self {
        let sessions = SessionStore::load(
            store,
            config.storage.key.clone(),
            config.history.max_entries,
        );
        info!(
            "Workspace ready with {} session(s)",
            sessions.workspace().len()
        );

        Self {
            config,
            store: sessions,
            fetcher,
            decoder: CsvDecoder::default(),
            panes: HashMap::new(),
        }
    }

    /// Replaces the decoder used for fetched resources.
    pub fn with_decoder(mut self, decoder: CsvDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Loads the restored active session, if it needs rows.
    pub fn start(&mut self) -> Effect {
        match self.store.active_session_id().map(str::to_string) {
            Some(id) => self.ensure_loaded(&id),
            None => Effect::None,
        }
    }

    /// True if `session_id` exists and has no run in flight.
    pub fn can_run(&self, session_id: &str) -> bool {
        self.store.workspace().contains(session_id)
            && !self.panes.get(session_id).is_some_and(SessionPane::is_running)
    }

    pub fn is_loading(&self, session_id: &str) -> bool {
        self.panes.get(session_id).is_some_and(SessionPane::is_loading)
    }

    /// Returns the decoded result bound to a session.
    pub fn result(&self, session_id: &str) -> Option<&ResultSet> {
        self.panes.get(session_id)?.result.as_ref()
    }

    pub fn grid_state(&self, session_id: &str) -> Option<&GridState> {
        self.panes.get(session_id).map(|p| &p.grid)
    }

    /// Applies one command.
    pub fn apply(&mut self, command: Command) -> Effect {
        debug!("Applying {command:?}");

        match command {
            Command::NewQuery => {
                let title = self.store.next_query_title();
                let text = self.config.new_query_text();
                self.store.create_session(&title, &text);
                Effect::None
            }
            Command::OpenResource { title } => {
                let text = self.config.default_query_for(&title);
                self.store.open_or_focus(&title, &text);
                self.ensure_loaded(&title)
            }
            Command::OpenHistory { entry_id } => match self.store.open_from_history(entry_id) {
                Some(id) => self.ensure_loaded(&id),
                None => {
                    debug!("History entry {entry_id} not found");
                    Effect::None
                }
            },
            Command::Activate { session_id } => {
                if self.store.activate(&session_id) {
                    self.ensure_loaded(&session_id)
                } else {
                    Effect::None
                }
            }
            Command::CloseSession { session_id } => {
                if self.store.workspace().contains(&session_id) {
                    self.panes.remove(&session_id);
                }
                match self.store.close_session(&session_id) {
                    Some(active) => self.ensure_loaded(&active),
                    None => Effect::None,
                }
            }
            Command::EditQuery { session_id, text } => {
                self.store.update_session_query_text(&session_id, &text);
                Effect::None
            }
            Command::RunQuery { session_id } => {
                if !self.can_run(&session_id) {
                    debug!("Run for '{session_id}' ignored, one is already in flight");
                    return Effect::None;
                }
                self.issue_load(&session_id, LoadKind::Run)
            }
            Command::Reload { session_id } => self.issue_load(&session_id, LoadKind::Load),
            Command::SetFilter { session_id, text } => self.with_pane(&session_id, |pane| {
                pane.grid.set_filter(text);
                let count = pane.filtered_count();
                pane.grid.clamp_page(count);
            }),
            Command::ToggleSort { session_id, column } => self.with_pane(&session_id, |pane| {
                pane.grid.toggle_sort(&column);
            }),
            Command::GotoPage { session_id, page } => self.with_pane(&session_id, |pane| {
                let count = pane.filtered_count();
                pane.grid.goto_page(page, count);
            }),
            Command::NextPage { session_id } => self.with_pane(&session_id, |pane| {
                let count = pane.filtered_count();
                pane.grid.next_page(count);
            }),
            Command::PreviousPage { session_id } => self.with_pane(&session_id, |pane| {
                let count = pane.filtered_count();
                pane.grid.previous_page(count);
            }),
            Command::SetPageSize { session_id, size } => self.with_pane(&session_id, |pane| {
                let count = pane.filtered_count();
                pane.grid.set_page_size(size, count);
            }),
            Command::ResizeColumn {
                session_id,
                column,
                width,
            } => self.with_pane(&session_id, |pane| {
                pane.grid.resize_column(&column, width);
            }),
            Command::PointerDown { session_id, x, y } => {
                self.with_pane(&session_id, |pane| pane.drag.pointer_down(x, y))
            }
            Command::PointerMove { session_id, x, y } => {
                self.with_pane(&session_id, |pane| pane.drag.pointer_move(x, y))
            }
            Command::PointerUp { session_id } => {
                self.with_pane(&session_id, |pane| pane.drag.pointer_up())
            }
            Command::ClickRow { session_id, row } => self.with_pane(&session_id, |pane| {
                if pane.drag.take_click() {
                    pane.expansion.toggle(row);
                }
            }),
            Command::ExpandCell {
                session_id,
                row,
                column,
            } => self.with_pane(&session_id, |pane| {
                let detail = pane.result.as_ref().and_then(|result| {
                    let values = result.rows.get(row)?;
                    let value = result.value(row, &column)?;
                    Some(cell_detail(&column, values, value))
                });
                if detail.is_some() {
                    pane.detail = detail;
                }
            }),
            Command::CloseCellDetail { session_id } => {
                self.with_pane(&session_id, |pane| pane.detail = None)
            }
            Command::ShowTab { session_id, tab } => {
                self.with_pane(&session_id, |pane| pane.tab = tab)
            }
            Command::Export { session_id, format } => {
                let Some(result) = self.result(&session_id) else {
                    return Effect::Notice(NO_DATA_NOTICE.to_string());
                };
                match grid::export(result, format) {
                    Ok(Some(artifact)) => {
                        info!("Exported {} rows as {format}", result.row_count());
                        Effect::Export(artifact)
                    }
                    Ok(None) => Effect::Notice(NO_DATA_NOTICE.to_string()),
                    Err(e) => {
                        warn!("{e}");
                        Effect::Notice(e.message().to_string())
                    }
                }
            }
        }
    }

    /// Binds a finished load to its session.
    ///
    /// Outcomes are applied in the order they arrive; a slower earlier load
    /// overwrites a faster later one. Outcomes for closed sessions are dropped.
    pub fn complete(&mut self, outcome: LoadOutcome) {
        let Some(pane) = self.panes.get_mut(&outcome.session_id) else {
            debug!(
                "Dropping load result for closed session '{}'",
                outcome.session_id
            );
            return;
        };

        pane.finish(outcome.kind);
        let result = match outcome.result {
            Ok(result) => {
                debug!(
                    "Bound {} rows to '{}'",
                    result.row_count(),
                    outcome.session_id
                );
                result
            }
            Err(e) => {
                warn!("Load for '{}' failed: {e}", outcome.session_id);
                ResultSet::failed(e.message())
            }
        };
        pane.bind(result);
    }

    /// Applies a command and, if it issues a load, awaits and completes it.
    pub async fn apply_settled(&mut self, command: Command) -> Effect {
        match self.apply(command) {
            Effect::Load(load) => {
                let outcome = load.execute().await;
                self.complete(outcome);
                Effect::None
            }
            effect => effect,
        }
    }

    /// Renders the tabs, the history and the active session.
    pub fn render(&mut self) -> WorkspaceView {
        let active_id = self.store.active_session_id().map(str::to_string);
        let tabs = self
            .store
            .workspace()
            .sessions
            .iter()
            .map(|s| TabView {
                session_id: s.id.clone(),
                title: s.title.clone(),
                active: active_id.as_deref() == Some(s.id.as_str()),
            })
            .collect();

        WorkspaceView {
            window_title: self.store.window_title(),
            tabs,
            active: active_id.and_then(|id| self.render_session(&id)),
            history: self.store.history().entries().to_vec(),
        }
    }

    /// Renders one session. `None` if it does not exist.
    pub fn render_session(&mut self, session_id: &str) -> Option<SessionView> {
        let session = self.store.workspace().session(session_id)?.clone();
        let pane = self.pane_mut(session_id)?;
        Some(pane.render(&session))
    }

    /// Returns the pane of an existing session, creating it on first use.
    fn pane_mut(&mut self, session_id: &str) -> Option<&mut SessionPane> {
        if !self.store.workspace().contains(session_id) {
            return None;
        }
        let grid = &self.config.grid;
        Some(
            self.panes
                .entry(session_id.to_string())
                .or_insert_with(|| SessionPane::new(grid)),
        )
    }

    fn with_pane(&mut self, session_id: &str, f: impl FnOnce(&mut SessionPane)) -> Effect {
        match self.pane_mut(session_id) {
            Some(pane) => f(pane),
            None => debug!("No session '{session_id}'"),
        }
        Effect::None
    }

    /// Issues a load for a resource session that has no rows and none coming.
    fn ensure_loaded(&mut self, session_id: &str) -> Effect {
        let scratch = match self.store.workspace().session(session_id) {
            Some(session) => session.is_scratch(),
            None => return Effect::None,
        };
        if scratch {
            return Effect::None;
        }
        let needs_rows = self
            .pane_mut(session_id)
            .is_some_and(|pane| !pane.has_result() && !pane.is_loading());
        if needs_rows {
            self.issue_load(session_id, LoadKind::Load)
        } else {
            Effect::None
        }
    }

    fn issue_load(&mut self, session_id: &str, kind: LoadKind) -> Effect {
        let Some(title) = self
            .store
            .workspace()
            .session(session_id)
            .map(|s| s.title.clone())
        else {
            return Effect::None;
        };
        let delay = match kind {
            LoadKind::Run => self.config.resources.query_delay(),
            LoadKind::Load => Duration::ZERO,
        };
        let fetcher = Arc::clone(&self.fetcher);
        let decoder = self.decoder;

        if let Some(pane) = self.pane_mut(session_id) {
            pane.begin(kind);
        }
        debug!("Issuing {kind:?} for '{session_id}' ({title})");

        Effect::Load(PendingLoad::new(
            session_id.to_string(),
            title,
            kind,
            delay,
            fetcher,
            decoder,
        ))
    }
}
