//! Commands emitted by the presentation layer and the effects they produce.

use super::load::PendingLoad;
use crate::grid::{ExportArtifact, ExportFormat};
use serde::{Deserialize, Serialize};

/// Which pane of a session's result area is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultTab {
    #[default]
    Results,
    Columns,
}

/// A user action routed through [`super::WorkspaceController::apply`].
///
/// Row indices always refer to the decoded result, not the visible page.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Opens a scratch session titled "New Query N".
    NewQuery,
    /// Opens (or focuses) the session for a named resource.
    OpenResource { title: String },
    /// Re-opens a history entry.
    OpenHistory { entry_id: i64 },
    Activate { session_id: String },
    CloseSession { session_id: String },
    EditQuery { session_id: String, text: String },
    /// Runs the session's query after the configured delay.
    RunQuery { session_id: String },
    /// Fetches the session's rows again, without delay.
    Reload { session_id: String },
    SetFilter { session_id: String, text: String },
    ToggleSort { session_id: String, column: String },
    GotoPage { session_id: String, page: usize },
    NextPage { session_id: String },
    PreviousPage { session_id: String },
    SetPageSize { session_id: String, size: usize },
    ResizeColumn { session_id: String, column: String, width: u32 },
    PointerDown { session_id: String, x: f64, y: f64 },
    PointerMove { session_id: String, x: f64, y: f64 },
    PointerUp { session_id: String },
    ClickRow { session_id: String, row: usize },
    ExpandCell { session_id: String, row: usize, column: String },
    CloseCellDetail { session_id: String },
    ShowTab { session_id: String, tab: ResultTab },
    Export { session_id: String, format: ExportFormat },
}

/// What the host must do after a command.
#[derive(Debug)]
pub enum Effect {
    None,
    /// Await the load and hand its outcome to `complete`.
    Load(PendingLoad),
    /// Offer the artifact for download.
    Export(ExportArtifact),
    /// Show a transient message.
    Notice(String),
}

impl Effect {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the pending load, if any.
    pub fn into_load(self) -> Option<PendingLoad> {
        match self {
            Self::Load(load) => Some(load),
            _ => None,
        }
    }
}
