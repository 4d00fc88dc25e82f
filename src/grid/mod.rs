//! Result grid: filter, sort, paginate and export over a decoded result set.

pub mod export;
pub mod layout;
pub mod pipeline;
mod state;

pub use export::{export, ExportArtifact, ExportFormat, NO_DATA_NOTICE};
pub use layout::{
    cell_detail, cell_preview, page_links, CellDetail, CellPreview, DragTracker, PageLink,
    RowExpansion,
};
pub use pipeline::{apply, GridPage};
pub use state::{GridState, SortDirection};
