//! Presentation helpers for the result grid.
//!
//! Cell previews and detail views, pointer drag tracking for row
//! expansion, page-link lists and the stats line.

use std::time::Duration;

/// Default number of characters shown before a cell is truncated.
pub const PREVIEW_CHARS: usize = 50;

/// Default pointer travel, per axis, after which a press counts as a drag.
pub const DRAG_THRESHOLD: f64 = 5.0;

/// Above this many pages the page-link list is compacted.
const MAX_FULL_PAGE_LINKS: usize = 7;

/// What a grid cell shows inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellPreview {
    pub text: String,
    /// The full value is longer than the preview or spans lines.
    pub expandable: bool,
}

/// Returns true if a value needs the full detail view.
pub fn is_expandable(value: &str, max_chars: usize) -> bool {
    value.chars().count() > max_chars || value.contains('\n')
}

/// Builds the inline preview of a value.
pub fn cell_preview(value: &str, max_chars: usize) -> CellPreview {
    let expandable = is_expandable(value, max_chars);
    let text = truncate(value, max_chars);
    CellPreview { text, expandable }
}

/// Cuts a string to `max_chars` characters, adding `...` if anything was cut.
fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((byte, _)) => format!("{}...", &s[..byte]),
        None => s.to_string(),
    }
}

/// The full view of one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellDetail {
    pub title: String,
    pub content: String,
}

/// Builds the detail view for `value` in `column` of `row`.
///
/// The title names the column and the row's first value.
pub fn cell_detail(column: &str, row: &[String], value: &str) -> CellDetail {
    let key = row.first().map_or("", String::as_str);
    CellDetail {
        title: format!("{column}: {key}"),
        content: value.to_string(),
    }
}

/// Distinguishes clicks from drags (text selection) on grid rows.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    origin: Option<(f64, f64)>,
    dragged: bool,
    suppress_click: bool,
    threshold: f64,
}

impl DragTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Starts a press. A new press ends any suppression left by an earlier drag.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.origin = Some((x, y));
        self.dragged = false;
        self.suppress_click = false;
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if let Some((ox, oy)) = self.origin {
            if (x - ox).abs() > self.threshold || (y - oy).abs() > self.threshold {
                self.dragged = true;
            }
        }
    }

    /// Ends the press. A drag swallows the click that follows it.
    pub fn pointer_up(&mut self) {
        if self.origin.take().is_some() && self.dragged {
            self.suppress_click = true;
        }
        self.dragged = false;
    }

    /// Consumes a click. Returns false if the click ends a drag.
    pub fn take_click(&mut self) -> bool {
        !std::mem::take(&mut self.suppress_click)
    }
}

/// The single expanded row of a grid, by original row index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowExpansion {
    expanded: Option<usize>,
}

impl RowExpansion {
    /// Expands `row`, or collapses it if it is already expanded.
    pub fn toggle(&mut self, row: usize) -> Option<usize> {
        self.expanded = if self.expanded == Some(row) { None } else { Some(row) };
        self.expanded
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    pub fn is_expanded(&self, row: usize) -> bool {
        self.expanded == Some(row)
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }
}

/// One entry of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page { index: usize, active: bool },
    Ellipsis,
}

/// Lists the page links for `page_count` pages with `current` active.
///
/// Up to seven pages are all listed. Beyond that the list keeps the
/// first page, the current page and its neighbours, and the last page,
/// with an ellipsis over each gap.
pub fn page_links(current: usize, page_count: usize) -> Vec<PageLink> {
    let link = |index| PageLink::Page {
        index,
        active: index == current,
    };

    if page_count <= MAX_FULL_PAGE_LINKS {
        return (0..page_count).map(link).collect();
    }

    let last = page_count - 1;
    let current = current.min(last);
    let start = current.saturating_sub(1).max(1);
    let end = (current + 1).min(last - 1);

    let mut links = vec![link(0)];
    if start > 1 {
        links.push(PageLink::Ellipsis);
    }
    links.extend((start..=end).map(link));
    if end < last - 1 {
        links.push(PageLink::Ellipsis);
    }
    links.push(link(last));
    links
}

/// Formats a load time in seconds with two decimals.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

/// Stats label for the filtered row count.
pub fn results_label(count: usize) -> String {
    format!("{count} results")
}
