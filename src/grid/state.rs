//! Per-session grid view state.

use crate::config::GridConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sort direction of a column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    None,
    Ascending,
    Descending,
}

impl SortDirection {
    /// Next state in the `None → Ascending → Descending → None` cycle.
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::Ascending,
            Self::Ascending => Self::Descending,
            Self::Descending => Self::None,
        }
    }

    /// Header indicator.
    pub fn indicator(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Ascending => " ▲",
            Self::Descending => " ▼",
        }
    }
}

/// Filter, sort, paging and column widths of one result grid.
///
/// Never persisted; a fresh state is created for each session view.
#[derive(Debug, Clone, PartialEq)]
pub struct GridState {
    filter_text: String,
    sort_column: Option<String>,
    sort_direction: SortDirection,
    page_index: usize,
    page_size: usize,
    page_size_options: Vec<usize>,
    column_widths: HashMap<String, u32>,
    min_width: u32,
    max_width: u32,
    default_width: u32,
}

impl Default for GridState {
    fn default() -> Self {
        Self::new(&GridConfig::default())
    }
}

impl GridState {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            filter_text: String::new(),
            sort_column: None,
            sort_direction: SortDirection::None,
            page_index: 0,
            page_size: config.page_size.max(1),
            page_size_options: config.page_size_options.clone(),
            column_widths: HashMap::new(),
            min_width: config.min_column_width,
            max_width: config.max_column_width.max(config.min_column_width),
            default_width: config
                .default_column_width
                .clamp(config.min_column_width, config.max_column_width.max(config.min_column_width)),
        }
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn sort_column(&self) -> Option<&str> {
        self.sort_column.as_deref()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    /// Sets the global filter text. The page is clamped on the next render.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter_text = text.into();
    }

    /// Advances the sort cycle for `column`.
    ///
    /// Only one column is sorted at a time: activating a different column
    /// starts it at ascending and drops the previous column's state.
    pub fn toggle_sort(&mut self, column: &str) -> SortDirection {
        let current = if self.sort_column.as_deref() == Some(column) {
            self.sort_direction
        } else {
            SortDirection::None
        };

        self.sort_direction = current.next();
        self.sort_column = match self.sort_direction {
            SortDirection::None => None,
            _ => Some(column.to_string()),
        };
        self.sort_direction
    }

    /// Returns the direction shown on `column`'s header.
    pub fn sort_for(&self, column: &str) -> SortDirection {
        if self.sort_column.as_deref() == Some(column) {
            self.sort_direction
        } else {
            SortDirection::None
        }
    }

    /// Number of pages for `row_count` filtered rows.
    pub fn page_count(&self, row_count: usize) -> usize {
        row_count.div_ceil(self.page_size)
    }

    /// Pulls the page index back into range for `row_count` filtered rows.
    pub fn clamp_page(&mut self, row_count: usize) -> usize {
        let last = self.page_count(row_count).saturating_sub(1);
        self.page_index = self.page_index.min(last);
        self.page_index
    }

    /// Changes the page size, keeping the first visible row on screen.
    pub fn set_page_size(&mut self, size: usize, row_count: usize) {
        let size = size.max(1);
        let top_row = self.page_index * self.page_size;
        self.page_size = size;
        self.page_index = top_row / size;
        self.clamp_page(row_count);
    }

    pub fn goto_page(&mut self, index: usize, row_count: usize) -> usize {
        self.page_index = index;
        self.clamp_page(row_count)
    }

    pub fn next_page(&mut self, row_count: usize) -> usize {
        self.goto_page(self.page_index + 1, row_count)
    }

    pub fn previous_page(&mut self, row_count: usize) -> usize {
        self.goto_page(self.page_index.saturating_sub(1), row_count)
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self, row_count: usize) -> bool {
        self.page_index + 1 < self.page_count(row_count)
    }

    /// Sets a column width, clamped to the configured range. Returns the stored width.
    pub fn resize_column(&mut self, column: &str, width: u32) -> u32 {
        let width = width.clamp(self.min_width, self.max_width);
        self.column_widths.insert(column.to_string(), width);
        width
    }

    /// Returns a column's width, or the default if it was never resized.
    pub fn column_width(&self, column: &str) -> u32 {
        self.column_widths
            .get(column)
            .copied()
            .unwrap_or(self.default_width)
    }
}
