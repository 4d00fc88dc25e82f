//! Filter → sort → paginate.
//!
//! The pipeline works on row indices into the decoded result set, so the
//! original rows are never copied or reordered.

use super::state::{GridState, SortDirection};
use crate::data::{ResultSet, Row};
use std::cmp::Ordering;
use std::ops::Range;

/// The visible window of a result grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPage {
    /// Original row indices on this page, in display order.
    pub row_indices: Vec<usize>,
    /// Rows left after filtering.
    pub filtered_count: usize,
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
}

impl GridPage {
    /// Iterates the rows on this page.
    pub fn rows<'a>(&'a self, result: &'a ResultSet) -> impl Iterator<Item = (usize, &'a Row)> + 'a {
        self.row_indices
            .iter()
            .filter_map(move |&i| result.rows.get(i).map(|r| (i, r)))
    }
}

/// Runs the pipeline and clamps the page index of `state` to the result.
pub fn apply(result: &ResultSet, state: &mut GridState) -> GridPage {
    let mut indices = filter_indices(&result.rows, state.filter_text());

    if let Some(col) = state.sort_column().and_then(|c| result.column_index(c)) {
        sort_indices(&mut indices, &result.rows, col, state.sort_direction());
    }

    let filtered_count = indices.len();
    state.clamp_page(filtered_count);

    let window = page_window(filtered_count, state.page_index(), state.page_size());
    GridPage {
        row_indices: indices[window].to_vec(),
        filtered_count,
        page_index: state.page_index(),
        page_count: state.page_count(filtered_count),
        page_size: state.page_size(),
    }
}

/// Returns the indices of rows with any value containing `filter`,
/// case-insensitively. An empty filter keeps everything.
pub fn filter_indices(rows: &[Row], filter: &str) -> Vec<usize> {
    if filter.is_empty() {
        return (0..rows.len()).collect();
    }

    let needle = filter.to_lowercase();
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row.iter().any(|v| v.to_lowercase().contains(&needle)))
        .map(|(i, _)| i)
        .collect()
}

/// Stable-sorts `indices` by the values in column `col`.
///
/// Mixed numeric and text values are not totally ordered by
/// [`compare_values`]; the merge sort below tolerates that.
pub fn sort_indices(indices: &mut [usize], rows: &[Row], col: usize, direction: SortDirection) {
    let value = |i: usize| rows.get(i).and_then(|r| r.get(col)).map_or("", String::as_str);

    match direction {
        SortDirection::None => {}
        SortDirection::Ascending => merge_sort_by(indices, &mut |a, b| compare_values(value(a), value(b))),
        SortDirection::Descending => merge_sort_by(indices, &mut |a, b| compare_values(value(b), value(a))),
    }
}

/// Stable top-down merge sort. Accepts any comparator; an inconsistent one
/// gives an unspecified order but never a panic or a lost element.
fn merge_sort_by<F>(items: &mut [usize], cmp: &mut F)
where
    F: FnMut(usize, usize) -> Ordering,
{
    if items.len() <= 1 {
        return;
    }

    let mid = items.len() / 2;
    merge_sort_by(&mut items[..mid], cmp);
    merge_sort_by(&mut items[mid..], cmp);

    let mut merged = Vec::with_capacity(items.len());
    let (mut left, mut right) = (0, mid);
    while left < mid && right < items.len() {
        // Ties take from the left run
        if cmp(items[left], items[right]) == Ordering::Greater {
            merged.push(items[right]);
            right += 1;
        } else {
            merged.push(items[left]);
            left += 1;
        }
    }
    merged.extend_from_slice(&items[left..mid]);
    merged.extend_from_slice(&items[right..]);
    items.copy_from_slice(&merged);
}

/// Numeric comparison when both sides parse as numbers, otherwise a
/// case-sensitive string comparison.
pub fn compare_values(a: &str, b: &str) -> Ordering {
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Index range of page `page_index` over `len` items.
pub fn page_window(len: usize, page_index: usize, page_size: usize) -> Range<usize> {
    let start = page_index.saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}
