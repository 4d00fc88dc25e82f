//! Integration tests for decoding and the grid pipeline.

use pretty_assertions::assert_eq;
use querydeck::data::decode;
use querydeck::grid::{self, export, pipeline, ExportFormat, GridState, SortDirection};

const PRODUCTS: &str = "\
ProductID,ProductName,UnitPrice
1,Chai,18
2,Chang,19
3,Aniseed Syrup,10
4,Chef Anton's Cajun Seasoning,22
5,Chef Anton's Gumbo Mix,21.35
6,Grandma's Boysenberry Spread,25
7,Uncle Bob's Organic Dried Pears,30
8,Northwoods Cranberry Sauce,40
9,Mishi Kobe Niku,97
10,Ikura,31
11,Queso Cabrales,21
12,Queso Manchego La Pastora,38
";

#[test]
fn test_decode_keeps_quoted_delimiters() {
    let result = decode("name,age\nAlice,30\n\"Bob, B\",25\n").unwrap();
    assert_eq!(result.columns, vec!["name", "age"]);
    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.value(1, "name"), Some("Bob, B"));
    assert_eq!(result.value(1, "age"), Some("25"));
}

#[test]
fn test_decode_then_export_reproduces_input() {
    let result = decode(PRODUCTS).unwrap();
    let csv = export::to_csv(&result);
    assert_eq!(format!("{csv}\n"), PRODUCTS);
}

#[test]
fn test_export_ignores_view_state() {
    let result = decode(PRODUCTS).unwrap();
    let mut state = GridState::default();
    state.set_filter("queso");
    state.toggle_sort("UnitPrice");
    let page = pipeline::apply(&result, &mut state);
    assert_eq!(page.filtered_count, 2);

    let artifact = grid::export(&result, ExportFormat::Json).unwrap().unwrap();
    let rows: Vec<serde_json::Value> = serde_json::from_str(&artifact.contents).unwrap();
    assert_eq!(rows.len(), 12);
    assert_eq!(rows[0]["ProductName"], "Chai");
}

#[test]
fn test_sort_by_price_pages_through_all_rows() {
    let result = decode(PRODUCTS).unwrap();
    let mut state = GridState::default();
    assert_eq!(state.toggle_sort("UnitPrice"), SortDirection::Ascending);
    assert_eq!(state.toggle_sort("UnitPrice"), SortDirection::Descending);

    let first = pipeline::apply(&result, &mut state);
    assert_eq!(first.page_count, 2);
    assert_eq!(result.rows[first.row_indices[0]][1], "Mishi Kobe Niku");

    state.next_page(first.filtered_count);
    let second = pipeline::apply(&result, &mut state);
    let names: Vec<&str> = second.rows(&result).map(|(_, r)| r[1].as_str()).collect();
    assert_eq!(names, vec!["Chai", "Aniseed Syrup"]);
}

#[test]
fn test_filter_matching_nothing() {
    let result = decode(PRODUCTS).unwrap();
    let mut state = GridState::default();
    state.goto_page(1, result.row_count());
    state.set_filter("no such product");

    let page = pipeline::apply(&result, &mut state);
    assert!(page.row_indices.is_empty());
    assert_eq!(state.page_index(), 0);
}

#[test]
fn test_resize_limits() {
    let mut state = GridState::default();
    assert_eq!(state.resize_column("ProductName", 10), 100);
    assert_eq!(state.resize_column("ProductName", 4000), 400);
}
