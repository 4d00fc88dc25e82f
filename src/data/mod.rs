//! Row data for QueryDeck.
//!
//! Fetching delimited text for a session, decoding it into a result set,
//! and the result set types themselves.

pub mod csv;
pub mod fetch;
mod types;

pub use self::csv::{decode, CsvDecoder};
pub use fetch::{
    resource_path, FailingResourceFetcher, HttpResourceFetcher, ResourceFetcher,
    StaticResourceFetcher,
};
pub use types::{ColumnDetail, FieldType, ResultSet, Row};
