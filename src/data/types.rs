//! Result set types for QueryDeck.
//!
//! Decoded rows are kept positionally aligned with the column list; all
//! values are strings. Field types are display hints only.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::time::Duration;

/// A decoded row. Index `i` holds the value of column `i`.
pub type Row = Vec<String>;

/// The rows produced by one load of a session's data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResultSet {
    /// Column names, in header order.
    pub columns: Vec<String>,

    /// Rows of data.
    pub rows: Vec<Row>,

    /// Time from the start of the load (including any simulated delay) to decoded rows.
    #[serde(with = "duration_serde")]
    pub loaded_at: Duration,

    /// Error bound to this result, if the load failed.
    #[serde(default)]
    pub error: Option<String>,
}

impl ResultSet {
    /// Creates a new empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a result set with the given columns and rows.
    pub fn with_data(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            loaded_at: Duration::ZERO,
            error: None,
        }
    }

    /// Creates an empty result set carrying an error message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Sets the load time.
    pub fn with_loaded_at(mut self, duration: Duration) -> Self {
        self.loaded_at = duration;
        self
    }

    /// Returns true if the result set has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the position of a column by name.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Returns a single value by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Returns a row as a column → value object, in column order.
    ///
    /// A repeated column name gets a `_2`, `_3`, ... suffix so no value is lost.
    pub fn row_object(&self, row: usize) -> Option<Map<String, JsonValue>> {
        let values = self.rows.get(row)?;
        let mut object = Map::new();
        for (column, value) in self.columns.iter().zip(values.iter()) {
            let mut key = column.clone();
            let mut n = 2;
            while object.contains_key(&key) {
                key = format!("{column}_{n}");
                n += 1;
            }
            object.insert(key, JsonValue::String(value.clone()));
        }
        Some(object)
    }

    /// Lists each column with its display type.
    pub fn column_details(&self) -> Vec<ColumnDetail> {
        self.columns
            .iter()
            .map(|name| ColumnDetail {
                column: name.clone(),
                field_type: FieldType::for_column(name),
            })
            .collect()
    }
}

/// Display type of a column, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Number,
    String,
}

impl FieldType {
    /// Classifies a column: names containing the token `ID` (case-sensitive)
    /// are numeric, everything else is text.
    pub fn for_column(name: &str) -> Self {
        if name.contains("ID") {
            Self::Number
        } else {
            Self::String
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "Number",
            Self::String => "String",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the "Columns" view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDetail {
    pub column: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// Serde support for Duration (stored as whole milliseconds).
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
