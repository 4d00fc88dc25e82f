//! Result export.
//!
//! Exports always cover the full decoded result, ignoring the grid's
//! filter, sort and paging.

use crate::data::ResultSet;
use crate::error::{QueryDeckError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Shown instead of an artifact when there is nothing to export.
pub const NO_DATA_NOTICE: &str = "No data to export.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Csv => "exported_data.csv",
            Self::Json => "exported_data.json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "CSV"),
            Self::Json => write!(f, "JSON"),
        }
    }
}

/// A downloadable file produced from a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub file_name: String,
    pub mime_type: String,
    pub contents: String,
}

/// Exports `result` in `format`.
///
/// Returns `Ok(None)` for an empty result; callers show [`NO_DATA_NOTICE`].
pub fn export(result: &ResultSet, format: ExportFormat) -> Result<Option<ExportArtifact>> {
    if result.is_empty() {
        return Ok(None);
    }

    let contents = match format {
        ExportFormat::Csv => to_csv(result),
        ExportFormat::Json => to_json(result)?,
    };

    Ok(Some(ExportArtifact {
        format,
        file_name: format.file_name().to_string(),
        mime_type: format.mime_type().to_string(),
        contents,
    }))
}

/// Header line then one line per row, joined with `\n`.
pub fn to_csv(result: &ResultSet) -> String {
    let mut lines = Vec::with_capacity(result.rows.len() + 1);
    lines.push(csv_line(&result.columns));
    lines.extend(result.rows.iter().map(|row| csv_line(row)));
    lines.join("\n")
}

fn csv_line(values: &[String]) -> String {
    values
        .iter()
        .map(|v| escape_csv_field(v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Quote-wraps a field containing a comma, quote or line break.
fn escape_csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Pretty-printed array of row objects, keys in column order.
pub fn to_json(result: &ResultSet) -> Result<String> {
    let objects: Vec<Map<String, JsonValue>> = (0..result.row_count())
        .filter_map(|i| result.row_object(i))
        .collect();

    serde_json::to_string_pretty(&objects)
        .map_err(|e| QueryDeckError::internal(format!("Failed to serialize export: {e}")))
}
