//! Delimited-text decoding.
//!
//! The first non-blank record is the header. Fields are scanned with a single
//! "inside quotes" flag: a quote toggles it, and the delimiter and line breaks
//! only separate fields and records while it is off. No type coercion happens
//! here; every value decodes as a string.

use super::types::{ResultSet, Row};
use crate::error::{QueryDeckError, Result};

/// Decoder for delimited text with quote-aware field scanning.
#[derive(Debug, Clone, Copy)]
pub struct CsvDecoder {
    delimiter: char,
    quote: char,
}

impl Default for CsvDecoder {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
        }
    }
}

impl CsvDecoder {
    /// Creates a decoder with custom delimiter and quote characters.
    pub fn new(delimiter: char, quote: char) -> Result<Self> {
        if delimiter == quote {
            return Err(QueryDeckError::config(
                "delimiter and quote character must differ",
            ));
        }
        if delimiter == '\n' || quote == '\n' {
            return Err(QueryDeckError::config(
                "line break cannot be used as delimiter or quote",
            ));
        }
        Ok(Self { delimiter, quote })
    }

    /// Decodes `text` into a result set.
    ///
    /// Blank records are skipped. Rows shorter than the header are padded
    /// with empty strings; extra trailing fields are dropped.
    pub fn decode(&self, text: &str) -> Result<ResultSet> {
        let mut records = self.scan(text)?.into_iter();

        let Some(header) = records.next() else {
            return Ok(ResultSet::new());
        };

        let columns: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();
        let width = columns.len();

        let rows: Vec<Row> = records
            .map(|mut fields| {
                fields.resize(width, String::new());
                fields
            })
            .collect();

        Ok(ResultSet::with_data(columns, rows))
    }

    /// Splits `text` into records of raw field values.
    fn scan(&self, text: &str) -> Result<Vec<Vec<String>>> {
        let mut records = Vec::new();
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut blank = true;
        let mut line = 1usize;
        let mut record_line = 1usize;

        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch == self.quote {
                in_quotes = !in_quotes;
                blank = false;
            } else if in_quotes {
                if ch == '\n' {
                    line += 1;
                }
                current.push(ch);
            } else if ch == self.delimiter {
                fields.push(std::mem::take(&mut current));
                if !ch.is_whitespace() {
                    blank = false;
                }
            } else if ch == '\r' && chars.peek() == Some(&'\n') {
                // CRLF: the '\n' closes the record
            } else if ch == '\n' {
                fields.push(std::mem::take(&mut current));
                if blank {
                    fields.clear();
                } else {
                    records.push(std::mem::take(&mut fields));
                }
                blank = true;
                line += 1;
                record_line = line;
            } else {
                if !ch.is_whitespace() {
                    blank = false;
                }
                current.push(ch);
            }
        }

        if in_quotes {
            return Err(QueryDeckError::decode(format!(
                "unterminated quoted field in record starting on line {record_line}"
            )));
        }

        fields.push(current);
        if !blank {
            records.push(fields);
        }

        Ok(records)
    }
}

/// Decodes comma-separated text with the default decoder.
pub fn decode(text: &str) -> Result<ResultSet> {
    CsvDecoder::default().decode(text)
}
