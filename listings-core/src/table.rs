//! In-memory table model and delimited-text parsing.
//!
//! A `Table` is a header plus homogeneous string records: every row carries
//! exactly one value per column, in header order. Values are never coerced,
//! so identifiers like `0001` or `TRUE` survive untouched.

use chrono::NaiveDateTime;
use std::collections::HashSet;
use thiserror::Error;

/// First-column prefix of the trailer row NASDAQ Trader appends to each file.
const CREATION_TIME_PREFIX: &str = "File Creation Time:";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("listing is empty (no header row)")]
    Empty,

    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("duplicate column in header: {0}")]
    DuplicateColumn(String),

    #[error("row {row} has {found} fields, header has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("delimiter {0:?} is not a single-byte ASCII character")]
    Delimiter(char),

    #[error("malformed listing: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, checking that the header has no duplicates and that every
    /// row is as wide as the header.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, ParseError> {
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.as_str()) {
                return Err(ParseError::DuplicateColumn(col.clone()));
            }
        }
        if let Some((row, r)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != columns.len())
        {
            return Err(ParseError::RaggedRow {
                row,
                expected: columns.len(),
                found: r.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Like [`Table::column_index`] but failing with `MissingColumn`.
    pub fn require_column(&self, name: &str) -> Result<usize, ParseError> {
        self.column_index(name)
            .ok_or_else(|| ParseError::MissingColumn(name.to_string()))
    }

    /// All values of one column, top to bottom.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |r| r[index].as_str())
    }

    /// Keep only rows matching the predicate.
    pub fn filter<F>(self, mut keep: F) -> Self
    where
        F: FnMut(&[String]) -> bool,
    {
        let rows = self.rows.into_iter().filter(|r| keep(r)).collect();
        Self {
            columns: self.columns,
            rows,
        }
    }

    /// Append a column whose value is computed from each row.
    pub fn with_column<F>(mut self, name: &str, mut derive: F) -> Result<Self, ParseError>
    where
        F: FnMut(&[String]) -> String,
    {
        if self.column_index(name).is_some() {
            return Err(ParseError::DuplicateColumn(name.to_string()));
        }
        for row in &mut self.rows {
            let value = derive(row);
            row.push(value);
        }
        self.columns.push(name.to_string());
        Ok(self)
    }

    /// Move the column at `from` to position `to`, shifting the columns in
    /// between. Applied identically to the header and every row.
    pub fn move_column(mut self, from: usize, to: usize) -> Self {
        let col = self.columns.remove(from);
        self.columns.insert(to, col);
        for row in &mut self.rows {
            let value = row.remove(from);
            row.insert(to, value);
        }
        self
    }

    /// Project onto the given column indices, in the given order.
    pub fn select(&self, indices: &[usize]) -> Self {
        let columns = indices.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|r| indices.iter().map(|&i| r[i].clone()).collect())
            .collect();
        Self { columns, rows }
    }
}

/// Parse delimited text with a header row into a [`Table`].
///
/// Rows whose field count differs from the header are rejected. Lines may end
/// in `\n` or `\r\n`. The delimiter must be ASCII.
pub fn parse_listing(text: &str, delimiter: char) -> Result<Table, ParseError> {
    let delimiter = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(ParseError::Delimiter(delimiter))?;

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
        return Err(ParseError::Empty);
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Table::new(columns, rows)
}

/// Extract the `File Creation Time: MMDDYYYYHH:MM` trailer, if present.
///
/// The trailer sits in the first column of the last row.
pub fn creation_time(table: &Table) -> Option<NaiveDateTime> {
    let last = table.rows().last()?;
    let stamp = last.first()?.strip_prefix(CREATION_TIME_PREFIX)?.trim();
    NaiveDateTime::parse_from_str(stamp, "%m%d%Y%H:%M").ok()
}
