//! Tolerant table reader.
//!
//! Parses a canonical-dialect file into a [`Table`] of text values. Rows that
//! do not tokenize into exactly one value per header column are diverted into
//! a list of [`RejectedRow`]s instead of failing the load. Only file-level
//! faults (I/O, missing header) are errors.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LangbaseError, Result};
use crate::table::{Row, Table};

use super::dialect::Dialect;

/// Literal tokens read as null by default.
pub const DEFAULT_NULL_TOKENS: &[&str] = &["", "NULL", "NaN"];

/// Reader configuration.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Dialect of the input.
    pub dialect: Dialect,
    /// Exact field values that become null while parsing.
    pub null_tokens: Vec<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::CANONICAL,
            null_tokens: DEFAULT_NULL_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Why a row was not loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    /// The row does not have one field per header column.
    FieldCount { expected: usize, found: usize },
    /// A field is not valid UTF-8.
    InvalidUtf8 { field: usize },
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::FieldCount { expected, found } => {
                write!(f, "expected {} fields, found {}", expected, found)
            }
            RejectReason::InvalidUtf8 { field } => write!(f, "field {} is not valid UTF-8", field + 1),
        }
    }
}

/// A row excluded from the loaded table, kept verbatim for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRow {
    /// 1-based line on which the row starts.
    pub line: u64,
    /// Fields as tokenized, lossily decoded.
    pub fields: Vec<String>,
    pub reason: RejectReason,
}

impl RejectedRow {
    /// The row's fields joined with `delimiter`.
    pub fn raw(&self, delimiter: char) -> String {
        self.fields.join(&delimiter.to_string())
    }
}

/// Reads canonical-dialect CSV into tables.
#[derive(Debug, Clone, Default)]
pub struct TableReader {
    config: ReaderConfig,
}

impl TableReader {
    /// Create a reader with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader with custom configuration.
    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Read a file. The table is named after `name`.
    pub fn read_path(&self, path: &Path, name: &str) -> Result<(Table, Vec<RejectedRow>)> {
        let file = File::open(path).map_err(|e| LangbaseError::io(path, e))?;
        self.read(file, name)
    }

    /// Read an in-memory buffer.
    pub fn read_bytes(&self, bytes: &[u8], name: &str) -> Result<(Table, Vec<RejectedRow>)> {
        self.read(bytes, name)
    }

    /// Read from any source. The first record is the header.
    pub fn read<R: Read>(&self, input: R, name: &str) -> Result<(Table, Vec<RejectedRow>)> {
        let mut reader = self.config.dialect.reader_builder().from_reader(input);
        let mut record = csv::ByteRecord::new();

        if !reader.read_byte_record(&mut record)? {
            return Err(LangbaseError::EmptyData(format!("'{}' has no header row", name)));
        }
        let columns = header_names(&record);
        let mut table = Table::new(name, columns);

        let mut rejected = Vec::new();
        while reader.read_byte_record(&mut record)? {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            match self.decode_row(&record, &table.columns) {
                Ok(row) => table.rows.push(row),
                Err(reason) => rejected.push(RejectedRow {
                    line,
                    fields: record
                        .iter()
                        .map(|f| String::from_utf8_lossy(f).into_owned())
                        .collect(),
                    reason,
                }),
            }
        }

        for row in &rejected {
            tracing::debug!(table = name, line = row.line, reason = %row.reason, "rejected row");
        }
        if !rejected.is_empty() {
            tracing::warn!(table = name, rejected = rejected.len(), "skipped malformed rows");
        }
        tracing::info!(table = name, rows = table.row_count(), columns = table.column_count(), "loaded table");

        Ok((table, rejected))
    }

    /// Convert one record to a row, or say why it cannot be one.
    fn decode_row(&self, record: &csv::ByteRecord, columns: &[String]) -> std::result::Result<Row, RejectReason> {
        if record.len() != columns.len() {
            return Err(RejectReason::FieldCount {
                expected: columns.len(),
                found: record.len(),
            });
        }

        let mut row = Row::with_capacity(columns.len());
        for (index, (column, field)) in columns.iter().zip(record.iter()).enumerate() {
            let text = std::str::from_utf8(field).map_err(|_| RejectReason::InvalidUtf8 { field: index })?;
            row.insert(column.clone(), self.null_or_value(text));
        }
        Ok(row)
    }

    fn null_or_value(&self, text: &str) -> Option<String> {
        if self.config.null_tokens.iter().any(|t| t == text) {
            None
        } else {
            Some(text.to_string())
        }
    }
}

/// Decode header names. Repeated names get the lowest `.N` suffix not
/// already taken, so every column stays addressable under a distinct name.
fn header_names(record: &csv::ByteRecord) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(record.len());
    let mut suffixes: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(record.len());
    for field in record.iter() {
        let base = String::from_utf8_lossy(field).into_owned();
        let mut name = base.clone();
        while used.contains(&name) {
            let suffix = suffixes.entry(base.clone()).or_insert(0);
            *suffix += 1;
            name = format!("{}.{}", base, suffix);
        }
        used.insert(name.clone());
        names.push(name);
    }
    names
}
