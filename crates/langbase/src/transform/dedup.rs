//! Key-based deduplication.

use std::collections::HashSet;

use crate::error::Result;
use crate::table::Table;

/// A deduplicated table and the number of rows removed.
#[derive(Debug, Clone)]
pub struct DedupOutcome {
    pub table: Table,
    pub dropped: usize,
}

/// Keep the first row for each distinct value of `key`, preserving input
/// order. Rows with a null key are always kept.
pub fn deduplicate(table: Table, key: &str) -> Result<DedupOutcome> {
    table.require_columns(&[key])?;

    let Table { name, columns, rows } = table;
    let mut seen: HashSet<String> = HashSet::with_capacity(rows.len());
    let mut kept = Vec::with_capacity(rows.len());
    let mut dropped = 0;

    for row in rows {
        let duplicate = match row.get(key).and_then(|v| v.as_deref()) {
            Some(value) => !seen.insert(value.to_string()),
            None => false,
        };
        if duplicate {
            dropped += 1;
        } else {
            kept.push(row);
        }
    }

    if dropped > 0 {
        tracing::info!(table = %name, key, dropped, "dropped duplicate rows");
    }

    Ok(DedupOutcome {
        table: Table { name, columns, rows: kept },
        dropped,
    })
}
