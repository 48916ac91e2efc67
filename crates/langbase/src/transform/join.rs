//! Left-outer joins over tables.
//!
//! The right table is projected to its key and payload columns before the
//! join. Each left row matches at most one right row; a right table that is
//! not unique on the join key is rejected, and the output always has exactly
//! as many rows as the left table.

use std::collections::HashMap;

use crate::error::{LangbaseError, Result};
use crate::table::Table;

/// One pair of matching columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinKey {
    pub left: String,
    pub right: String,
}

/// What to join on and which right-side columns to bring along.
#[derive(Debug, Clone)]
pub struct JoinSpec {
    /// Stage name for logs and errors.
    pub stage: String,
    pub keys: Vec<JoinKey>,
    /// Right-side payload columns, in output order.
    pub right_columns: Vec<String>,
}

impl JoinSpec {
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            keys: Vec::new(),
            right_columns: Vec::new(),
        }
    }

    /// Match `left` on the left table with `right` on the right table.
    pub fn on(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.keys.push(JoinKey {
            left: left.into(),
            right: right.into(),
        });
        self
    }

    /// Bring these right-side columns into the result.
    pub fn take<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.right_columns.extend(columns.into_iter().map(Into::into));
        self
    }
}

/// A joined table and how many left rows found a match.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub table: Table,
    pub matched: usize,
}

/// Fail with [`LangbaseError::JoinCardinality`] unless a join kept every left row.
pub fn check_cardinality(stage: &str, left_rows: usize, result_rows: usize) -> Result<()> {
    if left_rows != result_rows {
        return Err(LangbaseError::JoinCardinality {
            stage: stage.to_string(),
            left_rows,
            result_rows,
        });
    }
    Ok(())
}

/// Engine for joining tables.
#[derive(Debug, Clone, Default)]
pub struct JoinEngine;

impl JoinEngine {
    /// Create a new join engine.
    pub fn new() -> Self {
        Self
    }

    /// Left-outer-join `right` onto `left`.
    ///
    /// The result keeps the left table's name, columns and row order, and
    /// appends the requested right-side columns. Unmatched rows get null in
    /// those columns. Null key values never match.
    pub fn left_join(&self, left: &Table, right: &Table, spec: &JoinSpec) -> Result<JoinOutcome> {
        self.validate(left, right, spec)?;

        let right_keys: Vec<&str> = spec.keys.iter().map(|k| k.right.as_str()).collect();
        let mut projection = right_keys.clone();
        projection.extend(spec.right_columns.iter().map(String::as_str));
        let right = right.project(&projection)?;

        let mut index: HashMap<Vec<&str>, usize> = HashMap::with_capacity(right.row_count());
        for (position, row) in right.rows.iter().enumerate() {
            let key: Option<Vec<&str>> = right_keys
                .iter()
                .map(|k| row.get(*k).and_then(|v| v.as_deref()))
                .collect();
            let Some(key) = key else { continue };
            if index.insert(key.clone(), position).is_some() {
                return Err(LangbaseError::DuplicateJoinKey {
                    stage: spec.stage.clone(),
                    key: key.join("|"),
                });
            }
        }

        let mut table = Table::new(left.name.clone(), left.columns.clone());
        table.columns.extend(spec.right_columns.iter().cloned());
        table.rows.reserve(left.row_count());

        let mut matched = 0;
        for left_row in &left.rows {
            let key: Option<Vec<&str>> = spec
                .keys
                .iter()
                .map(|k| left_row.get(&k.left).and_then(|v| v.as_deref()))
                .collect();
            let right_row = key
                .and_then(|k| index.get(&k).copied())
                .map(|position| &right.rows[position]);
            if right_row.is_some() {
                matched += 1;
            }

            let mut row = left_row.clone();
            for column in &spec.right_columns {
                let value = right_row.and_then(|r| r.get(column).cloned().flatten());
                row.insert(column.clone(), value);
            }
            table.rows.push(row);
        }

        check_cardinality(&spec.stage, left.row_count(), table.row_count())?;
        tracing::info!(
            stage = %spec.stage,
            rows = table.row_count(),
            matched,
            unmatched = table.row_count() - matched,
            "left join complete"
        );

        Ok(JoinOutcome { table, matched })
    }

    fn validate(&self, left: &Table, right: &Table, spec: &JoinSpec) -> Result<()> {
        if spec.keys.is_empty() {
            return Err(LangbaseError::Config(format!(
                "join '{}' has no key columns",
                spec.stage
            )));
        }

        let left_keys: Vec<&str> = spec.keys.iter().map(|k| k.left.as_str()).collect();
        left.require_columns(&left_keys)?;
        let right_keys: Vec<&str> = spec.keys.iter().map(|k| k.right.as_str()).collect();
        right.require_columns(&right_keys)?;
        let payload: Vec<&str> = spec.right_columns.iter().map(String::as_str).collect();
        right.require_columns(&payload)?;

        for (i, column) in spec.right_columns.iter().enumerate() {
            let repeated = spec.right_columns[..i].contains(column);
            if left.has_column(column) || right_keys.contains(&column.as_str()) || repeated {
                return Err(LangbaseError::ColumnConflict {
                    stage: spec.stage.clone(),
                    column: column.clone(),
                });
            }
        }
        Ok(())
    }
}
