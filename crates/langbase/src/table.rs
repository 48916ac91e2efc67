//! In-memory table model shared by every pipeline stage.
//!
//! A [`Table`] is an ordered sequence of rows, each row a mapping from
//! column name to an optional text value. `None` is the null marker; it is
//! kept distinct from `Some("")`.

use indexmap::IndexMap;

use crate::error::{LangbaseError, Result};

/// One row: column name to optional value, in column order.
pub type Row = IndexMap<String, Option<String>>;

/// A named table of text values.
///
/// Every row holds exactly the table's columns, in the table's column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Table name, used in error messages and logs.
    pub name: String,
    /// Column names, in order.
    pub columns: Vec<String>,
    /// Rows in input order.
    pub rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given columns.
    pub fn new<S: Into<String>>(name: impl Into<String>, columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from positional values. Each inner vector must have one
    /// value per column; missing trailing values become null.
    pub fn from_values<S: Into<String>>(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = S>,
        values: Vec<Vec<Option<String>>>,
    ) -> Self {
        let mut table = Self::new(name, columns);
        for row_values in values {
            let mut values = row_values.into_iter();
            let row = table
                .columns
                .iter()
                .map(|c| (c.clone(), values.next().flatten()))
                .collect();
            table.rows.push(row);
        }
        table
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Check whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Fail with [`LangbaseError::MissingColumn`] unless every column exists.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        for name in names {
            if !self.has_column(name) {
                return Err(LangbaseError::MissingColumn {
                    table: self.name.clone(),
                    column: (*name).to_string(),
                });
            }
        }
        Ok(())
    }

    /// Append a row, normalizing it to the table's columns. Columns absent
    /// from `row` become null; keys that are not columns are discarded.
    pub fn push_row(&mut self, mut row: Row) {
        let normalized = self
            .columns
            .iter()
            .map(|c| {
                let value = row.swap_remove(c).flatten();
                (c.clone(), value)
            })
            .collect();
        self.rows.push(normalized);
    }

    /// Get a specific cell value. Null and unknown cells both yield `None`.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|v| v.as_deref())
    }

    /// Iterate over the values of one column.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = Option<&'a str>> + 'a {
        self.rows
            .iter()
            .map(move |row| row.get(column).and_then(|v| v.as_deref()))
    }

    /// Keep only the named columns, in the given order.
    pub fn project(&self, columns: &[&str]) -> Result<Table> {
        self.require_columns(columns)?;
        let rows = self
            .rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| ((*c).to_string(), row.get(*c).cloned().flatten()))
                    .collect()
            })
            .collect();
        Ok(Table {
            name: self.name.clone(),
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows,
        })
    }

    /// Rename columns. Pairs whose source column does not exist are ignored.
    pub fn rename_columns(&mut self, renames: &[(&str, &str)]) {
        for (from, to) in renames {
            if let Some(pos) = self.columns.iter().position(|c| c == from) {
                self.columns[pos] = (*to).to_string();
                for row in &mut self.rows {
                    if let Some(index) = row.get_index_of(*from) {
                        let value = row.shift_remove_index(index).and_then(|(_, v)| v);
                        row.shift_insert(index, (*to).to_string(), value);
                    }
                }
            }
        }
    }

    /// Append a column whose value is computed per row.
    pub fn add_column<F>(&mut self, name: &str, mut value: F)
    where
        F: FnMut(&Row) -> Option<String>,
    {
        for row in &mut self.rows {
            let v = value(row);
            row.insert(name.to_string(), v);
        }
        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
    }

    /// Replace null values in one column with a literal.
    ///
    /// Returns the number of cells filled.
    pub fn fill_null(&mut self, column: &str, literal: &str) -> Result<usize> {
        self.require_columns(&[column])?;
        let mut filled = 0;
        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(column) {
                if cell.is_none() {
                    *cell = Some(literal.to_string());
                    filled += 1;
                }
            }
        }
        Ok(filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn sample() -> Table {
        Table::from_values(
            "sample",
            ["id", "name"],
            vec![vec![s("a"), s("Alpha")], vec![s("b"), None]],
        )
    }

    #[test]
    fn test_from_values_pads_missing() {
        let table = Table::from_values("t", ["a", "b"], vec![vec![s("1")]]);
        assert_eq!(table.value(0, "a"), Some("1"));
        assert_eq!(table.value(0, "b"), None);
        assert_eq!(table.rows[0].len(), 2);
    }

    #[test]
    fn test_project_orders_columns() {
        let table = sample().project(&["name", "id"]).unwrap();
        assert_eq!(table.columns, vec!["name", "id"]);
        let keys: Vec<_> = table.rows[0].keys().cloned().collect();
        assert_eq!(keys, vec!["name", "id"]);
    }

    #[test]
    fn test_project_missing_column() {
        let err = sample().project(&["nope"]).unwrap_err();
        assert!(matches!(err, LangbaseError::MissingColumn { .. }));
    }

    #[test]
    fn test_rename_keeps_position() {
        let mut table = sample();
        table.rename_columns(&[("id", "Language_ID")]);
        assert_eq!(table.columns, vec!["Language_ID", "name"]);
        let keys: Vec<_> = table.rows[1].keys().cloned().collect();
        assert_eq!(keys, vec!["Language_ID", "name"]);
        assert_eq!(table.value(1, "Language_ID"), Some("b"));
    }

    #[test]
    fn test_fill_null() {
        let mut table = sample();
        let filled = table.fill_null("name", "unknown").unwrap();
        assert_eq!(filled, 1);
        assert_eq!(table.value(1, "name"), Some("unknown"));
        assert_eq!(table.value(0, "name"), Some("Alpha"));
    }

    #[test]
    fn test_push_row_normalizes_keys() {
        let mut table = sample();
        let mut row = Row::new();
        row.insert("name".to_string(), s("Gamma"));
        row.insert("extra".to_string(), s("x"));
        table.push_row(row);
        let keys: Vec<_> = table.rows[2].keys().cloned().collect();
        assert_eq!(keys, vec!["id", "name"]);
        assert_eq!(table.value(2, "id"), None);
    }
}
