//! Field normalizer: applies column rules across every row of a table.

use crate::error::Result;
use crate::table::Table;

use super::operations::{ColumnRule, TransformChange, TransformResult};

/// Applies [`ColumnRule`]s to tables.
#[derive(Debug, Clone, Default)]
pub struct FieldNormalizer;

impl FieldNormalizer {
    /// Create a new field normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Apply rules in order. Row count and row order never change; a rule
    /// with a target column adds that column to the table.
    ///
    /// Fails before touching the table if a rule names a missing column.
    pub fn apply(&self, table: &mut Table, rules: &[ColumnRule]) -> Result<TransformResult> {
        let sources: Vec<&str> = rules.iter().map(|r| r.column.as_str()).collect();
        table.require_columns(&sources)?;

        let mut result = TransformResult::new();
        for rule in rules {
            let change = self.apply_rule(table, rule);
            if rule.target.is_some() {
                result.columns_added += 1;
            }
            tracing::debug!(
                table = %table.name,
                rule = %change.description,
                changed = change.values_changed,
                "applied column rule"
            );
            result.add_change(change);
        }
        Ok(result)
    }

    fn apply_rule(&self, table: &mut Table, rule: &ColumnRule) -> TransformChange {
        let output = rule.output_column().to_string();
        let mut values_changed = 0;

        for row in &mut table.rows {
            let original = row.get(&rule.column).cloned().flatten();
            let cleaned = rule.apply(original.clone());
            if cleaned != original {
                values_changed += 1;
            }
            row.insert(output.clone(), cleaned);
        }
        if !table.has_column(&output) {
            table.columns.push(output.clone());
        }

        TransformChange {
            description: rule.description(),
            column: output,
            values_changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LangbaseError;
    use crate::transform::FieldTransform;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn languages() -> Table {
        Table::from_values(
            "language",
            ["glottocode", "family", "genus"],
            vec![
                vec![s("abcd1234"), s(" Austronesian "), s("Oceanic")],
                vec![s("efgh5678"), None, s(" Germanic")],
            ],
        )
    }

    #[test]
    fn test_in_place_rule() {
        let mut table = languages();
        let rules = vec![
            ColumnRule::new("family")
                .then(FieldTransform::Trim)
                .then(FieldTransform::Lowercase),
        ];
        let result = FieldNormalizer::new().apply(&mut table, &rules).unwrap();

        assert_eq!(table.value(0, "family"), Some("austronesian"));
        assert_eq!(table.value(1, "family"), None);
        assert_eq!(table.row_count(), 2);
        assert_eq!(result.operations_applied, 1);
        assert_eq!(result.values_changed, 1);
        assert_eq!(result.columns_added, 0);
    }

    #[test]
    fn test_derived_column_rule() {
        let mut table = Table::from_values(
            "languoid",
            ["id", "status"],
            vec![vec![s("a1"), s("'Safe'")], vec![s("b2"), None]],
        );
        let rules = vec![
            ColumnRule::new("status")
                .into_column("status_cleaned")
                .then(FieldTransform::NullToLiteral("unknown".to_string()))
                .then(FieldTransform::CleanStatus),
        ];
        let result = FieldNormalizer::new().apply(&mut table, &rules).unwrap();

        assert_eq!(table.columns, vec!["id", "status", "status_cleaned"]);
        assert_eq!(table.value(0, "status"), Some("'Safe'"));
        assert_eq!(table.value(0, "status_cleaned"), Some("safe"));
        assert_eq!(table.value(1, "status_cleaned"), Some("unknown"));
        assert_eq!(result.columns_added, 1);
    }

    #[test]
    fn test_missing_column_fails_before_changes() {
        let mut table = languages();
        let rules = vec![
            ColumnRule::new("family").then(FieldTransform::Lowercase),
            ColumnRule::new("absent").then(FieldTransform::Trim),
        ];
        let err = FieldNormalizer::new().apply(&mut table, &rules).unwrap_err();
        assert!(matches!(err, LangbaseError::MissingColumn { .. }));
        assert_eq!(table.value(0, "family"), Some(" Austronesian "));
    }
}
