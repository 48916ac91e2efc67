//! Per-field cleaning operations and their bookkeeping.

use serde::{Deserialize, Serialize};

/// A cleaning function applied to one optional value.
///
/// Every transform accepts a null value. Only [`FieldTransform::NullToLiteral`]
/// turns null into something else; the others leave it null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum FieldTransform {
    /// Strip leading and trailing whitespace.
    Trim,
    /// Lower-case the value.
    Lowercase,
    /// Remove single quotes and newlines, then trim, then lower-case.
    CleanStatus,
    /// Replace a null value with a literal.
    NullToLiteral(String),
}

impl FieldTransform {
    /// Apply the transform to one value.
    pub fn apply(&self, value: Option<String>) -> Option<String> {
        match self {
            FieldTransform::NullToLiteral(literal) => Some(value.unwrap_or_else(|| literal.clone())),
            FieldTransform::Trim => value.map(|v| v.trim().to_string()),
            FieldTransform::Lowercase => value.map(|v| v.to_lowercase()),
            FieldTransform::CleanStatus => value.map(|v| {
                let stripped: String = v.chars().filter(|c| *c != '\'' && *c != '\n').collect();
                stripped.trim().to_lowercase()
            }),
        }
    }

    /// Get a human-readable description of the transform.
    pub fn description(&self) -> String {
        match self {
            FieldTransform::Trim => "trim".to_string(),
            FieldTransform::Lowercase => "lowercase".to_string(),
            FieldTransform::CleanStatus => "strip quotes and newlines, trim, lowercase".to_string(),
            FieldTransform::NullToLiteral(literal) => format!("null → '{}'", literal),
        }
    }
}

/// An ordered transform chain for one column.
///
/// With a target set, the cleaned values go to a new column and the source
/// column is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRule {
    pub column: String,
    pub target: Option<String>,
    pub chain: Vec<FieldTransform>,
}

impl ColumnRule {
    /// Start an empty chain on `column`.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            target: None,
            chain: Vec::new(),
        }
    }

    /// Append a transform to the chain.
    pub fn then(mut self, transform: FieldTransform) -> Self {
        self.chain.push(transform);
        self
    }

    /// Write the result into `target` instead of in place.
    pub fn into_column(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Column the rule writes to.
    pub fn output_column(&self) -> &str {
        self.target.as_deref().unwrap_or(&self.column)
    }

    /// Run the whole chain over one value.
    pub fn apply(&self, value: Option<String>) -> Option<String> {
        self.chain.iter().fold(value, |v, t| t.apply(v))
    }

    /// Describe the chain, e.g. `trim, lowercase`.
    pub fn description(&self) -> String {
        let steps: Vec<String> = self.chain.iter().map(|t| t.description()).collect();
        match &self.target {
            Some(target) => format!("{} → '{}': {}", self.column, target, steps.join(", ")),
            None => format!("{}: {}", self.column, steps.join(", ")),
        }
    }
}

/// Result of applying column rules to a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformResult {
    /// Number of rules applied.
    pub operations_applied: usize,

    /// Number of cell values that changed.
    pub values_changed: usize,

    /// Number of columns added.
    pub columns_added: usize,

    /// Detailed changes for each rule.
    pub changes: Vec<TransformChange>,
}

/// A single rule's effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformChange {
    /// Description of the rule.
    pub description: String,

    /// Column written.
    pub column: String,

    /// Number of values that differ from the source value.
    pub values_changed: usize,
}

impl TransformResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self {
            operations_applied: 0,
            values_changed: 0,
            columns_added: 0,
            changes: Vec::new(),
        }
    }

    /// Add a change to the result.
    pub fn add_change(&mut self, change: TransformChange) {
        self.operations_applied += 1;
        self.values_changed += change.values_changed;
        self.changes.push(change);
    }
}

impl Default for TransformResult {
    fn default() -> Self {
        Self::new()
    }
}
