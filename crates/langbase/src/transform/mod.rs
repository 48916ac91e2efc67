//! Table transformations: field cleaning, deduplication and joins.

mod dedup;
mod engine;
mod join;
mod operations;

pub use dedup::{DedupOutcome, deduplicate};
pub use engine::FieldNormalizer;
pub use join::{JoinEngine, JoinKey, JoinOutcome, JoinSpec, check_cardinality};
pub use operations::{ColumnRule, FieldTransform, TransformChange, TransformResult};
