//! langbase: reconcile linguistic reference registries into relational tables.
//!
//! Three registries (languoids, languages, geography) arrive as
//! single-quoted CSV. The pipeline re-encodes them into a canonical
//! dialect, parses them tolerantly, cleans and deduplicates them, joins them
//! on the glottocode and derives Families and Genera dimension tables with
//! dense surrogate keys.
//!
//! # Core Principles
//!
//! - **No silent loss**: malformed rows are returned, never dropped unseen
//! - **Row-preserving joins**: every language row survives every join
//! - **Deterministic keys**: surrogate IDs follow first occurrence
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use langbase::{Pipeline, SourceKind, SourcePaths};
//!
//! let pipeline = Pipeline::new();
//! let result = pipeline
//!     .run_and_export(&SourcePaths::in_dir("raw"), Path::new("cleaned"))
//!     .unwrap();
//!
//! println!("Languages: {}", result.summary.languages);
//! println!("Rejected languoid rows: {}", result.rejected(SourceKind::Languoid).len());
//! ```

pub mod dimension;
pub mod error;
pub mod input;
pub mod output;
pub mod report;
pub mod schema;
pub mod table;
pub mod transform;

mod pipeline;

pub use crate::pipeline::{
    Pipeline, PipelineConfig, PipelineResult, RunSummary, SourcePaths, SourceSummary, Transformed,
};
pub use dimension::{Dimensions, Family, Genus};
pub use error::{LangbaseError, Result};
pub use input::{LoadedSource, QuoteNormalizer, RejectedRow, SourceMetadata, TableReader};
pub use schema::SourceKind;
pub use table::{Row, Table};
