//! Input parsing and data source handling.

mod dialect;
mod reader;
mod source;
mod tokenizer;

pub use dialect::{Dialect, NormalizeStats, QuoteNormalizer};
pub use reader::{DEFAULT_NULL_TOKENS, ReaderConfig, RejectReason, RejectedRow, TableReader};
pub use source::{LoadedSource, SourceMetadata};
