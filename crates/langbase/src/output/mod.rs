//! Export of final tables to canonical-dialect CSV.

mod exporter;

pub use exporter::{ExportBatch, TableExporter};
