//! Loaded sources and their metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::schema::SourceKind;
use crate::table::Table;

use super::reader::RejectedRow;

/// Metadata about one source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the raw file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Rows loaded (excluding header).
    pub row_count: usize,
    /// Rows diverted by the reader.
    pub rejected_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Describe a file from its raw bytes and load counts.
    pub fn new(path: PathBuf, contents: &[u8], row_count: usize, rejected_count: usize) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut hasher = Sha256::new();
        hasher.update(contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        Self {
            file,
            path,
            hash,
            size_bytes: contents.len() as u64,
            row_count,
            rejected_count,
            loaded_at: Utc::now(),
        }
    }
}

/// One source registry after normalization and parsing.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub kind: SourceKind,
    pub metadata: SourceMetadata,
    pub table: Table,
    /// Rows the reader could not load, in file order.
    pub rejected: Vec<RejectedRow>,
}
