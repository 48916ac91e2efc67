//! CSV dialects and the quote normalizer.
//!
//! The registries ship single-quoted, backslash-escaped CSV. Everything
//! downstream reads the canonical dialect: double quotes, quoted only when
//! necessary. The normalizer re-encodes one into the other without
//! dropping or merging records.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{LangbaseError, Result};

use super::tokenizer::EscapedTokenizer;

/// Delimiter, quote and escape characters that define a CSV dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub quote: u8,
    /// Escape character. The normalizer honours it anywhere in a source
    /// file; the `csv` reader only inside quoted fields.
    pub escape: Option<u8>,
}

impl Dialect {
    /// Dialect of the raw registry files. The escape applies inside and
    /// outside quoted fields.
    pub const SOURCE: Dialect = Dialect {
        delimiter: b',',
        quote: b'\'',
        escape: Some(b'\\'),
    };

    /// Dialect of preprocessed and exported files.
    pub const CANONICAL: Dialect = Dialect {
        delimiter: b',',
        quote: b'"',
        escape: None,
    };

    /// Reader for this dialect. Headers are not interpreted and records of
    /// any length are returned.
    pub fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .escape(self.escape)
            .double_quote(true)
            .has_headers(false)
            .flexible(true);
        builder
    }

    /// Writer for this dialect: minimal quoting, embedded quotes doubled.
    pub fn writer_builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .quote_style(csv::QuoteStyle::Necessary)
            .double_quote(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .has_headers(false)
            .flexible(true);
        builder
    }
}

/// Counters from one normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    /// Records written, header included.
    pub records: usize,
    /// Fields written across all records.
    pub fields: usize,
}

/// Re-encodes CSV from one dialect into another.
#[derive(Debug, Clone)]
pub struct QuoteNormalizer {
    source: Dialect,
    target: Dialect,
}

impl QuoteNormalizer {
    /// Normalizer from the registry dialect to the canonical one.
    pub fn new() -> Self {
        Self::with_dialects(Dialect::SOURCE, Dialect::CANONICAL)
    }

    /// Normalizer between arbitrary dialects.
    pub fn with_dialects(source: Dialect, target: Dialect) -> Self {
        Self { source, target }
    }

    /// Re-encode everything from `input` into `output` in a single pass.
    ///
    /// Every record the source tokenizer yields is written, whatever its
    /// field count. Escapes are resolved; other field bytes are copied
    /// unchanged.
    pub fn normalize<R: Read, W: Write>(&self, mut input: R, output: W) -> Result<NormalizeStats> {
        let mut raw = Vec::new();
        input.read_to_end(&mut raw).map_err(csv::Error::from)?;

        let mut tokenizer = EscapedTokenizer::new(&raw, self.source);
        let mut writer = self.target.writer_builder().from_writer(output);
        let mut stats = NormalizeStats::default();

        let mut record = csv::ByteRecord::new();
        while tokenizer.read_record(&mut record) {
            writer.write_byte_record(&record)?;
            stats.records += 1;
            stats.fields += record.len();
        }

        writer.flush().map_err(csv::Error::from)?;
        Ok(stats)
    }

    /// Re-encode an in-memory buffer.
    pub fn normalize_bytes(&self, input: &[u8]) -> Result<(Vec<u8>, NormalizeStats)> {
        let mut output = Vec::with_capacity(input.len());
        let stats = self.normalize(input, &mut output)?;
        Ok((output, stats))
    }

    /// Re-encode `input` into a new file at `output`.
    pub fn normalize_file(&self, input: &Path, output: &Path) -> Result<NormalizeStats> {
        let source = File::open(input).map_err(|e| LangbaseError::io(input, e))?;
        let target = File::create(output).map_err(|e| LangbaseError::io(output, e))?;
        self.normalize(source, target)
    }
}

impl Default for QuoteNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
