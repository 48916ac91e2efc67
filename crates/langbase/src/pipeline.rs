//! Main `Pipeline` struct and public API.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dimension::Dimensions;
use crate::error::{LangbaseError, Result};
use crate::input::{
    DEFAULT_NULL_TOKENS, Dialect, LoadedSource, QuoteNormalizer, ReaderConfig, RejectedRow,
    SourceMetadata, TableReader,
};
use crate::output::{ExportBatch, TableExporter};
use crate::report::{DEFAULT_ENDANGERED_STATUSES, endangerment_rates, rates_table};
use crate::schema::{
    FAMILIES_COLUMNS, FAMILIES_FILE, GENERA_COLUMNS, GENERA_FILE, LANGUAGES_COLUMNS, LANGUAGES_FILE,
    OUTPUT_RENAMES, RATES_COLUMNS, RATES_FILE, SourceKind, geo, language, languoid,
};
use crate::table::Table;
use crate::transform::{ColumnRule, FieldNormalizer, FieldTransform, JoinEngine, JoinSpec, deduplicate};

/// Configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Field values read as null.
    pub null_tokens: Vec<String>,
    /// Literal substituted for missing status, family and genus.
    pub unknown_literal: String,
    /// Also write the canonical-dialect intermediates.
    pub keep_preprocessed: bool,
    /// Also write the endangerment-rate summary.
    pub write_rates: bool,
    /// Cleaned statuses counted as endangered.
    pub endangered_statuses: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            null_tokens: DEFAULT_NULL_TOKENS.iter().map(|t| t.to_string()).collect(),
            unknown_literal: "unknown".to_string(),
            keep_preprocessed: false,
            write_rates: false,
            endangered_statuses: DEFAULT_ENDANGERED_STATUSES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file. Missing keys take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| LangbaseError::io(path, e))?;
        let config: PipelineConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.unknown_literal.is_empty() {
            return Err(LangbaseError::Config("unknown_literal must not be empty".to_string()));
        }
        if self.null_tokens.contains(&self.unknown_literal) {
            return Err(LangbaseError::Config(format!(
                "unknown_literal '{}' is also a null token",
                self.unknown_literal
            )));
        }
        Ok(())
    }
}

/// Locations of the three raw registries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub languoid: PathBuf,
    pub language: PathBuf,
    pub geo: PathBuf,
}

impl SourcePaths {
    /// The conventional file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            languoid: dir.join(SourceKind::Languoid.default_file_name()),
            language: dir.join(SourceKind::Language.default_file_name()),
            geo: dir.join(SourceKind::Geo.default_file_name()),
        }
    }

    pub fn get(&self, kind: SourceKind) -> &Path {
        match kind {
            SourceKind::Languoid => &self.languoid,
            SourceKind::Language => &self.language,
            SourceKind::Geo => &self.geo,
        }
    }
}

/// Per-source counts for the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub source: SourceKind,
    pub file: String,
    pub hash: String,
    pub rows_loaded: usize,
    pub rows_rejected: usize,
    pub duplicates_dropped: usize,
}

/// Counts describing one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub sources: Vec<SourceSummary>,
    /// Rows in the joined language table.
    pub languages: usize,
    /// Language rows that found a languoid status.
    pub status_matches: usize,
    /// Language rows that found a geo record.
    pub geo_matches: usize,
    pub families: usize,
    pub genera: usize,
    /// Files written by the export, empty when nothing was exported.
    pub written: Vec<PathBuf>,
}

impl RunSummary {
    /// Total rows rejected across sources.
    pub fn total_rejected(&self) -> usize {
        self.sources.iter().map(|s| s.rows_rejected).sum()
    }
}

/// Output of the transform stages.
#[derive(Debug, Clone)]
pub struct Transformed {
    /// Joined language rows with names, status, coordinates and surrogate keys.
    pub languages: Table,
    pub dimensions: Dimensions,
    /// Duplicates dropped per source, in [`SourceKind::ALL`] order.
    pub duplicates_dropped: [usize; 3],
    pub status_matches: usize,
    pub geo_matches: usize,
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Loaded sources in [`SourceKind::ALL`] order, rejected rows included.
    pub sources: Vec<LoadedSource>,
    /// Final language table (all columns; export projects it).
    pub languages: Table,
    pub families: Table,
    pub genera: Table,
    pub dimensions: Dimensions,
    /// Endangerment summary, when enabled.
    pub rates: Option<Table>,
    pub summary: RunSummary,
    preprocessed: Vec<(SourceKind, Vec<u8>)>,
}

impl PipelineResult {
    pub fn source(&self, kind: SourceKind) -> Option<&LoadedSource> {
        self.sources.iter().find(|s| s.kind == kind)
    }

    /// Rows the reader rejected for one source.
    pub fn rejected(&self, kind: SourceKind) -> &[RejectedRow] {
        self.source(kind).map(|s| s.rejected.as_slice()).unwrap_or(&[])
    }
}

/// The registry ETL pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    normalizer: QuoteNormalizer,
    reader: TableReader,
    fields: FieldNormalizer,
    joins: JoinEngine,
}

impl Pipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        let reader = TableReader::with_config(ReaderConfig {
            dialect: Dialect::CANONICAL,
            null_tokens: config.null_tokens.clone(),
        });

        Self {
            config,
            normalizer: QuoteNormalizer::new(),
            reader,
            fields: FieldNormalizer::new(),
            joins: JoinEngine::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Normalize and parse one raw registry file.
    ///
    /// Any fatal error is reported with the source name and path.
    pub fn load_source(&self, kind: SourceKind, path: &Path) -> Result<LoadedSource> {
        self.load_with_canonical(kind, path).map(|(source, _)| source)
    }

    fn load_with_canonical(&self, kind: SourceKind, path: &Path) -> Result<(LoadedSource, Vec<u8>)> {
        let wrap = |e: LangbaseError| LangbaseError::Source {
            source_name: kind.to_string(),
            path: path.to_path_buf(),
            source: Box::new(e),
        };

        let raw = fs::read(path).map_err(|e| wrap(LangbaseError::io(path, e)))?;
        let (canonical, stats) = self.normalizer.normalize_bytes(&raw).map_err(wrap)?;
        tracing::debug!(source = %kind, records = stats.records, "normalized quoting");

        let (table, rejected) = self
            .reader
            .read_bytes(&canonical, &kind.to_string())
            .map_err(wrap)?;
        table.require_columns(kind.required_columns()).map_err(wrap)?;

        let metadata = SourceMetadata::new(path.to_path_buf(), &raw, table.row_count(), rejected.len());
        Ok((
            LoadedSource {
                kind,
                metadata,
                table,
                rejected,
            },
            canonical,
        ))
    }

    /// Clean, deduplicate, join and derive dimensions.
    ///
    /// Pure over its inputs: the same tables always give the same output.
    pub fn transform(&self, languoids: Table, languages: Table, geos: Table) -> Result<Transformed> {
        let unknown = self.config.unknown_literal.as_str();

        let mut languoids = languoids;
        let mut languages = languages;
        let mut geos = geos;
        self.fields.apply(&mut languoids, &languoid_rules(unknown))?;
        self.fields.apply(&mut languages, &language_rules())?;
        self.fields.apply(&mut geos, &geo_rules())?;

        let languoids = deduplicate(languoids, SourceKind::Languoid.key_column())?;
        let languages = deduplicate(languages, SourceKind::Language.key_column())?;
        let geos = deduplicate(geos, SourceKind::Geo.key_column())?;
        let duplicates_dropped = [languoids.dropped, languages.dropped, geos.dropped];

        let base = languages.table.project(SourceKind::Language.required_columns())?;

        let status_join = JoinSpec::new("languoid status")
            .on(SourceKind::Language.key_column(), SourceKind::Languoid.key_column())
            .take([languoid::STATUS_CLEANED]);
        let with_status = self.joins.left_join(&base, &languoids.table, &status_join)?;

        let geo_join = JoinSpec::new("geo coordinates")
            .on(SourceKind::Language.key_column(), SourceKind::Geo.key_column())
            .take([geo::LATITUDE, geo::LONGITUDE, geo::MACROAREA, geo::COUNTRYCODES]);
        let with_geo = self.joins.left_join(&with_status.table, &geos.table, &geo_join)?;

        let mut joined = with_geo.table;
        joined.fill_null(languoid::STATUS_CLEANED, unknown)?;
        joined.fill_null(language::FAMILY, unknown)?;
        joined.fill_null(language::GENUS, unknown)?;
        joined.rename_columns(OUTPUT_RENAMES);
        joined.name = "languages".to_string();

        let dimensions = Dimensions::extract(&joined)?;
        dimensions.attach(&mut joined)?;

        tracing::info!(
            languages = joined.row_count(),
            families = dimensions.family_count(),
            genera = dimensions.genus_count(),
            "transform complete"
        );

        Ok(Transformed {
            languages: joined,
            dimensions,
            duplicates_dropped,
            status_matches: with_status.matched,
            geo_matches: with_geo.matched,
        })
    }

    /// Load every source and run the transform stages, in memory.
    pub fn run(&self, paths: &SourcePaths) -> Result<PipelineResult> {
        let mut sources = Vec::with_capacity(3);
        let mut preprocessed = Vec::new();
        for kind in SourceKind::ALL {
            let (source, canonical) = self.load_with_canonical(kind, paths.get(kind))?;
            if self.config.keep_preprocessed {
                preprocessed.push((kind, canonical));
            }
            sources.push(source);
        }

        let transformed = self.transform(
            sources[0].table.clone(),
            sources[1].table.clone(),
            sources[2].table.clone(),
        )?;

        let rates = if self.config.write_rates {
            let rates = endangerment_rates(&transformed.languages, &self.config.endangered_statuses)?;
            Some(rates_table(&rates))
        } else {
            None
        };

        let summary = RunSummary {
            sources: sources
                .iter()
                .zip(transformed.duplicates_dropped)
                .map(|(s, dropped)| SourceSummary {
                    source: s.kind,
                    file: s.metadata.file.clone(),
                    hash: s.metadata.hash.clone(),
                    rows_loaded: s.metadata.row_count,
                    rows_rejected: s.metadata.rejected_count,
                    duplicates_dropped: dropped,
                })
                .collect(),
            languages: transformed.languages.row_count(),
            status_matches: transformed.status_matches,
            geo_matches: transformed.geo_matches,
            families: transformed.dimensions.family_count(),
            genera: transformed.dimensions.genus_count(),
            written: Vec::new(),
        };

        Ok(PipelineResult {
            sources,
            families: transformed.dimensions.families_table(),
            genera: transformed.dimensions.genera_table(),
            languages: transformed.languages,
            dimensions: transformed.dimensions,
            rates,
            summary,
            preprocessed,
        })
    }

    /// Write a result's tables into `dir`. All files are written or none.
    pub fn export(&self, result: &PipelineResult, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut batch = ExportBatch::new(dir)?;
        batch.add_table(FAMILIES_FILE, &result.families, &TableExporter::new(FAMILIES_COLUMNS))?;
        batch.add_table(GENERA_FILE, &result.genera, &TableExporter::new(GENERA_COLUMNS))?;
        batch.add_table(LANGUAGES_FILE, &result.languages, &TableExporter::new(LANGUAGES_COLUMNS))?;
        if let Some(rates) = &result.rates {
            batch.add_table(RATES_FILE, rates, &TableExporter::new(RATES_COLUMNS))?;
        }
        for (kind, bytes) in &result.preprocessed {
            batch.add_bytes(kind.preprocessed_file_name(), bytes)?;
        }
        batch.commit()
    }

    /// Run the full pipeline and export into `dir`.
    pub fn run_and_export(&self, paths: &SourcePaths, dir: &Path) -> Result<PipelineResult> {
        let mut result = self.run(paths)?;
        result.summary.written = self.export(&result, dir)?;
        Ok(result)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn languoid_rules(unknown: &str) -> Vec<ColumnRule> {
    vec![
        ColumnRule::new(languoid::STATUS)
            .into_column(languoid::STATUS_CLEANED)
            .then(FieldTransform::NullToLiteral(unknown.to_string()))
            .then(FieldTransform::CleanStatus),
        ColumnRule::new(languoid::NAME).then(FieldTransform::Trim),
    ]
}

fn language_rules() -> Vec<ColumnRule> {
    vec![
        ColumnRule::new(language::FAMILY)
            .then(FieldTransform::Trim)
            .then(FieldTransform::Lowercase),
        ColumnRule::new(language::GENUS)
            .then(FieldTransform::Trim)
            .then(FieldTransform::Lowercase),
        ColumnRule::new(language::NAME).then(FieldTransform::Trim),
    ]
}

fn geo_rules() -> Vec<ColumnRule> {
    vec![ColumnRule::new(geo::NAME).then(FieldTransform::Trim)]
}
