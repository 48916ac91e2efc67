//! Column contracts for the source registries and the exported tables.
//!
//! Renaming or reordering any of the export column lists breaks downstream
//! consumers that read the files by position.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Columns of the languoid registry.
pub mod languoid {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const STATUS: &str = "status";
    /// Derived from [`STATUS`] by the field normalizer.
    pub const STATUS_CLEANED: &str = "status_cleaned";
}

/// Columns of the language registry.
pub mod language {
    pub const GLOTTOCODE: &str = "glottocode";
    pub const NAME: &str = "Name";
    pub const ISO_CODE: &str = "iso_code";
    pub const FAMILY: &str = "family";
    pub const GENUS: &str = "genus";
}

/// Columns of the geographic registry.
pub mod geo {
    pub const GLOTTOCODE: &str = "glottocode";
    pub const NAME: &str = "name";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const MACROAREA: &str = "macroarea";
    pub const COUNTRYCODES: &str = "countrycodes";
}

/// Columns of the exported tables.
pub mod output {
    pub const LANGUAGE_ID: &str = "Language_ID";
    pub const LANGUAGE_NAME: &str = "Language_Name";
    pub const ISO_CODE: &str = "ISO_Code";
    pub const FAMILY_ID: &str = "Family_ID";
    pub const FAMILY_NAME: &str = "Family_Name";
    pub const GENUS_ID: &str = "Genus_ID";
    pub const GENUS_NAME: &str = "Genus_Name";
    pub const STATUS: &str = "Status";
    pub const MACROAREA: &str = "Macroarea";
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";
    pub const COUNTRYCODES: &str = "Countrycodes";
    pub const TOTAL_LANGUAGES: &str = "Total_Languages";
    pub const ENDANGERED_LANGUAGES: &str = "Endangered_Languages";
    pub const ENDANGERMENT_RATE: &str = "Endangerment_Rate_Percentage";
}

/// `Families.csv` column order.
pub const FAMILIES_COLUMNS: &[&str] = &[output::FAMILY_ID, output::FAMILY_NAME];

/// `Genera.csv` column order.
pub const GENERA_COLUMNS: &[&str] = &[output::GENUS_ID, output::GENUS_NAME, output::FAMILY_ID];

/// `Languages.csv` column order.
pub const LANGUAGES_COLUMNS: &[&str] = &[
    output::LANGUAGE_ID,
    output::LANGUAGE_NAME,
    output::ISO_CODE,
    output::FAMILY_ID,
    output::GENUS_ID,
    output::STATUS,
    output::MACROAREA,
    output::LATITUDE,
    output::LONGITUDE,
    output::COUNTRYCODES,
];

/// `Endangerment_Rates.csv` column order.
pub const RATES_COLUMNS: &[&str] = &[
    output::FAMILY_NAME,
    output::GENUS_NAME,
    output::TOTAL_LANGUAGES,
    output::ENDANGERED_LANGUAGES,
    output::ENDANGERMENT_RATE,
];

/// Joined-table column to export column renames, applied after the joins.
pub const OUTPUT_RENAMES: &[(&str, &str)] = &[
    (language::GLOTTOCODE, output::LANGUAGE_ID),
    (language::NAME, output::LANGUAGE_NAME),
    (language::ISO_CODE, output::ISO_CODE),
    (language::FAMILY, output::FAMILY_NAME),
    (language::GENUS, output::GENUS_NAME),
    (languoid::STATUS_CLEANED, output::STATUS),
    (geo::MACROAREA, output::MACROAREA),
    (geo::LATITUDE, output::LATITUDE),
    (geo::LONGITUDE, output::LONGITUDE),
    (geo::COUNTRYCODES, output::COUNTRYCODES),
];

pub const FAMILIES_FILE: &str = "Families.csv";
pub const GENERA_FILE: &str = "Genera.csv";
pub const LANGUAGES_FILE: &str = "Languages.csv";
pub const RATES_FILE: &str = "Endangerment_Rates.csv";

/// The three source registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Languoid,
    Language,
    Geo,
}

impl SourceKind {
    /// All sources, in load order.
    pub const ALL: [SourceKind; 3] = [SourceKind::Languoid, SourceKind::Language, SourceKind::Geo];

    /// Conventional file name of the raw registry.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            SourceKind::Languoid => "languoid.csv",
            SourceKind::Language => "language.csv",
            SourceKind::Geo => "languages-and-dialects-geo.csv",
        }
    }

    /// File name of the canonical-dialect intermediate.
    pub fn preprocessed_file_name(&self) -> &'static str {
        match self {
            SourceKind::Languoid => "preprocessed_languoid.csv",
            SourceKind::Language => "preprocessed_language.csv",
            SourceKind::Geo => "preprocessed_languages_and_dialects_geo.csv",
        }
    }

    /// Columns the pipeline reads from this source.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            SourceKind::Languoid => &[languoid::ID, languoid::NAME, languoid::STATUS],
            SourceKind::Language => &[
                language::GLOTTOCODE,
                language::NAME,
                language::ISO_CODE,
                language::FAMILY,
                language::GENUS,
            ],
            SourceKind::Geo => &[
                geo::GLOTTOCODE,
                geo::NAME,
                geo::LATITUDE,
                geo::LONGITUDE,
                geo::MACROAREA,
                geo::COUNTRYCODES,
            ],
        }
    }

    /// Key column used for deduplication and joins.
    pub fn key_column(&self) -> &'static str {
        match self {
            SourceKind::Languoid => languoid::ID,
            SourceKind::Language => language::GLOTTOCODE,
            SourceKind::Geo => geo::GLOTTOCODE,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Languoid => "languoid",
            SourceKind::Language => "language",
            SourceKind::Geo => "geo",
        };
        f.write_str(name)
    }
}
