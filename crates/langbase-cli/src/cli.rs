//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// langbase: reconcile linguistic registries into relational tables
#[derive(Parser)]
#[command(name = "langbase")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline and export Families, Genera and Languages
    Run {
        /// Directory holding languoid.csv, language.csv and languages-and-dialects-geo.csv
        #[arg(long, value_name = "DIR")]
        input_dir: Option<PathBuf>,

        /// Languoid registry (overrides --input-dir)
        #[arg(long)]
        languoid: Option<PathBuf>,

        /// Language registry (overrides --input-dir)
        #[arg(long)]
        language: Option<PathBuf>,

        /// Geographic registry (overrides --input-dir)
        #[arg(long)]
        geo: Option<PathBuf>,

        /// Output directory for the exported tables
        #[arg(short, long)]
        output: PathBuf,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Also write the canonical-dialect intermediates
        #[arg(long)]
        keep_preprocessed: bool,

        /// Also write Endangerment_Rates.csv
        #[arg(long)]
        rates: bool,

        /// Print up to N rejected rows per source
        #[arg(long, value_name = "N", default_value = "0")]
        show_rejected: usize,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-encode a single-quoted registry file into canonical CSV
    Normalize {
        /// Raw registry file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Parse one file and report columns, rows and rejected rows
    Inspect {
        /// Canonical CSV file (or a raw registry with --source-dialect)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Input uses the single-quoted registry dialect
        #[arg(long)]
        source_dialect: bool,

        /// Print up to N rejected rows
        #[arg(long, value_name = "N", default_value = "10")]
        show_rejected: usize,
    },
}
