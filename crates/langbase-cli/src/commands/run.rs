//! Run command - full pipeline from raw registries to exported tables.

use std::path::PathBuf;

use colored::Colorize;
use langbase::{Pipeline, PipelineConfig, PipelineResult, SourceKind, SourcePaths};

use super::print_rejected;

/// Arguments of the `run` command.
pub struct RunArgs {
    pub input_dir: Option<PathBuf>,
    pub languoid: Option<PathBuf>,
    pub language: Option<PathBuf>,
    pub geo: Option<PathBuf>,
    pub output: PathBuf,
    pub config: Option<PathBuf>,
    pub keep_preprocessed: bool,
    pub rates: bool,
    pub show_rejected: usize,
    pub json: bool,
}

pub fn run(args: RunArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let paths = resolve_paths(&args)?;
    for kind in SourceKind::ALL {
        let path = paths.get(kind);
        if !path.exists() {
            return Err(format!("{} file not found: {}", kind, path.display()).into());
        }
    }

    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    config.keep_preprocessed |= args.keep_preprocessed;
    config.write_rates |= args.rates;

    if !args.json {
        println!(
            "{} {}",
            "Processing".cyan().bold(),
            paths.language.display().to_string().white()
        );
    }

    let pipeline = Pipeline::with_config(config);
    let result = pipeline.run_and_export(&paths, &args.output)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.summary)?);
        return Ok(());
    }

    print_summary(&result, args.show_rejected, verbose);
    Ok(())
}

fn resolve_paths(args: &RunArgs) -> Result<SourcePaths, Box<dyn std::error::Error>> {
    let defaults = args.input_dir.as_ref().map(|dir| SourcePaths::in_dir(dir));
    let pick = |explicit: &Option<PathBuf>, kind: SourceKind| -> Result<PathBuf, String> {
        explicit
            .clone()
            .or_else(|| defaults.as_ref().map(|d| d.get(kind).to_path_buf()))
            .ok_or_else(|| format!("No {} file: pass --{} or --input-dir", kind, kind))
    };

    Ok(SourcePaths {
        languoid: pick(&args.languoid, SourceKind::Languoid)?,
        language: pick(&args.language, SourceKind::Language)?,
        geo: pick(&args.geo, SourceKind::Geo)?,
    })
}

fn print_summary(result: &PipelineResult, show_rejected: usize, verbose: bool) {
    let summary = &result.summary;

    println!();
    for source in &summary.sources {
        let rejected = if source.rows_rejected > 0 {
            format!("{} rejected", source.rows_rejected).red().to_string()
        } else {
            "0 rejected".green().to_string()
        };
        println!(
            "  {:10} {:>8} rows, {}, {} duplicates",
            source.source.to_string().bold(),
            source.rows_loaded,
            rejected,
            source.duplicates_dropped
        );
        if verbose {
            println!("  {:10} {}", "", source.hash.dimmed());
        }
        print_rejected(result.rejected(source.source), show_rejected);
    }

    println!();
    println!(
        "Joined {} languages ({} with status, {} with coordinates)",
        summary.languages.to_string().white().bold(),
        summary.status_matches,
        summary.geo_matches
    );
    println!(
        "Derived {} families and {} genera",
        summary.families.to_string().white().bold(),
        summary.genera.to_string().white().bold()
    );

    println!();
    for path in &summary.written {
        println!("{} {}", "Wrote".green().bold(), path.display().to_string().white());
    }

    if summary.total_rejected() > 0 && show_rejected == 0 {
        println!();
        println!(
            "{} {} malformed rows were skipped. Re-run with {} to see them.",
            "Warning:".yellow().bold(),
            summary.total_rejected(),
            "--show-rejected 10".cyan()
        );
    }
}
