//! Inspect command - parse one file and report what was loaded.

use std::path::PathBuf;

use colored::Colorize;
use langbase::{QuoteNormalizer, TableReader};

use super::print_rejected;

pub fn run(
    file: PathBuf,
    source_dialect: bool,
    show_rejected: usize,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read(&file).map_err(|e| format!("Cannot read {}: {}", file.display(), e))?;
    let canonical = if source_dialect {
        QuoteNormalizer::new().normalize_bytes(&raw)?.0
    } else {
        raw
    };

    let name = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (table, rejected) = TableReader::new().read_bytes(&canonical, &name)?;

    println!("{} {}", "Inspecting".cyan().bold(), file.display().to_string().white());
    println!();
    println!("Columns ({}):", table.column_count());
    for column in &table.columns {
        if verbose {
            let nulls = table.column_values(column).filter(Option::is_none).count();
            println!("  {:24} {} null", column, nulls);
        } else {
            println!("  {}", column);
        }
    }
    println!();
    println!("Rows loaded: {}", table.row_count().to_string().white().bold());

    if rejected.is_empty() {
        println!("Rows rejected: {}", "0".green());
    } else {
        println!("Rows rejected: {}", rejected.len().to_string().red().bold());
        print_rejected(&rejected, show_rejected);
    }
    Ok(())
}
