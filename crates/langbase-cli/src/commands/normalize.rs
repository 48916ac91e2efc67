//! Normalize command - re-encode a raw registry into canonical CSV.

use std::path::PathBuf;

use colored::Colorize;
use langbase::QuoteNormalizer;

pub fn run(file: PathBuf, output: PathBuf, _verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let stats = QuoteNormalizer::new().normalize_file(&file, &output)?;

    println!(
        "{} {} records ({} fields) to {}",
        "Normalized".green().bold(),
        stats.records.to_string().white().bold(),
        stats.fields,
        output.display().to_string().white()
    );
    Ok(())
}
