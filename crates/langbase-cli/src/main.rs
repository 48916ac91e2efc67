//! langbase CLI - registry ETL pipeline.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            input_dir,
            languoid,
            language,
            geo,
            output,
            config,
            keep_preprocessed,
            rates,
            show_rejected,
            json,
        } => commands::run::run(
            commands::run::RunArgs {
                input_dir,
                languoid,
                language,
                geo,
                output,
                config,
                keep_preprocessed,
                rates,
                show_rejected,
                json,
            },
            cli.verbose,
        ),

        Commands::Normalize { file, output } => commands::normalize::run(file, output, cli.verbose),

        Commands::Inspect {
            file,
            source_dialect,
            show_rejected,
        } => commands::inspect::run(file, source_dialect, show_rejected, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
