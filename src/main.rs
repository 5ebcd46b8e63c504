mod cli;
mod error;
mod fmt;
mod header;
mod ledger;
mod loader;
mod models;
mod normalizer;
mod pipeline;
mod settings;
mod suggester;
mod tabulator;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use models::ColumnMapping;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ledgerline={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Columns { file, rows } => cli::columns::run(&file, rows),
        Commands::Convert {
            file,
            account,
            date,
            description,
            amount,
            history,
            reconciled,
            output,
        } => cli::convert::run(cli::convert::ConvertArgs {
            file,
            account,
            mapping: ColumnMapping {
                date,
                description,
                amount,
            },
            history,
            reconciled,
            output,
        }),
        Commands::Config {
            output_dir,
            threshold,
            substring_match,
            scan_rows,
            date_order,
            reconciled,
        } => cli::config::run(cli::config::ConfigUpdate {
            output_dir,
            threshold,
            substring_match,
            scan_rows,
            date_order,
            reconciled,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
