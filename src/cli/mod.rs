pub mod columns;
pub mod config;
pub mod convert;

use clap::{Parser, Subcommand};

use crate::normalizer::DateOrder;

#[derive(Parser)]
#[command(
    name = "ledgerline",
    version,
    about = "Turn bank statement exports into a canonical, categorized ledger."
)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the detected header row and column names of a statement.
    Columns {
        /// Path to a CSV, XLS or XLSX statement
        file: String,
        /// Number of body rows to preview
        #[arg(long, default_value = "5")]
        rows: usize,
    },
    /// Convert a statement into the canonical ledger format.
    Convert {
        /// Path to a CSV, XLS or XLSX statement
        file: String,
        /// Account name written on every row
        #[arg(long)]
        account: String,
        /// Column holding the transaction date
        #[arg(long)]
        date: String,
        /// Column holding the transaction description
        #[arg(long)]
        description: String,
        /// Column holding the signed amount
        #[arg(long)]
        amount: String,
        /// Previously categorized ledger used to suggest Details/Category
        #[arg(long)]
        history: Option<String>,
        /// Reconciled flag written on every row (default from settings)
        #[arg(long)]
        reconciled: Option<String>,
        /// Output path (default: <output_dir>/<file stem>-ledger.csv)
        #[arg(long)]
        output: Option<String>,
    },
    /// Show or change settings.
    Config {
        /// Default directory for converted ledgers
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
        /// Minimum similarity (exclusive) for a suggestion, 0 to 1
        #[arg(long)]
        threshold: Option<f64>,
        /// Treat one description containing the other as a perfect match
        #[arg(long = "substring-match")]
        substring_match: Option<bool>,
        /// How many leading rows to search for the header
        #[arg(long = "scan-rows")]
        scan_rows: Option<usize>,
        /// How to read ambiguous dates such as 03/04/2024
        #[arg(long = "date-order", value_parser = parse_date_order)]
        date_order: Option<DateOrder>,
        /// Default reconciled flag
        #[arg(long)]
        reconciled: Option<String>,
    },
}

fn parse_date_order(s: &str) -> std::result::Result<DateOrder, String> {
    match s {
        "day_first" | "day-first" | "dmy" => Ok(DateOrder::DayFirst),
        "month_first" | "month-first" | "mdy" => Ok(DateOrder::MonthFirst),
        _ => Err(format!("expected day_first or month_first, got '{s}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_date_order() {
        assert_eq!(parse_date_order("day_first"), Ok(DateOrder::DayFirst));
        assert_eq!(parse_date_order("mdy"), Ok(DateOrder::MonthFirst));
        assert!(parse_date_order("ymd").is_err());
    }
}
