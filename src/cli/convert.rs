use std::path::PathBuf;

use colored::Colorize;

use crate::error::Result;
use crate::fmt::grouped;
use crate::ledger::default_output_path;
use crate::models::{ColumnMapping, Field};
use crate::pipeline::{Job, Pipeline, PipelineOptions};
use crate::settings::{load_settings, shellexpand_path};

pub struct ConvertArgs {
    pub file: String,
    pub account: String,
    pub mapping: ColumnMapping,
    pub history: Option<String>,
    pub reconciled: Option<String>,
    pub output: Option<String>,
}

pub fn run(args: ConvertArgs) -> Result<()> {
    let settings = load_settings();
    let statement = PathBuf::from(&args.file);
    let history = args.history.as_ref().map(PathBuf::from);
    let output = args
        .output
        .as_deref()
        .map(|p| PathBuf::from(shellexpand_path(p)))
        .unwrap_or_else(|| default_output_path(&settings.output_dir(), &statement));
    let reconciled = args.reconciled.as_deref().unwrap_or(&settings.reconciled);

    let pipeline = Pipeline::new(PipelineOptions::from(&settings));
    let summary = pipeline.run(&Job {
        statement: &statement,
        history: history.as_deref(),
        mapping: args.mapping,
        account_name: &args.account,
        reconciled,
        output: &output,
    })?;

    let ledger = &summary.ledger;
    let net: f64 = ledger.transactions.iter().filter_map(|t| t.amount).sum();
    println!(
        "{} {} transactions written to {}",
        "\u{2713}".green(),
        ledger.transactions.len(),
        summary.output.display()
    );
    println!("  Net amount: {}", grouped(net));
    println!("  Skipped {} blank rows", ledger.blank_rows);
    match summary.history_records {
        Some(0) => println!("  {}", "History unusable, no suggestions made".yellow()),
        Some(n) => println!("  {} suggestions from {n} history records", ledger.suggested),
        None => {}
    }

    let bad_dates = ledger.unparsed(Field::Date);
    let bad_amounts = ledger.unparsed(Field::Amount);
    if bad_dates > 0 || bad_amounts > 0 {
        println!(
            "  {}",
            format!("{bad_dates} unreadable dates, {bad_amounts} unreadable amounts (left blank)")
                .yellow()
        );
    }
    Ok(())
}
