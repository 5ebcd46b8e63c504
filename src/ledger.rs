use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::fmt::{ledger_amount, ledger_date};
use crate::models::Transaction;

/// Field order of every ledger row. The file itself has no header line.
#[allow(dead_code)]
pub const LEDGER_FIELDS: [&str; 8] = [
    "Account Name",
    "Date",
    "Details",
    "Category",
    "Notes",
    "Cheque/Check Number",
    "Amount",
    "Reconciled",
];

pub fn ledger_record(t: &Transaction) -> [String; 8] {
    [
        t.account_name.clone(),
        ledger_date(t.date),
        t.details.clone(),
        t.category.clone(),
        t.notes.clone(),
        t.cheque_number.clone(),
        ledger_amount(t.amount),
        t.reconciled.clone(),
    ]
}

pub fn write_ledger<W: Write>(writer: W, transactions: &[Transaction]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for t in transactions {
        wtr.write_record(ledger_record(t))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_ledger_file(path: &Path, transactions: &[Transaction]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    write_ledger(std::io::BufWriter::new(file), transactions)?;
    info!(path = %path.display(), rows = transactions.len(), "ledger written");
    Ok(())
}

/// `<output_dir>/<input stem>-ledger.csv`
pub fn default_output_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("statement");
    output_dir.join(format!("{stem}-ledger.csv"))
}
