use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::Result;
use crate::header;
use crate::ledger::write_ledger_file;
use crate::loader;
use crate::models::{ColumnMapping, Table};
use crate::normalizer::{normalize, DateOrder, NormalizeOptions, NormalizedLedger};
use crate::settings::Settings;
use crate::suggester::{MatchConfig, SuggestionIndex};
use crate::tabulator::tabulate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    pub scan_rows: usize,
    pub date_order: DateOrder,
    pub matching: MatchConfig,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            scan_rows: header::DEFAULT_SCAN_ROWS,
            date_order: DateOrder::default(),
            matching: MatchConfig::default(),
        }
    }
}

impl From<&Settings> for PipelineOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            scan_rows: settings.header_scan_rows,
            date_order: settings.date_order,
            matching: settings.match_config(),
        }
    }
}

/// One conversion: a statement, an optional categorized history, and where
/// to write the result.
pub struct Job<'a> {
    pub statement: &'a Path,
    pub history: Option<&'a Path>,
    pub mapping: ColumnMapping,
    pub account_name: &'a str,
    pub reconciled: &'a str,
    pub output: &'a Path,
}

#[derive(Debug)]
pub struct RunSummary {
    pub output: PathBuf,
    pub ledger: NormalizedLedger,
    /// Usable history records, or None when no history was given.
    pub history_records: Option<usize>,
}

pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    /// Load a file and slice it at its detected header row.
    pub fn inspect(&self, path: &Path) -> Result<Table> {
        let grid = loader::load(path)?;
        let header_row = header::detect(&grid, self.options.scan_rows);
        Ok(tabulate(&grid, header_row))
    }

    /// Build a suggestion index, or an empty one if the file is unusable.
    pub fn load_history(&self, path: &Path) -> SuggestionIndex {
        match self.inspect(path) {
            Ok(table) => SuggestionIndex::build(&table, self.options.matching),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read historical file, suggestions disabled");
                SuggestionIndex::empty(self.options.matching)
            }
        }
    }

    pub fn normalize_table(
        &self,
        table: &Table,
        job: &Job,
        history: Option<&SuggestionIndex>,
    ) -> Result<NormalizedLedger> {
        normalize(
            table,
            &job.mapping,
            &NormalizeOptions {
                account_name: job.account_name,
                reconciled: job.reconciled,
                date_order: self.options.date_order,
                suggestions: history,
            },
        )
    }

    pub fn run(&self, job: &Job) -> Result<RunSummary> {
        let table = self.inspect(job.statement)?;
        info!(
            file = %job.statement.display(),
            header_row = table.header_row,
            rows = table.rows.len(),
            "statement loaded"
        );
        // Fail on a bad mapping before touching the history file.
        job.mapping.resolve(&table)?;

        let history = job.history.map(|path| self.load_history(path));
        let ledger = self.normalize_table(&table, job, history.as_ref())?;
        write_ledger_file(job.output, &ledger.transactions)?;

        Ok(RunSummary {
            output: job.output.to_path_buf(),
            ledger,
            history_records: history.as_ref().map(SuggestionIndex::len),
        })
    }
}
