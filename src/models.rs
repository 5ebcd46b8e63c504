use chrono::NaiveDate;

use crate::error::{LedgerError, Result};

/// A single raw cell from a CSV or spreadsheet.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// String form of the cell, unmodified for text.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

pub type Row = Vec<Cell>;

/// Rows of cells with no schema; rows may differ in length.
pub type Grid = Vec<Row>;

/// A grid sliced at its header row. Every body row has exactly
/// `columns.len()` cells.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    /// Index of the header row in the source grid.
    pub header_row: usize,
}

impl Table {
    /// First column with this name. Duplicate names resolve to the leftmost.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| LedgerError::ColumnNotFound {
                name: name.to_string(),
                available: self.columns.join(", "),
            })
    }

    /// Case-insensitive lookup trying each candidate in order.
    pub fn find_column(&self, candidates: &[&str]) -> Option<usize> {
        candidates.iter().find_map(|want| {
            self.columns
                .iter()
                .position(|c| c.trim().eq_ignore_ascii_case(want))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// User-chosen source columns for the three required fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapping {
    pub date: String,
    pub description: String,
    pub amount: String,
}

/// Resolved column positions for a mapping against one table.
#[derive(Debug, Clone, Copy)]
pub struct MappedColumns {
    pub date: usize,
    pub description: usize,
    pub amount: usize,
}

impl ColumnMapping {
    pub fn resolve(&self, table: &Table) -> Result<MappedColumns> {
        Ok(MappedColumns {
            date: table.require_column(&self.date)?,
            description: table.require_column(&self.description)?,
            amount: table.require_column(&self.amount)?,
        })
    }
}

/// One row of the canonical ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub account_name: String,
    pub date: Option<NaiveDate>,
    pub details: String,
    pub category: String,
    pub notes: String,
    pub cheque_number: String,
    pub amount: Option<f64>,
    pub reconciled: String,
}

/// A (notes, details, category) triple from a previously categorized ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalRecord {
    pub notes: String,
    pub details: String,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    pub score: f64,
    pub index: Option<usize>,
}

impl MatchResult {
    pub fn none() -> Self {
        Self {
            score: 0.0,
            index: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Amount,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Date => write!(f, "date"),
            Field::Amount => write!(f, "amount"),
        }
    }
}

/// Non-fatal: a cell that could not be parsed. The field is left empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseWarning {
    /// Zero-based index into the table body.
    pub row: usize,
    pub field: Field,
    pub raw: String,
}
