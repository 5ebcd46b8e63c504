use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{Cell, ColumnMapping, Field, ParseWarning, Table, Transaction};
use crate::suggester::SuggestionIndex;

pub const DEFAULT_RECONCILED: &str = "Y";

/// How to read ambiguous numeric dates like 03/04/2024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    #[default]
    DayFirst,
    MonthFirst,
}

// Every format ends in the year. `%Y` also reads a two-digit year literally,
// so those are re-pivoted after parsing.
const TEXT_DATE_FORMATS: &[&str] = &[
    "%d %b %Y",
    "%d-%b-%Y",
    "%d %B %Y",
    "%d-%B-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
];

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    if !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(chrono::Duration::days(serial.floor() as i64))
}

fn parse_numeric_date(raw: &str, order: DateOrder) -> Option<NaiveDate> {
    let parts: Vec<&str> = raw.split(|c: char| c == '/' || c == '-' || c == '.').collect();
    if parts.len() != 3
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }
    let a: u32 = parts[0].parse().ok()?;
    let b: u32 = parts[1].parse().ok()?;
    let c: u32 = parts[2].parse().ok()?;

    if parts[0].len() == 4 {
        return NaiveDate::from_ymd_opt(a as i32, b, c);
    }
    let (day, month) = match order {
        DateOrder::DayFirst => (a, b),
        DateOrder::MonthFirst => (b, a),
    };
    let year = match parts[2].len() {
        4 => c as i32,
        2 => expand_two_digit_year(c as i32),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// 00-69 land in the 2000s, 70-99 in the 1900s.
fn expand_two_digit_year(yy: i32) -> i32 {
    if yy < 70 {
        2000 + yy
    } else {
        1900 + yy
    }
}

fn parse_text_date(s: &str) -> Option<NaiveDate> {
    let year_digits = s.bytes().rev().take_while(u8::is_ascii_digit).count();
    if year_digits != 2 && year_digits != 4 {
        return None;
    }
    let date = TEXT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())?;
    if year_digits == 2 {
        date.with_year(expand_two_digit_year(date.year()))
    } else {
        Some(date)
    }
}

fn parse_date_part(s: &str, order: DateOrder) -> Option<NaiveDate> {
    parse_numeric_date(s, order).or_else(|| parse_text_date(s))
}

pub fn parse_date_str(raw: &str, order: DateOrder) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    parse_date_part(s, order).or_else(|| {
        // Drop a trailing time: "2024-04-03 00:00:00", "2024-04-03T10:15:00"
        let head = s.split(|c: char| c == ' ' || c == 'T').next()?;
        if head.len() < s.len() {
            parse_numeric_date(head, order)
        } else {
            None
        }
    })
}

pub fn parse_date(cell: &Cell, order: DateOrder) -> Option<NaiveDate> {
    match cell {
        Cell::Empty => None,
        Cell::Number(n) => excel_serial_to_date(*n),
        Cell::Text(s) => parse_date_str(s, order),
    }
}

pub fn parse_amount_str(raw: &str) -> Option<f64> {
    let s: String = raw
        .chars()
        .filter(|c| !matches!(*c, '"' | '$' | '£' | '€' | ' ' | '\u{a0}'))
        .collect();
    if s.is_empty() {
        return None;
    }
    let (negate, body) = match s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, s.as_str()),
    };
    let value = strip_thousands(body)?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())?;
    Some(if negate { -value } else { value })
}

/// Drop thousands separators. Commas are only accepted in the integer part,
/// every three digits, so "1.234,56" is rejected rather than misread.
fn strip_thousands(s: &str) -> Option<String> {
    if !s.contains(',') {
        return Some(s.to_string());
    }
    let int_part = match s.find('.') {
        Some(dot) if s[dot..].contains(',') => return None,
        Some(dot) => &s[..dot],
        None => s,
    };
    let mut groups = int_part.split(',');
    let lead = groups.next()?;
    if !lead.bytes().last().is_some_and(|b| b.is_ascii_digit()) {
        return None;
    }
    if !groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }
    Some(s.replace(',', ""))
}

pub fn parse_amount(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Empty => None,
        Cell::Number(n) => Some(*n).filter(|v| v.is_finite()),
        Cell::Text(s) => parse_amount_str(s),
    }
}

// ---------------------------------------------------------------------------
// normalize
// ---------------------------------------------------------------------------

pub struct NormalizeOptions<'a> {
    pub account_name: &'a str,
    pub reconciled: &'a str,
    pub date_order: DateOrder,
    pub suggestions: Option<&'a SuggestionIndex>,
}

#[derive(Debug, Default)]
pub struct NormalizedLedger {
    /// Ascending by date; undated rows last, in source order.
    pub transactions: Vec<Transaction>,
    pub warnings: Vec<ParseWarning>,
    pub blank_rows: usize,
    pub suggested: usize,
}

impl NormalizedLedger {
    pub fn unparsed(&self, field: Field) -> usize {
        self.warnings.iter().filter(|w| w.field == field).count()
    }
}

/// Stable sort by parsed date with undated rows after every dated one.
pub fn sort_by_date(transactions: &mut [Transaction]) {
    transactions.sort_by_key(|t| (t.date.is_none(), t.date));
}

pub fn normalize(
    table: &Table,
    mapping: &ColumnMapping,
    opts: &NormalizeOptions,
) -> Result<NormalizedLedger> {
    let cols = mapping.resolve(table)?;
    let mut ledger = NormalizedLedger::default();

    for (idx, row) in table.rows.iter().enumerate() {
        let (date_cell, desc_cell, amount_cell) =
            (&row[cols.date], &row[cols.description], &row[cols.amount]);
        if date_cell.is_blank() && desc_cell.is_blank() && amount_cell.is_blank() {
            ledger.blank_rows += 1;
            continue;
        }

        let date = parse_date(date_cell, opts.date_order);
        if date.is_none() {
            debug!(row = idx, raw = %date_cell.as_text(), "unparseable date");
            ledger.warnings.push(ParseWarning {
                row: idx,
                field: Field::Date,
                raw: date_cell.as_text(),
            });
        }
        let amount = parse_amount(amount_cell);
        if amount.is_none() {
            debug!(row = idx, raw = %amount_cell.as_text(), "unparseable amount");
            ledger.warnings.push(ParseWarning {
                row: idx,
                field: Field::Amount,
                raw: amount_cell.as_text(),
            });
        }

        let notes = desc_cell.as_text();
        let suggestion = opts
            .suggestions
            .map(|index| index.suggest(&notes))
            .unwrap_or_default();
        if !suggestion.is_empty() {
            ledger.suggested += 1;
        }

        ledger.transactions.push(Transaction {
            account_name: opts.account_name.to_string(),
            date,
            details: suggestion.details,
            category: suggestion.category,
            notes,
            cheque_number: String::new(),
            amount,
            reconciled: opts.reconciled.to_string(),
        });
    }

    sort_by_date(&mut ledger.transactions);

    if !ledger.warnings.is_empty() {
        warn!(
            dates = ledger.unparsed(Field::Date),
            amounts = ledger.unparsed(Field::Amount),
            "some cells could not be parsed and were left empty"
        );
    }
    info!(
        transactions = ledger.transactions.len(),
        suggested = ledger.suggested,
        blank_rows = ledger.blank_rows,
        "normalized statement"
    );
    Ok(ledger)
}
