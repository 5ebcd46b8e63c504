use std::path::Path;

use tracing::debug;

use crate::error::{LedgerError, Result};
use crate::models::{Cell, Grid, Row};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceFormat {
    Csv,
    Xls,
    Xlsx,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Result<Self> {
        let ext = ext.trim().trim_start_matches('.');
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xls" => Ok(Self::Xls),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(LedgerError::Format(format!(
                "'{ext}' (expected csv, xls or xlsx)"
            ))),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                LedgerError::Format(format!("{} has no file extension", path.display()))
            })?;
        Self::from_extension(ext)
    }
}

/// Read a statement file into a raw grid. The format follows the extension.
pub fn load(path: &Path) -> Result<Grid> {
    let format = SourceFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), ?format, bytes = bytes.len(), "loading file");
    load_format(&bytes, format)
}

/// Read an in-memory upload, trusting the declared extension.
#[allow(dead_code)]
pub fn load_bytes(bytes: &[u8], extension: &str) -> Result<Grid> {
    load_format(bytes, SourceFormat::from_extension(extension)?)
}

fn load_format(bytes: &[u8], format: SourceFormat) -> Result<Grid> {
    match format {
        SourceFormat::Csv => load_csv(bytes),
        SourceFormat::Xls | SourceFormat::Xlsx => load_workbook(bytes, format),
    }
}

fn load_csv(bytes: &[u8]) -> Result<Grid> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut grid = Grid::new();
    for result in rdr.byte_records() {
        let record = result?;
        // The reader skips empty lines; keep them as rows so indices follow the file.
        let at = record.position().map_or(0, |p| p.byte() as usize);
        grid.extend(std::iter::repeat_with(Row::new).take(blank_lines_at(bytes, at)));
        let row = record
            .iter()
            .map(|field| Cell::from(&*String::from_utf8_lossy(field)))
            .collect();
        grid.push(row);
    }
    Ok(grid)
}

/// Empty lines from byte `at` up to the next record. The reader reports a
/// record's position before skipping them.
fn blank_lines_at(bytes: &[u8], at: usize) -> usize {
    let mut i = at.min(bytes.len());
    // A CRLF terminator can be split, leaving its LF at `at`.
    if i > 0 && bytes[i - 1] == b'\r' && bytes.get(i) == Some(&b'\n') {
        i += 1;
    }
    let mut lines = 0;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'\n' => lines += 1,
            b'\r' => {
                lines += 1;
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
            }
            _ => break,
        }
        i += 1;
    }
    lines
}

#[cfg(feature = "spreadsheet")]
fn load_workbook(bytes: &[u8], format: SourceFormat) -> Result<Grid> {
    use calamine::{Reader, Xls, Xlsx};

    let cursor = std::io::Cursor::new(bytes);
    match format {
        SourceFormat::Xlsx => {
            let workbook: Xlsx<_> = Xlsx::new(cursor).map_err(open_error)?;
            first_sheet(workbook)
        }
        _ => {
            let workbook: Xls<_> = Xls::new(cursor).map_err(open_error)?;
            first_sheet(workbook)
        }
    }
}

#[cfg(feature = "spreadsheet")]
fn open_error(e: impl std::fmt::Display) -> LedgerError {
    LedgerError::Format(format!("cannot open workbook: {e}"))
}

#[cfg(not(feature = "spreadsheet"))]
fn load_workbook(_bytes: &[u8], format: SourceFormat) -> Result<Grid> {
    Err(LedgerError::Format(format!(
        "{format:?} support is not enabled in this build"
    )))
}

#[cfg(feature = "spreadsheet")]
fn first_sheet<RS, R>(mut workbook: R) -> Result<Grid>
where
    RS: std::io::Read + std::io::Seek,
    R: calamine::Reader<RS>,
    R::Error: std::fmt::Display,
{
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LedgerError::Format("workbook has no worksheets".to_string()))?
        .map_err(|e| LedgerError::Format(format!("cannot read worksheet: {e}")))?;

    // Ranges start at the first used cell; pad back so indices match the sheet.
    let (top, left) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));
    let mut grid: Grid = vec![Vec::new(); top];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; left];
        cells.extend(row.iter().map(cell_from_data));
        grid.push(cells);
    }
    Ok(grid)
}

#[cfg(feature = "spreadsheet")]
fn cell_from_data(data: &calamine::Data) -> Cell {
    use calamine::Data;
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::from(s.as_str()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        // Date cells keep their serial; the date parser understands serials.
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        other => Cell::Text(other.to_string()),
    }
}
