use tracing::debug;

use crate::models::{Cell, Grid, Table};

/// Slice `grid` at `header_row`. Column names come from the header cells;
/// body rows are padded or truncated to the header width.
pub fn tabulate(grid: &Grid, header_row: usize) -> Table {
    let Some(header) = grid.get(header_row) else {
        return Table {
            header_row,
            ..Table::default()
        };
    };

    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell.as_text().trim().to_string();
            if name.is_empty() {
                format!("Column {}", i + 1)
            } else {
                name
            }
        })
        .collect();
    let width = columns.len();

    let rows: Vec<_> = grid[header_row + 1..]
        .iter()
        .map(|row| {
            let mut cells: Vec<Cell> = row.iter().take(width).cloned().collect();
            cells.resize(width, Cell::Empty);
            cells
        })
        .collect();

    debug!(header_row, columns = width, rows = rows.len(), "tabulated grid");
    Table {
        columns,
        rows,
        header_row,
    }
}
