use std::collections::HashSet;

use tracing::debug;

use crate::models::{Grid, Row};

pub const DEFAULT_SCAN_ROWS: usize = 10;

/// Best-effort guess at the header row: the first row within `max_scan`
/// with enough filled cells, none of them repeated. Falls back to row 0.
pub fn detect(grid: &Grid, max_scan: usize) -> usize {
    for (idx, row) in grid.iter().take(max_scan).enumerate() {
        if looks_like_header(row) {
            debug!(row = idx, "header row detected");
            return idx;
        }
    }
    debug!(scanned = max_scan.min(grid.len()), "no header candidate, using row 0");
    0
}

fn looks_like_header(row: &Row) -> bool {
    let labels: Vec<String> = row
        .iter()
        .filter(|c| !c.is_blank())
        .map(|c| c.as_text().trim().to_string())
        .collect();
    let required = (row.len() / 2).max(3);
    if labels.len() < required {
        return false;
    }
    let distinct: HashSet<&str> = labels.iter().map(String::as_str).collect();
    distinct.len() == labels.len()
}
