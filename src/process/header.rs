// src/process/header.rs
use crate::sheet::RawSheet;

/// Find the row most likely holding the column names: the first of the
/// leading `scan_limit` rows where at least half the cells are non-empty
/// text. Falls back to row 0, so callers never deal with "no header".
pub fn detect_header_row(sheet: &RawSheet, scan_limit: usize) -> usize {
    for (idx, row) in sheet.rows.iter().take(scan_limit).enumerate() {
        if row.is_empty() {
            continue;
        }
        let text_cells = row.iter().filter(|c| c.is_header_text()).count();
        if text_cells * 2 >= row.len() {
            return idx;
        }
    }
    0
}
