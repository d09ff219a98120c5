// src/sheet/delimited.rs
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::{fs, path::Path};
use tracing::debug;

use super::{file_name_of, Cell, RawSheet};

/// Read a `.txt`/`.csv` bench export into a `RawSheet`. Every cell comes in
/// as text; the sanitizer downstream decides what is numeric.
pub fn read_delimited(path: &Path) -> Result<RawSheet> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    let delimiter = sniff_delimiter(&content);
    debug!(
        file = %path.display(),
        delimiter = %(delimiter as char),
        "delimited read"
    );

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // bench exports pad rows unevenly
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("parse error at record {} in {}", idx, path.display()))?;
        let row: Vec<Cell> = record
            .iter()
            .map(|field| {
                let trimmed = field.trim();
                if trimmed.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(trimmed.to_string())
                }
            })
            .collect();
        rows.push(row);
    }

    Ok(RawSheet::new(file_name_of(path), rows))
}

/// Pick the separator from the first line: `;` and tab beat the comma so
/// that European exports with decimal commas split correctly.
fn sniff_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or("");
    let semis = first_line.matches(';').count();
    let tabs = first_line.matches('\t').count();
    if semis == 0 && tabs == 0 {
        b','
    } else if tabs > semis {
        b'\t'
    } else {
        b';'
    }
}
