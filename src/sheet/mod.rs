// src/sheet/mod.rs
use anyhow::{bail, Context, Result};
use std::path::Path;

pub mod delimited;
pub mod xlsx;

/// One cell of a raw bench export, before any interpretation.
///
/// Time-of-day cells are kept distinct from plain numbers because the
/// trailing-window filter needs clock times, not floats.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    /// Seconds since midnight.
    TimeOfDay(u32),
}

impl Cell {
    /// True for a non-empty text cell, the signal the header detector counts.
    pub fn is_header_text(&self) -> bool {
        matches!(self, Cell::Text(s) if !s.trim().is_empty())
    }

    /// Render the cell the way a header or unit row needs it.
    pub fn to_label(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Cell::Text(s) => s.trim().to_string(),
            Cell::TimeOfDay(s) => {
                format!("{}:{:02}:{:02}", s / 3600, (s / 60) % 60, s % 60)
            }
        }
    }
}

/// A 2-D grid of cells read from one input file. No header row is assumed;
/// the run reducer locates it.
#[derive(Debug, Clone)]
pub struct RawSheet {
    /// File name (no directory) the grid came from.
    pub source_name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    pub fn new(source_name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            source_name: source_name.into(),
            rows,
        }
    }
}

/// Load one input file into a `RawSheet`, dispatching on extension.
/// `.xlsx` goes through calamine; `.txt`/`.csv` through the delimited reader.
pub fn load_sheet(path: &Path) -> Result<RawSheet> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "xlsx" => xlsx::read_xlsx(path)
            .with_context(|| format!("reading workbook {}", path.display())),
        "txt" | "csv" => delimited::read_delimited(path)
            .with_context(|| format!("reading delimited file {}", path.display())),
        other => bail!("unsupported file type `{}`: {}", other, path.display()),
    }
}

pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
