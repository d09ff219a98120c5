// src/sheet/xlsx.rs
use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};
use std::path::Path;

use super::{file_name_of, Cell, RawSheet};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Read the first worksheet of an `.xlsx` workbook into a `RawSheet`.
///
/// Bench exports put everything on sheet 0; extra sheets are ignored.
pub fn read_xlsx(path: &Path) -> Result<RawSheet> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).with_context(|| format!("opening {}", path.display()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("workbook has no worksheets"))?
        .context("reading first worksheet")?;

    let rows = range
        .rows()
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    Ok(RawSheet::new(file_name_of(path), rows))
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
        Data::String(s) => {
            if s.trim().is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
        // Excel stores clock times as a fraction of a day; the date part,
        // if any, is irrelevant to the trailing-window filter.
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            let secs = (serial.fract() * SECONDS_PER_DAY).round() as u32 % 86_400;
            Cell::TimeOfDay(secs)
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        // #N/A and friends carry no usable value.
        Data::Error(_) => Cell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_and_blank_cells_become_empty() {
        assert_eq!(convert_cell(&Data::Empty), Cell::Empty);
        assert_eq!(convert_cell(&Data::String("  ".into())), Cell::Empty);
        assert_eq!(
            convert_cell(&Data::Error(calamine::CellErrorType::NA)),
            Cell::Empty
        );
    }

    #[test]
    fn numbers_and_bools_become_numeric() {
        assert_eq!(convert_cell(&Data::Float(12.5)), Cell::Number(12.5));
        assert_eq!(convert_cell(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(convert_cell(&Data::Bool(true)), Cell::Number(1.0));
    }
}
