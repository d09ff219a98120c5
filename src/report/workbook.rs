// src/report/workbook.rs
use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tracing::info;

use crate::process::{ReduceOutput, REGIME_COLUMN, SOURCE_FILE_COLUMN};

/// Serialize the summary table to a workbook: column-name row, unit row,
/// then one row per run. Missing cells are left blank, never written as 0.
pub fn write_summary(output: &ReduceOutput, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, column) in output.schema.columns().iter().enumerate() {
        let col = col as u16;
        sheet.write_string(0, col, &column.name)?;
        sheet.write_string(1, col, &column.unit)?;
    }

    for (idx, row) in output.rows.iter().enumerate() {
        let excel_row = (idx + 2) as u32;
        for (col, column) in output.schema.columns().iter().enumerate() {
            let col = col as u16;
            match column.name.as_str() {
                SOURCE_FILE_COLUMN => {
                    sheet.write_string(excel_row, col, &row.source_file)?;
                }
                REGIME_COLUMN => {
                    if let Some(rpm) = row.engine_speed_rpm {
                        sheet.write_number(excel_row, col, f64::from(rpm))?;
                    }
                }
                name => {
                    if let Some(v) = row.value(name) {
                        sheet.write_number(excel_row, col, v)?;
                    }
                }
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("writing workbook {}", path.display()))?;
    info!(
        file = %path.display(),
        rows = output.rows.len(),
        columns = output.schema.len(),
        "summary workbook written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReduceConfig;
    use crate::process::reduce;
    use crate::sheet::{Cell, RawSheet};
    use tempfile::tempdir;

    #[test]
    fn writes_header_units_and_data() -> Result<()> {
        let sheet = RawSheet::new(
            "essai_1500rpm.xlsx",
            vec![
                vec![Cell::Text("T".into())],
                vec![Cell::Text("°C".into())],
                vec![Cell::Number(40.0)],
                vec![Cell::Number(42.0)],
            ],
        );
        let out = reduce(&[sheet], &ReduceConfig::default()).unwrap();

        let dir = tempdir()?;
        let path = dir.path().join("summary.xlsx");
        write_summary(&out, &path)?;

        // round-trip through the reader adapter
        let reread = crate::sheet::xlsx::read_xlsx(&path)?;
        assert_eq!(reread.rows[0][0], Cell::Text("T".into()));
        assert_eq!(reread.rows[1][0], Cell::Text("°C".into()));
        assert_eq!(reread.rows[2][0], Cell::Number(41.0));
        // regime column written as a number
        let regime_col = out
            .schema
            .names()
            .position(|n| n == REGIME_COLUMN)
            .unwrap();
        assert_eq!(reread.rows[2][regime_col], Cell::Number(1500.0));
        Ok(())
    }
}
