// src/process/mod.rs
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::info;

pub mod header;
pub mod regime;
pub mod run;
pub mod sanitize;
pub mod stability;

use crate::config::ReduceConfig;
use crate::metrics;
use crate::schema::ColumnSchema;
use crate::sheet::RawSheet;
use self::run::reduce_sheet;

/// Column carrying the originating file name of each summary row.
pub const SOURCE_FILE_COLUMN: &str = "fichier_source";
/// Column carrying the engine speed extracted from the file name.
pub const REGIME_COLUMN: &str = "regime_moteur";

/// One reduced run, keyed by column name. Missing channels simply have no
/// entry; they render as "no data" downstream, never as zero.
#[derive(Debug, Clone)]
pub struct SummaryRow {
    pub source_file: String,
    pub engine_speed_rpm: Option<u32>,
    values: HashMap<String, f64>,
}

impl SummaryRow {
    pub fn value(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }

    pub(crate) fn insert(&mut self, column: &str, value: f64) {
        self.values.insert(column.to_string(), value);
    }
}

/// The consolidated summary table plus its unified schema.
#[derive(Debug, Clone)]
pub struct ReduceOutput {
    pub schema: ColumnSchema,
    pub rows: Vec<SummaryRow>,
}

/// Reduce a batch of sheets to the consolidated summary table.
///
/// Per-file reduction runs on the rayon pool; files are independent. The
/// schema union is then built serially in input-file order and the rows
/// sorted by engine speed, so the output never depends on completion
/// order. Rows without a parseable speed sort last, keeping their input
/// order among themselves.
///
/// Returns `None` when no sheet yields a usable row — a legitimate empty
/// outcome, not an error.
pub fn reduce(sheets: &[RawSheet], cfg: &ReduceConfig) -> Option<ReduceOutput> {
    info!(files = sheets.len(), window_s = cfg.window_seconds, "reducing batch");

    let runs: Vec<_> = sheets
        .par_iter()
        .map(|sheet| reduce_sheet(sheet, cfg))
        .collect();

    // single-writer schema merge, in input order
    let mut schema = ColumnSchema::new();
    let mut rows = Vec::new();
    for run in runs.into_iter().flatten() {
        schema.merge(run.columns.iter().map(|(n, u)| (n.as_str(), u.as_str())));
        rows.push(SummaryRow {
            source_file: run.source_file,
            engine_speed_rpm: run.engine_speed_rpm,
            values: run.means,
        });
    }

    if rows.is_empty() {
        info!("no usable runs in batch");
        return None;
    }

    schema.push(SOURCE_FILE_COLUMN, "");
    schema.push(REGIME_COLUMN, "tr/min");

    rows.sort_by_key(|r| (r.engine_speed_rpm.is_none(), r.engine_speed_rpm));

    let mut output = ReduceOutput { schema, rows };
    metrics::apply_derived(&mut output);

    info!(
        rows = output.rows.len(),
        columns = output.schema.len(),
        "batch reduced"
    );
    Some(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Cell;

    fn text(s: &str) -> Cell {
        Cell::Text(s.into())
    }

    fn num(v: f64) -> Cell {
        Cell::Number(v)
    }

    fn sheet_with(name: &str, channel: &str, values: &[f64]) -> RawSheet {
        let mut rows = vec![vec![text(channel)], vec![text("°C")]];
        rows.extend(values.iter().map(|v| vec![num(*v)]));
        RawSheet::new(name, rows)
    }

    #[test]
    fn schema_grows_across_files_and_keeps_order() {
        let a = sheet_with("a_1200rpm.xlsx", "T1", &[1.0, 3.0]);
        let b = sheet_with("b_1800rpm.xlsx", "T2", &[5.0, 7.0]);

        let solo = reduce(std::slice::from_ref(&a), &ReduceConfig::default()).unwrap();
        let both = reduce(&[a, b], &ReduceConfig::default()).unwrap();

        let solo_names: Vec<&str> = solo.schema.names().collect();
        let both_names: Vec<&str> = both.schema.names().collect();
        assert_eq!(solo_names, vec!["T1", "fichier_source", "regime_moteur"]);
        assert_eq!(
            both_names,
            vec!["T1", "T2", "fichier_source", "regime_moteur"]
        );
        // T1 keeps its first-seen position
        assert_eq!(both_names[0], solo_names[0]);
    }

    #[test]
    fn rows_sort_by_regime_with_unknown_speeds_last() {
        let sheets = vec![
            sheet_with("no_speed_info.xlsx", "T", &[9.0]),
            sheet_with("c_2400rpm.xlsx", "T", &[3.0]),
            sheet_with("a_1200rpm.xlsx", "T", &[1.0]),
            sheet_with("mystery.xlsx", "T", &[8.0]),
            sheet_with("b_1800rpm.xlsx", "T", &[2.0]),
        ];
        let out = reduce(&sheets, &ReduceConfig::default()).unwrap();

        let speeds: Vec<Option<u32>> = out.rows.iter().map(|r| r.engine_speed_rpm).collect();
        assert_eq!(speeds, vec![Some(1200), Some(1800), Some(2400), None, None]);
        // null-speed rows keep their input order
        assert_eq!(out.rows[3].source_file, "no_speed_info.xlsx");
        assert_eq!(out.rows[4].source_file, "mystery.xlsx");
    }

    #[test]
    fn unseen_columns_read_as_missing() {
        let sheets = vec![
            sheet_with("a_1200rpm.xlsx", "T1", &[1.0]),
            sheet_with("b_1800rpm.xlsx", "T2", &[5.0]),
        ];
        let out = reduce(&sheets, &ReduceConfig::default()).unwrap();
        assert_eq!(out.rows[0].value("T2"), None);
        assert_eq!(out.rows[1].value("T1"), None);
        assert_eq!(out.rows[0].value("T1"), Some(1.0));
    }

    #[test]
    fn empty_batch_is_none_not_error() {
        assert!(reduce(&[], &ReduceConfig::default()).is_none());

        let unusable = vec![RawSheet::new("x.xlsx", vec![vec![text("only row")]])];
        assert!(reduce(&unusable, &ReduceConfig::default()).is_none());
    }
}
