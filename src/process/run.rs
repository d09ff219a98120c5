// src/process/run.rs
use chrono::{NaiveTime, Timelike};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::ReduceConfig;
use crate::process::{header, regime, sanitize, stability};
use crate::schema::dedup_names;
use crate::sheet::{Cell, RawSheet};

/// Name of the bench clock column driving the trailing-window filter.
const TIME_COLUMN: &str = "Heure";

/// One sheet reduced to a single row of per-channel means.
#[derive(Debug, Clone)]
pub struct ReducedRun {
    pub source_file: String,
    pub engine_speed_rpm: Option<u32>,
    /// Mean per numeric column, over the trailing window.
    pub means: HashMap<String, f64>,
    /// Every column the sheet declared (deduplicated name, unit), in sheet
    /// order. Feeds the cross-file schema union, numeric or not.
    pub columns: Vec<(String, String)>,
}

/// Reduce one raw sheet to a summary row.
///
/// Returns `None` when the sheet is unusable (too short, or no column
/// yields a single numeric value) — expected for malformed exports, so it
/// is a skip, not an error.
#[tracing::instrument(level = "debug", skip(sheet, cfg), fields(file = %sheet.source_name))]
pub fn reduce_sheet(sheet: &RawSheet, cfg: &ReduceConfig) -> Option<ReducedRun> {
    if sheet.rows.len() < 2 {
        debug!("fewer than 2 rows, skipping");
        return None;
    }

    // 1) locate headers, units, and the start of data
    let header_idx = header::detect_header_row(sheet, cfg.header_scan_limit);
    let raw_names: Vec<String> = sheet.rows[header_idx]
        .iter()
        .map(|c| c.to_label())
        .collect();
    let names = dedup_names(&raw_names);

    let (units, data_start) = match sheet.rows.get(header_idx + 1) {
        Some(unit_row) => {
            let units: Vec<String> = unit_row.iter().map(|c| c.to_label()).collect();
            (units, header_idx + 2)
        }
        None => (Vec::new(), header_idx + 1),
    };

    let columns: Vec<(String, String)> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let unit = units.get(i).cloned().unwrap_or_default();
            (name.clone(), unit)
        })
        .collect();

    let data_rows: Vec<&Vec<Cell>> = sheet.rows[data_start.min(sheet.rows.len())..]
        .iter()
        .collect();

    // 2) trailing-window filter on the bench clock, when present
    let filtered = filter_trailing_window(&names, &data_rows, cfg.window_seconds);
    if filtered.len() < data_rows.len() {
        info!(
            kept = filtered.len(),
            total = data_rows.len(),
            window_s = cfg.window_seconds,
            "trailing-window filter"
        );
    }

    // 3) sanitize and average column by column
    let mut means = HashMap::new();
    for (col_idx, name) in names.iter().enumerate() {
        let values: Vec<f64> = filtered
            .iter()
            .filter_map(|row| row.get(col_idx).and_then(sanitize::sanitize))
            .collect();
        // a column counts as numeric only if it produced at least one value
        if values.is_empty() {
            continue;
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        if cfg.stability_watchlist.iter().any(|w| w == name) {
            stability::report(&sheet.source_name, name, mean, sample_std(&values, mean), cfg);
        }
        means.insert(name.clone(), mean);
    }

    if means.is_empty() {
        debug!("no numeric columns, skipping");
        return None;
    }

    Some(ReducedRun {
        source_file: sheet.source_name.clone(),
        engine_speed_rpm: regime::extract_regime(&sheet.source_name),
        means,
        columns,
    })
}

/// Keep only the rows inside the last `window_seconds` of bench clock time.
///
/// Rows whose clock value does not parse fall outside the window; if the
/// whole column fails to parse, or there is no clock column at all, the
/// filter is skipped and the full sheet is used.
fn filter_trailing_window<'a>(
    names: &[String],
    data_rows: &[&'a Vec<Cell>],
    window_seconds: u32,
) -> Vec<&'a Vec<Cell>> {
    let Some(time_idx) = names.iter().position(|n| n == TIME_COLUMN) else {
        return data_rows.to_vec();
    };

    let times: Vec<Option<i64>> = data_rows
        .iter()
        .map(|row| row.get(time_idx).and_then(time_in_seconds))
        .collect();

    let Some(max_time) = times.iter().flatten().max().copied() else {
        return data_rows.to_vec();
    };
    let threshold = max_time - i64::from(window_seconds);

    data_rows
        .iter()
        .zip(&times)
        .filter_map(|(row, t)| match t {
            Some(t) if *t >= threshold => Some(*row),
            _ => None,
        })
        .collect()
}

/// Clock cell → seconds since midnight. Text cells must read `H:M:S`.
fn time_in_seconds(cell: &Cell) -> Option<i64> {
    match cell {
        Cell::TimeOfDay(s) => Some(i64::from(*s)),
        Cell::Text(s) => NaiveTime::parse_from_str(s.trim(), "%H:%M:%S")
            .ok()
            .map(|t| i64::from(t.num_seconds_from_midnight())),
        _ => None,
    }
}

/// Sample standard deviation (ddof = 1); `None` below two samples.
fn sample_std(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.into())
    }

    fn num(v: f64) -> Cell {
        Cell::Number(v)
    }

    /// Header + unit row + clock times 0..=120s step 10, channel T rising.
    fn clocked_sheet(name: &str) -> RawSheet {
        let mut rows = vec![
            vec![text("Heure"), text("T")],
            vec![text("s"), text("°C")],
        ];
        for i in 0..=12u32 {
            let t = i * 10;
            rows.push(vec![Cell::TimeOfDay(t), num(i as f64)]);
        }
        RawSheet::new(name, rows)
    }

    #[test]
    fn trailing_window_keeps_only_late_rows() {
        let sheet = clocked_sheet("essai_1800trmin.xlsx");
        let cfg = ReduceConfig::default(); // 60 s window
        let run = reduce_sheet(&sheet, &cfg).unwrap();

        // times 60..=120 survive, so T = 6..=12, mean = 9
        assert!((run.means["T"] - 9.0).abs() < 1e-9);
        assert_eq!(run.engine_speed_rpm, Some(1800));
        assert_eq!(run.source_file, "essai_1800trmin.xlsx");
    }

    #[test]
    fn textual_clock_values_filter_too() {
        let rows = vec![
            vec![text("Heure"), text("T")],
            vec![text("s"), text("°C")],
            vec![text("10:00:00"), num(1.0)],
            vec![text("10:01:00"), num(2.0)],
            vec![text("10:02:30"), num(3.0)],
            vec![text("bogus"), num(100.0)], // unparseable clock, excluded
        ];
        let sheet = RawSheet::new("pt_1200rpm.xlsx", rows);
        let run = reduce_sheet(&sheet, &ReduceConfig::default()).unwrap();

        // max = 10:02:30, threshold = 10:01:30 → only the 3.0 row remains
        assert!((run.means["T"] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn unparseable_clock_column_disables_the_filter() {
        let rows = vec![
            vec![text("Heure"), text("T")],
            vec![text("s"), text("°C")],
            vec![text("x"), num(1.0)],
            vec![text("y"), num(3.0)],
        ];
        let sheet = RawSheet::new("run.xlsx", rows);
        let run = reduce_sheet(&sheet, &ReduceConfig::default()).unwrap();
        assert!((run.means["T"] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn duplicate_headers_are_suffixed() {
        let rows = vec![
            vec![text("Temp"), text("Temp")],
            vec![text("°C"), text("°C")],
            vec![num(10.0), num(20.0)],
            vec![num(12.0), num(22.0)],
        ];
        let sheet = RawSheet::new("run.xlsx", rows);
        let run = reduce_sheet(&sheet, &ReduceConfig::default()).unwrap();

        let names: Vec<&str> = run.columns.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Temp", "Temp_2"]);
        assert!((run.means["Temp"] - 11.0).abs() < 1e-9);
        assert!((run.means["Temp_2"] - 21.0).abs() < 1e-9);
    }

    #[test]
    fn unit_row_consumes_the_row_after_the_header() {
        // header + unit row only: the unit row is consumed, no data remains
        let rows = vec![vec![text("A"), text("B")], vec![text("u"), text("v")]];
        let sheet = RawSheet::new("run.xlsx", rows);
        assert!(reduce_sheet(&sheet, &ReduceConfig::default()).is_none());
    }

    #[test]
    fn units_travel_with_their_columns() {
        let sheet = clocked_sheet("essai_1800trmin.xlsx");
        let run = reduce_sheet(&sheet, &ReduceConfig::default()).unwrap();
        assert_eq!(
            run.columns,
            vec![
                ("Heure".to_string(), "s".to_string()),
                ("T".to_string(), "°C".to_string()),
            ]
        );
    }

    #[test]
    fn short_or_non_numeric_sheets_are_skipped() {
        let one_row = RawSheet::new("run.xlsx", vec![vec![text("A")]]);
        assert!(reduce_sheet(&one_row, &ReduceConfig::default()).is_none());

        let all_text = RawSheet::new(
            "run.xlsx",
            vec![
                vec![text("A"), text("B")],
                vec![text("u"), text("v")],
                vec![text("foo"), text("bar")],
            ],
        );
        assert!(reduce_sheet(&all_text, &ReduceConfig::default()).is_none());
    }

    #[test]
    fn means_skip_missing_cells() {
        let rows = vec![
            vec![text("A"), text("B")],
            vec![text(""), text("")],
            vec![num(1.0), text("n/a")],
            vec![Cell::Empty, num(4.0)],
            vec![num(3.0), num(6.0)],
        ];
        let sheet = RawSheet::new("run.xlsx", rows);
        let run = reduce_sheet(&sheet, &ReduceConfig::default()).unwrap();
        assert!((run.means["A"] - 2.0).abs() < 1e-9);
        assert!((run.means["B"] - 5.0).abs() < 1e-9);
    }
}
