// src/process/sanitize.rs
use once_cell::sync::Lazy;
use regex::Regex;

use crate::sheet::Cell;

/// Placeholder strings the benches emit for a dead or absent sample.
const PLACEHOLDERS: &[&str] = &["", "nan", "n/a", "-", "#n/a", "null"];

static NON_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9.\-+eE]").expect("valid literal pattern"));

/// Normalize one raw cell to a numeric value, or `None` for anything that
/// is not a usable number. Never errors and never turns garbage into zero.
///
/// Already-numeric cells pass through unchanged, infinities included; the
/// aggressive cleanup only applies to text.
pub fn sanitize(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Empty | Cell::TimeOfDay(_) => None,
        Cell::Number(n) => Some(*n),
        Cell::Text(s) => sanitize_text(s),
    }
}

/// Text path of the sanitizer: tolerant of decimal commas, thousands
/// spaces, unit suffixes, and the usual export placeholders.
pub fn sanitize_text(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if PLACEHOLDERS.contains(&trimmed.to_lowercase().as_str()) {
        return None;
    }

    let cleaned = trimmed.replace(',', ".").replace(' ', "");
    let cleaned = NON_NUMERIC.replace_all(&cleaned, "");
    if matches!(cleaned.as_ref(), "" | "." | "-" | "+") {
        return None;
    }

    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}
