// src/process/regime.rs
use once_cell::sync::Lazy;
use regex::Regex;

/// Accepted spellings of an engine speed in a file name, tried in order.
/// First satisfied pattern wins; keep the order stable for reproducible
/// extraction across runs.
static SPEED_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(\d{3,4})\s*tr/?min",
        r"(\d{3,4})\s*rpm",
        r"(\d{3,4})\s*tr\b",
        r"(\d{3,4})\s*t/min",
        r"(\d{3,4})\s*_rpm",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid literal pattern"))
    .collect()
});

/// Pull the engine speed (tr/min) out of a bench file name, e.g.
/// `Essai_1800trmin.xlsx` → 1800. `None` when the name carries no speed.
pub fn extract_regime(file_name: &str) -> Option<u32> {
    let lower = file_name.to_lowercase();
    for pattern in SPEED_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(&lower) {
            if let Ok(speed) = caps[1].parse() {
                return Some(speed);
            }
        }
    }
    None
}
