// src/process/stability.rs
use tracing::{info, warn};

use crate::config::ReduceConfig;

/// Verdict on how steady a watched channel held over the averaging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stability {
    Stable,
    Moderate,
    Unstable,
}

/// Coefficient of variation in percent: std / |mean| * 100.
/// `None` when the mean is zero or the std could not be computed.
pub fn coefficient_of_variation(mean: f64, std: Option<f64>) -> Option<f64> {
    let std = std?;
    if mean == 0.0 {
        return None;
    }
    Some(std / mean.abs() * 100.0)
}

pub fn classify(cv_pct: f64, cfg: &ReduceConfig) -> Stability {
    if cv_pct < cfg.cv_stable_pct {
        Stability::Stable
    } else if cv_pct < cfg.cv_unstable_pct {
        Stability::Moderate
    } else {
        Stability::Unstable
    }
}

/// Log the stability verdict for one watched channel of one run.
/// Advisory output only; the reduction itself never acts on it.
pub fn report(source_file: &str, column: &str, mean: f64, std: Option<f64>, cfg: &ReduceConfig) {
    let Some(cv) = coefficient_of_variation(mean, std) else {
        return;
    };
    match classify(cv, cfg) {
        Stability::Stable => {
            info!(file = source_file, column, cv_pct = cv, "stable");
        }
        Stability::Moderate => {
            warn!(file = source_file, column, cv_pct = cv, "moderately stable");
        }
        Stability::Unstable => {
            warn!(file = source_file, column, cv_pct = cv, "UNSTABLE");
        }
    }
}
