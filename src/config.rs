// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Bench channels whose steadiness is worth calling out in the log.
/// Advisory only: an unstable channel never blocks the reduction.
const DEFAULT_WATCHLIST: &[&str] = &[
    "T_AMBIANCE_01",
    "T_AIR_E_FILTRE_A01",
    "T_AIR_S_FILTRE_A02",
    "T_AIR_S_TURBO_A03",
    "T_AIR_E_MOTEUR_A04",
    "T_FUEL_E_MOTEUR_A05",
    "T_FUEL_E_RADIA_A06",
    "T_FUEL_S_RADIA_A07",
    "T_EAU_S_MOTEUR_A08",
    "T_EAU_E_MOTEUR_A09",
    "EngineOilTemperature",
    "T_HUILE_TRANS_A11",
    "T_GAZ_ECHAPPEMENT_A15",
    "R_CS.QFUKGH",
    "R_EC.TORQUE",
    "EngSpeed",
];

/// Tuning knobs for the reduction pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReduceConfig {
    /// Trailing averaging window, in seconds of bench clock time.
    pub window_seconds: u32,
    /// How many leading rows the header detector scans.
    pub header_scan_limit: usize,
    /// Channels checked for stability over the averaging window.
    pub stability_watchlist: Vec<String>,
    /// Coefficient-of-variation ceiling (%) for a STABLE verdict.
    pub cv_stable_pct: f64,
    /// CV (%) at or above which a channel is UNSTABLE.
    pub cv_unstable_pct: f64,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            window_seconds: 60,
            header_scan_limit: 5,
            stability_watchlist: DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect(),
            cv_stable_pct: 5.0,
            cv_unstable_pct: 10.0,
        }
    }
}

impl ReduceConfig {
    /// Load a JSON config file; absent fields fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }
}
