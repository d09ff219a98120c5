// src/metrics/mod.rs
//! Cross-channel derived quantities computed after schema unification.
//!
//! Each rule fires only when every input column exists in the final
//! schema; the check is global, never per-row. Within a row, any missing
//! input makes the derived value missing, and so does a division by zero.

use tracing::debug;

use crate::process::{ReduceOutput, SummaryRow};

// Bench channel names, as logged by the acquisition system.
const RAW_TORQUE: &str = "R_EC.TORQUE";
const GEAR_RATIO: &str = "K_TRA.RAPPORT_PDF";
const ENGINE_SPEED: &str = "EngSpeed";
const AMBIENT_TEMP: &str = "T_AMBIANCE_01";
const INTAKE_AIR_TEMP: &str = "T_AIR_E_MOTEUR_A04";
const OIL_TEMP: &str = "EngineOilTemperature";
const COOLANT_OUT_TEMP: &str = "T_EAU_S_MOTEUR_A08";
const MAX_AIR_SPEC: &str = "K_TRA.T_AIR_MAXI";
const MAX_OIL_SPEC: &str = "K_TRA.T_OIL_MAXI";
const MAX_WATER_SPEC: &str = "K_TRA.T_EAU_MAXI";
const FUEL_FLOW_MASS: &str = "R_CS.QFUKGH";

pub const ENGINE_TORQUE: &str = "Couple_moteur";
pub const AIR_THERMAL_MARGIN: &str = "TAA_AIR";
pub const OIL_THERMAL_MARGIN: &str = "TAA_HUILE";
pub const WATER_THERMAL_MARGIN: &str = "TAA_EAU";
pub const ENGINE_POWER: &str = "Puissance_moteur";
pub const SPECIFIC_CONSUMPTION: &str = "CSE_moteur";

type Compute = fn(&SummaryRow) -> Option<f64>;

struct DerivedRule {
    output: &'static str,
    unit: &'static str,
    inputs: &'static [&'static str],
    compute: Compute,
}

/// Ordered rule table; order matters because specific consumption reads
/// the engine power computed two rules earlier.
static RULES: &[DerivedRule] = &[
    DerivedRule {
        output: ENGINE_TORQUE,
        unit: "N.m",
        inputs: &[RAW_TORQUE, GEAR_RATIO],
        compute: engine_torque,
    },
    DerivedRule {
        output: AIR_THERMAL_MARGIN,
        unit: "°C",
        inputs: &[INTAKE_AIR_TEMP, AMBIENT_TEMP, MAX_AIR_SPEC],
        compute: air_thermal_margin,
    },
    DerivedRule {
        output: OIL_THERMAL_MARGIN,
        unit: "°C",
        inputs: &[OIL_TEMP, AMBIENT_TEMP, MAX_OIL_SPEC],
        compute: oil_thermal_margin,
    },
    DerivedRule {
        output: WATER_THERMAL_MARGIN,
        unit: "°C",
        inputs: &[COOLANT_OUT_TEMP, AMBIENT_TEMP, MAX_WATER_SPEC],
        compute: water_thermal_margin,
    },
    DerivedRule {
        output: ENGINE_POWER,
        unit: "kW",
        inputs: &[ENGINE_SPEED, RAW_TORQUE, GEAR_RATIO],
        compute: engine_power,
    },
    DerivedRule {
        output: SPECIFIC_CONSUMPTION,
        unit: "g/kW.h",
        inputs: &[FUEL_FLOW_MASS, ENGINE_POWER],
        compute: specific_consumption,
    },
];

/// Append every derivable column to the table, row-wise over the already
/// averaged values.
pub fn apply_derived(output: &mut ReduceOutput) {
    for rule in RULES {
        if !rule.inputs.iter().all(|c| output.schema.contains(c)) {
            debug!(column = rule.output, "derived column skipped, inputs absent");
            continue;
        }
        output.schema.push(rule.output, rule.unit);
        for row in &mut output.rows {
            if let Some(v) = (rule.compute)(row) {
                row.insert(rule.output, v);
            }
        }
    }
}

/// Division that yields missing instead of infinity on a zero (or
/// degenerate) denominator.
fn div(num: f64, den: f64) -> Option<f64> {
    let q = num / den;
    q.is_finite().then_some(q)
}

fn engine_torque(row: &SummaryRow) -> Option<f64> {
    div(row.value(RAW_TORQUE)?, row.value(GEAR_RATIO)?)
}

fn air_thermal_margin(row: &SummaryRow) -> Option<f64> {
    thermal_margin(row, MAX_AIR_SPEC, INTAKE_AIR_TEMP)
}

fn oil_thermal_margin(row: &SummaryRow) -> Option<f64> {
    thermal_margin(row, MAX_OIL_SPEC, OIL_TEMP)
}

fn water_thermal_margin(row: &SummaryRow) -> Option<f64> {
    thermal_margin(row, MAX_WATER_SPEC, COOLANT_OUT_TEMP)
}

/// Spec ceiling minus the observed rise above ambient.
fn thermal_margin(row: &SummaryRow, max_spec: &str, temp: &str) -> Option<f64> {
    Some(row.value(max_spec)? - (row.value(temp)? - row.value(AMBIENT_TEMP)?))
}

fn engine_power(row: &SummaryRow) -> Option<f64> {
    let torque = div(row.value(RAW_TORQUE)?, row.value(GEAR_RATIO)?)?;
    Some(row.value(ENGINE_SPEED)? * std::f64::consts::PI * torque / (30.0 * 1000.0))
}

fn specific_consumption(row: &SummaryRow) -> Option<f64> {
    div(row.value(FUEL_FLOW_MASS)? * 1000.0, row.value(ENGINE_POWER)?)
}
