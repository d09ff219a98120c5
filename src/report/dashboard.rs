// src/report/dashboard.rs
//! Static HTML dashboard: a synthesis table plus one plotly.js chart per
//! channel category, all sharing the engine speed as x-axis.

use chrono::Local;
use serde_json::{json, Value};
use std::fmt::Write as _;

use crate::metrics;
use crate::process::{ReduceOutput, REGIME_COLUMN, SOURCE_FILE_COLUMN};

struct ChartCategory {
    title: &'static str,
    y_label: &'static str,
    /// Fixed lower bound for the y-axis; temperatures and pressures start
    /// at zero so small drifts are not magnified.
    y_floor: Option<f64>,
    columns: &'static [&'static str],
}

static CATEGORIES: &[ChartCategory] = &[
    ChartCategory {
        title: "Puissance",
        y_label: "Puissance (kW)",
        y_floor: None,
        columns: &["AVG_PUISSANCE", metrics::ENGINE_POWER],
    },
    ChartCategory {
        title: "Couple",
        y_label: "Couple (N.m)",
        y_floor: None,
        columns: &["R_EC.TORQUE", metrics::ENGINE_TORQUE],
    },
    ChartCategory {
        title: "Temperatures air",
        y_label: "Temperature (°C)",
        y_floor: Some(0.0),
        columns: &[
            "T_AIR_E_FILTRE_A01",
            "T_AIR_S_FILTRE_A02",
            "T_AIR_S_TURBO_A03",
            "T_AIR_E_MOTEUR_A04",
        ],
    },
    ChartCategory {
        title: "Temperatures Fuel",
        y_label: "Temperature (°C)",
        y_floor: Some(0.0),
        columns: &["T_FUEL_E_MOTEUR_A05", "T_FUEL_E_RADIA_A06", "T_FUEL_S_RADIA_A07"],
    },
    ChartCategory {
        title: "Temperatures Eau/Huile",
        y_label: "Temperature (°C)",
        y_floor: Some(0.0),
        columns: &[
            "T_EAU_S_MOTEUR_A08",
            "T_EAU_E_MOTEUR_A09",
            "T_FUEL_S_RADIA_A07",
            "EngCoolanTemp",
            "TCK_B01",
        ],
    },
    ChartCategory {
        title: "Consommation",
        y_label: "Consommation",
        y_floor: Some(0.0),
        columns: &["C_CAL.CONSO", "C_CAL.DEBIT_MASS", "C_CAL.DEBIT_VOL", "R_CS.QFUKGH"],
    },
    ChartCategory {
        title: "Pressions",
        y_label: "Pression (bar)",
        y_floor: Some(0.0),
        columns: &["P_AIR_S_TURB", "P_AIR_E_MOTEUR", "P_EAU_S_MOTEUR", "P_ECHAPPEMENT"],
    },
];

/// Columns of the synthesis table, in display order; absent ones drop out.
static SYNTHESIS_COLUMNS: &[&str] = &[
    REGIME_COLUMN,
    "AVG_PUISSANCE",
    "T_AMBIANCE_01",
    "R_CS.QFUKGH",
    metrics::AIR_THERMAL_MARGIN,
    metrics::WATER_THERMAL_MARGIN,
    metrics::OIL_THERMAL_MARGIN,
    SOURCE_FILE_COLUMN,
];

/// Render the whole dashboard to a self-contained HTML string.
pub fn render(output: &ReduceOutput) -> String {
    let charts = build_charts(output);

    let mut html = String::new();
    html.push_str(
        "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><title>Dashboard banc moteur</title>",
    );
    html.push_str("<script src=\"https://cdn.plot.ly/plotly-2.26.0.min.js\"></script>");
    html.push_str(
        "<style>body{font-family:Arial;background:#667eea;padding:20px;}\
         .container{max-width:1400px;margin:0 auto;background:white;border-radius:15px;padding:30px;}\
         h1{text-align:center;color:#2c3e50;}table{width:100%;border-collapse:collapse;}\
         th{background:#667eea;color:white;padding:10px;}td{padding:8px;border-bottom:1px solid #ddd;}\
         </style></head><body><div class=\"container\">",
    );
    let _ = write!(
        html,
        "<h1>Dashboard banc moteur</h1><p style=\"text-align:center;color:#666;\">Genere le {}</p>",
        Local::now().format("%d/%m/%Y %H:%M")
    );

    html.push_str(&synthesis_table(output));

    for i in 0..charts.len() {
        let _ = write!(html, "<div style=\"margin:30px 0;\"><div id=\"chart{}\"></div></div>", i);
    }

    html.push_str("</div><script>");
    for (i, (traces, layout)) in charts.iter().enumerate() {
        let _ = write!(html, "Plotly.newPlot(\"chart{}\",{},{});", i, traces, layout);
    }
    html.push_str("</script></body></html>");
    html
}

/// One (traces, layout) JSON pair per category that has plottable data.
fn build_charts(output: &ReduceOutput) -> Vec<(Value, Value)> {
    let mut charts = Vec::new();

    for category in CATEGORIES {
        let mut traces = Vec::new();
        for &column in category.columns {
            if !output.schema.contains(column) {
                continue;
            }
            if !output.rows.iter().any(|r| r.value(column).is_some()) {
                continue;
            }
            let unit = output.schema.unit_of(column).unwrap_or_default();
            let name = if unit.is_empty() || unit.eq_ignore_ascii_case("nan") {
                column.to_string()
            } else {
                format!("{} ({})", column, unit)
            };
            traces.push(json!({
                "x": output.rows.iter().map(|r| json!(r.engine_speed_rpm)).collect::<Vec<_>>(),
                "y": output.rows.iter().map(|r| json!(r.value(column))).collect::<Vec<_>>(),
                "mode": "lines+markers",
                "name": name,
                "line": {"width": 2},
                "marker": {"size": 8},
            }));
        }
        if traces.is_empty() {
            continue;
        }

        let mut yaxis = json!({
            "title": category.y_label,
            "gridcolor": "#e0e0e0",
            "zeroline": true,
        });
        if let Some(floor) = category.y_floor {
            yaxis["range"] = json!([floor, Value::Null]);
        }
        let layout = json!({
            "title": format!("Evolution - {}", category.title),
            "xaxis": {"title": "Regime moteur (tr/min)"},
            "yaxis": yaxis,
            "template": "plotly_white",
            "height": 500,
            "hovermode": "x unified",
            "showlegend": true,
        });
        charts.push((json!(traces), layout));
    }

    charts
}

fn synthesis_table(output: &ReduceOutput) -> String {
    let columns: Vec<&str> = SYNTHESIS_COLUMNS
        .iter()
        .copied()
        .filter(|c| output.schema.contains(c))
        .collect();

    let mut html = String::from("<table><thead><tr>");
    for col in &columns {
        let _ = write!(html, "<th>{}</th>", col.replace('_', " "));
    }
    html.push_str("</tr></thead><tbody>");

    for row in &output.rows {
        html.push_str("<tr>");
        for col in &columns {
            match *col {
                SOURCE_FILE_COLUMN => {
                    let _ = write!(html, "<td>{}</td>", row.source_file);
                }
                REGIME_COLUMN => match row.engine_speed_rpm {
                    Some(rpm) => {
                        let _ = write!(html, "<td>{}</td>", rpm);
                    }
                    None => html.push_str("<td>-</td>"),
                },
                name => match row.value(name) {
                    Some(v) => {
                        let _ = write!(html, "<td>{:.2}</td>", v);
                    }
                    None => html.push_str("<td>-</td>"),
                },
            }
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}
