use anyhow::{bail, Context, Result};
use benchcurve::{
    process, report,
    sheet::{self, RawSheet},
    ReduceConfig,
};
use std::{fs, path::PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

const SUMMARY_FILE: &str = "summary_all_runs.xlsx";
const DASHBOARD_FILE: &str = "bench_dashboard.html";

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) parse arguments ──────────────────────────────────────────
    let args = parse_args()?;
    let mut cfg = match &args.config_path {
        Some(path) => ReduceConfig::from_file(path)?,
        None => ReduceConfig::default(),
    };
    if let Some(window) = args.window_seconds {
        cfg.window_seconds = window;
    }

    // ─── 3) collect input files ──────────────────────────────────────
    let files = collect_input_files(&args.inputs)?;
    if files.is_empty() {
        bail!("no .xlsx/.txt/.csv files found in the given inputs");
    }
    info!(files = files.len(), window_s = cfg.window_seconds, "inputs collected");

    // ─── 4) load sheets, skipping unreadable files ───────────────────
    let mut sheets: Vec<RawSheet> = Vec::with_capacity(files.len());
    for path in &files {
        match sheet::load_sheet(path) {
            Ok(s) => sheets.push(s),
            Err(e) => warn!(file = %path.display(), error = %e, "unreadable file skipped"),
        }
    }

    // ─── 5) reduce and export ────────────────────────────────────────
    let Some(output) = process::reduce(&sheets, &cfg) else {
        info!("no usable runs; nothing written");
        return Ok(());
    };

    let summary_path = args.out_dir.join(SUMMARY_FILE);
    report::workbook::write_summary(&output, &summary_path)?;

    let dashboard_path = args.out_dir.join(DASHBOARD_FILE);
    fs::write(&dashboard_path, report::dashboard::render(&output))
        .with_context(|| format!("writing {}", dashboard_path.display()))?;

    info!(
        runs = output.rows.len(),
        summary = %summary_path.display(),
        dashboard = %dashboard_path.display(),
        "all done"
    );
    Ok(())
}

struct Args {
    inputs: Vec<PathBuf>,
    window_seconds: Option<u32>,
    config_path: Option<PathBuf>,
    out_dir: PathBuf,
}

fn parse_args() -> Result<Args> {
    let mut inputs = Vec::new();
    let mut window_seconds = None;
    let mut config_path = None;
    let mut out_dir = PathBuf::from(".");

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--window" => {
                let v = iter.next().context("--window needs a value in seconds")?;
                window_seconds = Some(v.parse().context("--window must be an integer")?);
            }
            "--config" => {
                config_path = Some(PathBuf::from(
                    iter.next().context("--config needs a file path")?,
                ));
            }
            "--out-dir" => {
                out_dir = PathBuf::from(iter.next().context("--out-dir needs a directory")?);
            }
            "--help" | "-h" => {
                eprintln!(
                    "usage: benchcurve [--window SECS] [--config FILE] [--out-dir DIR] \
                     <dir-or-files>..."
                );
                std::process::exit(0);
            }
            other => inputs.push(PathBuf::from(other)),
        }
    }

    if inputs.is_empty() {
        bail!("no input directory or files given (try --help)");
    }
    Ok(Args {
        inputs,
        window_seconds,
        config_path,
        out_dir,
    })
}

/// Expand each input into bench export files: directories are globbed for
/// `.xlsx`/`.txt`/`.csv`, plain paths are taken as-is.
fn collect_input_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for pattern in ["*.xlsx", "*.txt", "*.csv"] {
                let full = input.join(pattern);
                let full = full.to_string_lossy();
                for entry in glob::glob(&full).with_context(|| format!("globbing {}", full))? {
                    files.push(entry.context("reading glob entry")?);
                }
            }
        } else {
            files.push(input.clone());
        }
    }
    files.sort();
    Ok(files)
}
