use std::fs;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::error::PlotError;
use crate::perf::{Method, Metric, PerfTables};

/// Parallelism sweeps are written as
/// `brpc_parallel_{target}_reqsz({size})_para(...)_streamsz(...)_prot(...).csv`.
const RESULT_FILE_PREFIX: &str = "brpc_parallel_";

// Column names as the benchmark client writes them.
const LATENCY_COLUMN: &str = "lantencys";
const THROUGHPUT_COLUMN: &str = "speed";

#[derive(Debug, Deserialize)]
struct ResultRow {
    x_axis: u32,
    #[serde(default)]
    lantencys: Option<f64>,
    #[serde(default)]
    speed: Option<f64>,
}

#[derive(Debug)]
struct ResultFile {
    parallelisms: Vec<u32>,
    latency: Option<Vec<f64>>,
    throughput: Option<Vec<f64>>,
}

/// Builds tables from every parallelism sweep in `dir`. All files must share
/// one parallelism axis.
pub fn load_results(dir: &Path) -> Result<PerfTables, PlotError> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if name.starts_with(RESULT_FILE_PREFIX) && name.ends_with(".csv") => {
                files.push(path)
            }
            _ => debug!("Skipping {}", path.display()),
        }
    }
    files.sort();

    let mut parallelisms: Option<Vec<u32>> = None;
    let mut loaded = Vec::with_capacity(files.len());

    for path in &files {
        let name = file_name(path);
        let (method, payload) =
            parse_file_name(&name).ok_or_else(|| PlotError::InvalidResultFile(name.clone()))?;

        let result = read_result_file(path)?;
        let axis = parallelisms.get_or_insert_with(|| result.parallelisms.clone());
        if *axis != result.parallelisms {
            return Err(PlotError::AxisMismatch { file: name });
        }

        info!(
            "Loaded {} {} ({} points) from {}",
            method,
            payload,
            result.parallelisms.len(),
            name
        );
        loaded.push((method, payload, result));
    }

    let mut tables = PerfTables::new(parallelisms.unwrap_or_default());
    for (method, payload, result) in loaded {
        if tables.methods_for(&payload).contains(&method) {
            warn!("Replacing earlier {} results for {}", method, payload);
        }
        if let Some(latency) = result.latency {
            tables.insert_series(method, Metric::Latency, &payload, latency);
        }
        if let Some(throughput) = result.throughput {
            tables.insert_series(method, Metric::Throughput, &payload, throughput);
        }
    }

    Ok(tables)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Extracts the method and payload label from a sweep file name.
fn parse_file_name(name: &str) -> Option<(Method, String)> {
    let rest = name
        .strip_prefix(RESULT_FILE_PREFIX)?
        .strip_suffix(".csv")?;
    let (target, rest) = rest.split_once("_reqsz(")?;
    let (size, _) = rest.split_once(')')?;
    if size.is_empty() {
        return None;
    }
    let method = Method::from_target(target)?;
    Some((method, size.to_ascii_lowercase()))
}

fn read_result_file(path: &Path) -> Result<ResultFile, PlotError> {
    // Header and rows end in a trailing comma, and the last row field may be missing.
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let has_latency = headers.iter().any(|h| h == LATENCY_COLUMN);
    let has_throughput = headers.iter().any(|h| h == THROUGHPUT_COLUMN);

    // The header has one more field than rows ending in qps, so pad rows out
    // before matching fields to column names.
    let mut rows = Vec::new();
    for result in reader.records() {
        let mut record = result?;
        while record.len() < headers.len() {
            record.push_field("");
        }
        let row: ResultRow = record.deserialize(Some(&headers))?;
        rows.push(row);
    }

    let column = |present: bool, name: &str, pick: fn(&ResultRow) -> Option<f64>| {
        if !present {
            return None;
        }
        let values: Option<Vec<f64>> = rows.iter().map(pick).collect();
        if values.is_none() {
            warn!("{} has gaps in column {}, ignoring it", path.display(), name);
        }
        values
    };

    Ok(ResultFile {
        parallelisms: rows.iter().map(|r| r.x_axis).collect(),
        latency: column(has_latency, LATENCY_COLUMN, |r| r.lantencys),
        throughput: column(has_throughput, THROUGHPUT_COLUMN, |r| r.speed),
    })
}
