use std::fs;
use std::path::PathBuf;
use std::process;

use log::{error, info, warn};
use structopt::StructOpt;
use thousands::Separable;

mod error;
mod perf;
mod perf_csv;
mod perf_transfer_data;
mod plot;

use crate::error::PlotError;
use crate::perf::{payload_size_bytes, PerfTables};
use crate::perf_transfer_data::{PAYLOAD_SIZES, PERF_DATA_TRANSFER};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "transfer-bench-plot",
    about = "Plots latency and throughput of attachment, proto and streaming transfers against parallelism"
)]
struct Opt {
    /// Payload sizes to render, e.g. 10k or 1m. Defaults to every size in the data set.
    #[structopt(short, long = "payload")]
    payloads: Vec<String>,

    /// Directory the PNG files are written to
    #[structopt(short, long, parse(from_os_str), default_value = ".")]
    out_dir: PathBuf,

    /// Read brpc_parallel_*.csv sweeps from this directory instead of the built-in results
    #[structopt(long, parse(from_os_str))]
    results: Option<PathBuf>,

    /// Print the payload sizes and the methods measured for each, then exit
    #[structopt(long)]
    list: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opt = Opt::from_args();
    if let Err(e) = run(&opt) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(opt: &Opt) -> Result<(), PlotError> {
    let loaded;
    let (tables, available): (&PerfTables, Vec<String>) = match &opt.results {
        Some(dir) => {
            loaded = perf_csv::load_results(dir)?;
            let available = loaded.payload_sizes();
            (&loaded, available)
        }
        None => (
            &*PERF_DATA_TRANSFER,
            PAYLOAD_SIZES.iter().map(|s| s.to_string()).collect(),
        ),
    };

    let payloads = if opt.payloads.is_empty() {
        available
    } else if opt.results.is_some() {
        // Loaded payload labels are lower-cased.
        opt.payloads.iter().map(|p| p.to_ascii_lowercase()).collect()
    } else {
        opt.payloads.clone()
    };

    if opt.list {
        list_payloads(tables, &payloads);
        return Ok(());
    }

    if payloads.is_empty() {
        warn!("No payload sizes to render");
        return Ok(());
    }

    fs::create_dir_all(&opt.out_dir)?;

    for payload in &payloads {
        info!("Rendering payload size {} ({})", payload, describe_size(payload));
        plot::render(tables, payload, &opt.out_dir)?;
    }

    info!("Rendered {} charts into {}", payloads.len(), opt.out_dir.display());
    Ok(())
}

fn list_payloads(tables: &PerfTables, payloads: &[String]) {
    for payload in payloads {
        let methods: Vec<&str> = tables
            .methods_for(payload)
            .into_iter()
            .map(|m| m.name())
            .collect();
        println!(
            "{:<6} {:>18}  {}",
            payload,
            describe_size(payload),
            if methods.is_empty() { "-".to_string() } else { methods.join(", ") }
        );
    }
}

fn describe_size(payload: &str) -> String {
    match payload_size_bytes(payload) {
        Some(bytes) => format!("{} bytes", bytes.separate_with_commas()),
        None => "unknown size".to_string(),
    }
}
