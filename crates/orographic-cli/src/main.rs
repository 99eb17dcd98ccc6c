//! Command-line front end for the orographic precipitation kernel.
//! Reads an elevation grid and a model configuration (both JSON) and writes
//! the precipitation grid as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use orographic_core::{
    compute_batch, compute_orographic_precip, wind_direction_sweep, Grid, ModelConfig,
};

#[derive(Parser, Debug)]
#[command(name = "orographic", version, about = "Linear-theory orographic precipitation")]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute one precipitation field.
    Run(Inputs),
    /// Compute one field per wind direction.
    Sweep {
        #[command(flatten)]
        inputs: Inputs,

        /// Comma-separated wind directions in degrees (direction the wind blows from).
        #[arg(short, long, value_delimiter = ',', required = true)]
        wind_dirs: Vec<f64>,
    },
}

#[derive(Args, Debug)]
struct Inputs {
    /// Elevation grid JSON: `{"data": [...], "width": W, "height": H}` in metres.
    #[arg(short, long)]
    elevation: PathBuf,

    /// Model configuration JSON (grid spacing and parameters).
    #[arg(short, long)]
    config: PathBuf,

    /// Output JSON path. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct SweepEntry {
    wind_dir: f64,
    precipitation: Grid,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => bail!("unknown log level `{other}`"),
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Run(inputs) => run(&inputs),
        Command::Sweep { inputs, wind_dirs } => sweep(&inputs, &wind_dirs),
    }
}

fn run(inputs: &Inputs) -> Result<()> {
    let (elevation, config) = load(inputs)?;
    let params = config.resolve_params()?;

    let precip = compute_orographic_precip(&elevation, config.spacing(), &params)?;
    summarise(params.wind_dir, &precip);
    write_json(inputs.output.as_deref(), &precip)
}

fn sweep(inputs: &Inputs, wind_dirs: &[f64]) -> Result<()> {
    let (elevation, config) = load(inputs)?;
    let params = config.resolve_params()?;

    let jobs = wind_direction_sweep(&elevation, config.spacing(), &params, wind_dirs);
    let mut entries = Vec::with_capacity(jobs.len());
    for (job, result) in jobs.iter().zip(compute_batch(&jobs)) {
        let precipitation =
            result.with_context(|| format!("wind direction {}°", job.params.wind_dir))?;
        summarise(job.params.wind_dir, &precipitation);
        entries.push(SweepEntry { wind_dir: job.params.wind_dir, precipitation });
    }
    write_json(inputs.output.as_deref(), &entries)
}

fn load(inputs: &Inputs) -> Result<(Grid, ModelConfig)> {
    let text = fs::read_to_string(&inputs.elevation)
        .with_context(|| format!("reading elevation grid {}", inputs.elevation.display()))?;
    let elevation: Grid = serde_json::from_str(&text)
        .with_context(|| format!("parsing elevation grid {}", inputs.elevation.display()))?;

    let text = fs::read_to_string(&inputs.config)
        .with_context(|| format!("reading config {}", inputs.config.display()))?;
    let config = ModelConfig::from_json_str(&text)
        .with_context(|| format!("parsing config {}", inputs.config.display()))?;

    info!(
        rows = elevation.height,
        cols = elevation.width,
        dx = config.dx,
        dy = config.dy,
        "loaded inputs"
    );
    Ok((elevation, config))
}

fn summarise(wind_dir: f64, precip: &Grid) {
    let wet = precip.data.iter().filter(|&&v| v > 0.0).count();
    info!(
        wind_dir,
        min = precip.min_value(),
        mean = precip.mean(),
        max = precip.max_value(),
        wet_fraction = wet as f64 / precip.len() as f64,
        "precipitation (mm/h)"
    );
}

fn write_json<T: Serialize>(path: Option<&Path>, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    match path {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote output");
        }
        None => println!("{json}"),
    }
    Ok(())
}
