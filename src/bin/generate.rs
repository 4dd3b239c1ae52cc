use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::PathBuf,
    time::Instant,
};

use anyhow::{ensure, Context, Result};
use brc_aggregate::generate::{
    default_station_names, estimate_file_size, generate, human_bytes, parse_station_names,
};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Writes a synthetic `station;temperature` measurements file.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of rows to write, underscores allowed (1_000_000_000)
    #[arg(value_parser = parse_rows)]
    rows: u64,

    /// Destination file
    #[arg(short, long, default_value = "measurements.txt")]
    output: PathBuf,

    /// File of `name;...` lines to draw station names from, a built-in list otherwise
    #[arg(short, long)]
    stations: Option<PathBuf>,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_rows(s: &str) -> Result<u64, String> {
    match s.replace('_', "").parse::<u64>() {
        Ok(0) => Err("must be a positive integer".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let names = match &args.stations {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("couldn't read stations file {}", path.display()))?;
            parse_station_names(&text)
        }
        None => default_station_names(),
    };
    ensure!(!names.is_empty(), "no station names found");
    info!(
        stations = names.len(),
        estimate = %human_bytes(estimate_file_size(&names, args.rows)),
        "estimated max file size"
    );

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let start = Instant::now();
    let file = File::create(&args.output)
        .with_context(|| format!("couldn't create {}", args.output.display()))?;
    let mut out = BufWriter::with_capacity(2 * 1024 * 1024, file);
    generate(&names, args.rows, &mut rng, &mut out).context("couldn't write measurements")?;
    out.flush().context("couldn't write measurements")?;

    let size = fs::metadata(&args.output)?.len();
    info!(
        path = %args.output.display(),
        size = %human_bytes(size),
        elapsed = ?start.elapsed(),
        "measurements written"
    );
    Ok(())
}
