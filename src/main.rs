use std::{
    fs::File,
    hash::BuildHasher,
    io::{self, BufWriter, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{ensure, Context, Result};
use brc_aggregate::{
    aggregate_with,
    config::available_workers,
    generate::human_bytes,
    hasher::{BuildFxHasher, BuildKeyHasher},
    report::write_report,
    table::DEFAULT_CAPACITY,
    EngineConfig, HasherKind, Input, ReportConfig, ReportFormat,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

const OUT_BUFFER: usize = 2 * 1024 * 1024;

/// Per-key min, mean and max of a file of `key;value` rows.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// File of newline-separated `key;value` rows
    input: PathBuf,

    /// Where to write the report, stdout if omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Worker threads, defaults to the available parallelism
    #[arg(short, long, env = "BRC_WORKERS")]
    workers: Option<NonZeroUsize>,

    /// Expected number of distinct keys
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Fail on malformed rows instead of assuming well-formed input
    #[arg(long)]
    strict: bool,

    #[arg(long, value_enum, default_value_t, env = "BRC_HASHER")]
    hasher: HasherKind,

    #[arg(long, value_enum, default_value_t)]
    format: ReportFormat,

    /// Order report lines by key
    #[arg(long)]
    sorted: bool,

    /// Fractional digits in the report
    #[arg(long, default_value_t = 2)]
    precision: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let start = Instant::now();

    ensure!(
        args.input.exists(),
        "input file {} does not exist",
        args.input.display()
    );
    let input = Input::open(&args.input)?;
    info!(
        path = %args.input.display(),
        size = %human_bytes(input.as_bytes().len() as u64),
        "input mapped"
    );

    let engine = EngineConfig {
        workers: args.workers.unwrap_or_else(available_workers),
        capacity: args.capacity,
        strict: args.strict,
    };
    let report = ReportConfig {
        format: args.format,
        sorted: args.sorted,
        precision: args.precision,
    };
    info!(workers = engine.workers.get(), hasher = ?args.hasher, "aggregating");

    let output = args.output.as_deref();
    let rows = match args.hasher {
        HasherKind::Poly => run::<BuildKeyHasher>(input.as_bytes(), &engine, &report, output)?,
        HasherKind::Fx => run::<BuildFxHasher>(input.as_bytes(), &engine, &report, output)?,
    };

    info!(rows, elapsed = ?start.elapsed(), "done");
    Ok(())
}

/// Aggregates `input` and writes the report, returning the number of rows seen.
fn run<S>(
    input: &[u8],
    engine: &EngineConfig,
    report: &ReportConfig,
    output: Option<&Path>,
) -> Result<u64>
where
    S: BuildHasher + Default + Send,
{
    let table = aggregate_with::<S>(input, engine).context("aggregation failed")?;
    let rows = table.total_count();
    info!(keys = table.len(), rows, "aggregated");

    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("couldn't create output file {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut out = BufWriter::with_capacity(OUT_BUFFER, sink);
    write_report(table, report, &mut out).context("couldn't write report")?;
    out.flush().context("couldn't write report")?;
    Ok(rows)
}
