use std::{hash::BuildHasher, io::Write};

use crate::{
    config::{ReportConfig, ReportFormat},
    stats::RunningStatistic,
    table::FinalTable,
};

/// Writes `table` to `out` in the configured format.
pub fn write_report<S: BuildHasher>(
    table: FinalTable<S>,
    config: &ReportConfig,
    out: &mut impl Write,
) -> std::io::Result<()> {
    match config.format {
        ReportFormat::Lines if config.sorted => {
            for (key, stat) in table.into_sorted() {
                write_line(out, &key, &stat, config.precision)?;
            }
        }
        ReportFormat::Lines => {
            for (key, stat) in table.iter() {
                write_line(out, key, stat, config.precision)?;
            }
        }
        ReportFormat::Braces => write_braces(out, table.into_sorted(), config.precision)?,
    }
    Ok(())
}

/// `key;min;max;mean\n`
fn write_line(
    out: &mut impl Write,
    key: &[u8],
    stat: &RunningStatistic,
    precision: usize,
) -> std::io::Result<()> {
    out.write_all(key)?;
    writeln!(
        out,
        ";{:.p$};{:.p$};{:.p$}",
        stat.min,
        stat.max,
        stat.mean(),
        p = precision
    )
}

/// `{first=min/mean/max, second=min/mean/max, etc=min/mean/max}`
fn write_braces(
    out: &mut impl Write,
    entries: Vec<(Box<[u8]>, RunningStatistic)>,
    precision: usize,
) -> std::io::Result<()> {
    write!(out, "{{")?;
    for (i, (key, stat)) in entries.into_iter().enumerate() {
        if i > 0 {
            write!(out, ", ")?;
        }
        out.write_all(&key)?;
        write!(
            out,
            "={:.p$}/{:.p$}/{:.p$}",
            stat.min,
            stat.mean(),
            stat.max,
            p = precision
        )?;
    }
    writeln!(out, "}}")
}
