use std::{num::NonZeroUsize, thread};

use tracing::warn;

use crate::table::DEFAULT_CAPACITY;

/// Settings for one aggregation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of chunks, and so of worker threads.
    pub workers: NonZeroUsize,
    /// Expected number of distinct keys per table.
    pub capacity: usize,
    /// Reject malformed rows instead of assuming well-formed input.
    pub strict: bool,
}

impl EngineConfig {
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers: NonZeroUsize::new(workers).unwrap_or(NonZeroUsize::MIN),
            ..Self::default()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: available_workers(),
            capacity: DEFAULT_CAPACITY,
            strict: false,
        }
    }
}

/// The machine's available parallelism, or 1 if it cannot be queried.
pub fn available_workers() -> NonZeroUsize {
    thread::available_parallelism().unwrap_or_else(|e| {
        warn!(error = %e, "couldn't query the available parallelism, going single-threaded");
        NonZeroUsize::MIN
    })
}

/// Layout of the written report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// One `key;min;max;mean` line per key.
    #[default]
    Lines,
    /// A single `{key=min/mean/max, ...}` line ordered by key.
    Braces,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    pub format: ReportFormat,
    /// Order `lines` output by key. `braces` output is always ordered.
    pub sorted: bool,
    /// Fractional digits written for min, max and mean.
    pub precision: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Lines,
            sorted: false,
            precision: 2,
        }
    }
}
