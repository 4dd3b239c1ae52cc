//! Per-key min, mean and max over large `key;value` files.
//!
//! The input buffer is split into line-aligned chunks, each chunk is folded into its
//! own table on a dedicated thread, and the tables are merged once every thread is done.

use std::{hash::BuildHasher, time::Instant};

use tracing::{debug, info};

pub mod chunk;
pub mod config;
pub mod error;
pub mod generate;
pub mod hasher;
pub mod input;
pub mod parse;
pub mod pool;
pub mod reduce;
pub mod report;
pub mod scan;
pub mod stats;
pub mod table;

pub use config::{EngineConfig, ReportConfig, ReportFormat};
pub use error::{Error, MalformedRow, Result};
pub use hasher::HasherKind;
pub use input::Input;
pub use stats::RunningStatistic;
pub use table::{FinalTable, PartialTable, Table};

/// Aggregates `input` with the polynomial key hasher.
pub fn aggregate(input: &[u8], config: &EngineConfig) -> Result<FinalTable> {
    aggregate_with(input, config)
}

/// Aggregates `input`, hashing keys with `S`.
///
/// Partitioning, scanning and reduction run strictly one after the other. Empty input
/// gives an empty table without starting any worker.
pub fn aggregate_with<S>(input: &[u8], config: &EngineConfig) -> Result<FinalTable<S>>
where
    S: BuildHasher + Default + Send,
{
    let start = Instant::now();
    let chunks = chunk::partition(input, config.workers.get());
    debug!(bytes = input.len(), chunks = chunks.len(), "input partitioned");
    if chunks.is_empty() {
        return Ok(FinalTable::<S>::default());
    }

    let partials = pool::run_workers::<S>(input, &chunks, config)?;
    let scanned = start.elapsed();

    let table = reduce::reduce(partials);
    info!(
        keys = table.len(),
        scan = ?scanned,
        total = ?start.elapsed(),
        "aggregation done"
    );
    Ok(table)
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::{aggregate, aggregate_with, EngineConfig};
    use crate::{hasher::BuildFxHasher, FinalTable};

    fn stat(table: &FinalTable, key: &str) -> (f64, f64, f64, u64) {
        let s = table
            .get(key.as_bytes())
            .unwrap_or_else(|| panic!("missing key `{key}`"));
        (s.min, s.max, s.sum, s.count)
    }

    #[test]
    fn scenarios() {
        let config = EngineConfig::with_workers(4);

        let table = aggregate(b"A;1.0\nB;2.0\nA;3.0\n", &config).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(stat(&table, "A"), (1.0, 3.0, 4.0, 2));
        assert_eq!(stat(&table, "B"), (2.0, 2.0, 2.0, 1));

        let table = aggregate(b"X;-5.25\nX;10.00\n", &config).unwrap();
        assert_eq!(stat(&table, "X"), (-5.25, 10.0, 4.75, 2));

        let table = aggregate(b"", &config).unwrap();
        assert!(table.is_empty());

        let table = aggregate(b"Z;7.5", &config).unwrap();
        assert_eq!(stat(&table, "Z"), (7.5, 7.5, 7.5, 1));

        let table = aggregate(b"A;0.1\nA;0.1\nA;0.1\n", &config).unwrap();
        let a = table.get(b"A").unwrap();
        assert!(a.min <= a.mean() && a.mean() <= a.max, "{a:?}");

        let table = aggregate(b"Z;7.5\r\nZ;-7.5\r\n", &config).unwrap();
        assert_eq!(stat(&table, "Z"), (-7.5, 7.5, 0.0, 2));
    }

    fn random_input(rng: &mut StdRng, rows: usize) -> Vec<u8> {
        let keys = [
            "Hamburg", "Bulawayo", "Palembang", "St. John's", "Cracow", "Saint-Denis",
            "Saint-Depot", "Zürich", "A",
        ];
        let mut input = Vec::new();
        for _ in 0..rows {
            let key = keys[rng.random_range(0..keys.len())];
            let hundredths: i32 = rng.random_range(-9999..=9999);
            let sign = if hundredths < 0 { "-" } else { "" };
            let abs = hundredths.abs();
            let row = format!("{key};{sign}{}.{:02}\n", abs / 100, abs % 100);
            input.extend_from_slice(row.as_bytes());
        }
        input
    }

    #[test]
    fn worker_count_does_not_change_result() {
        let mut rng = StdRng::seed_from_u64(1234);
        let input = random_input(&mut rng, 500);
        let single = aggregate(&input, &EngineConfig::with_workers(1)).unwrap();
        assert_eq!(single.total_count(), 500);

        for workers in [2, 3, 7, 16, 64, 499, 500, 1000] {
            let config = EngineConfig {
                capacity: 64,
                ..EngineConfig::with_workers(workers)
            };
            let parallel = aggregate(&input, &config).unwrap();
            assert_eq!(parallel.len(), single.len(), "workers: {workers}");
            assert_eq!(parallel.total_count(), 500, "workers: {workers}");
            for (key, s) in single.iter() {
                let p = parallel.get(key).unwrap();
                assert_eq!((p.min, p.max, p.count), (s.min, s.max, s.count));
                assert!((p.sum - s.sum).abs() < 1e-6, "workers: {workers}");
            }
        }
    }

    #[test]
    fn statistics_are_consistent() {
        let mut rng = StdRng::seed_from_u64(99);
        let input = random_input(&mut rng, 2_000);
        let table = aggregate(&input, &EngineConfig::with_workers(5)).unwrap();
        assert_eq!(table.total_count(), 2_000);
        for (key, s) in table.iter() {
            assert!(s.count >= 1);
            assert!(
                s.min <= s.mean() && s.mean() <= s.max,
                "bad stats for {key:?}: {s:?}"
            );
        }
    }

    #[test]
    fn hashers_agree() {
        let mut rng = StdRng::seed_from_u64(5);
        let input = random_input(&mut rng, 300);
        let config = EngineConfig::with_workers(3);
        let poly = aggregate(&input, &config).unwrap();
        let fx = aggregate_with::<BuildFxHasher>(&input, &config).unwrap();
        assert_eq!(poly.len(), fx.len());
        for (key, s) in poly.iter() {
            let f = fx.get(key).unwrap();
            assert_eq!((f.min, f.max, f.count), (s.min, s.max, s.count));
        }
    }

    #[test]
    fn strict_mode_rejects_bad_rows() {
        let config = EngineConfig {
            strict: true,
            ..EngineConfig::with_workers(2)
        };
        assert!(aggregate(b"A;1.0\nB;2.0\n", &config).is_ok());
        assert!(aggregate(b"A;1.0\nB;2.001\n", &config).is_err());
    }
}
