use std::hash::BuildHasher;

use hashbrown::HashMap;

use crate::{hasher::BuildKeyHasher, stats::RunningStatistic};

/// Expected number of distinct keys, used to pre-size tables.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Key to statistic mapping. Keys are owned copies of the input bytes, allocated once
/// per distinct key.
#[derive(Debug, Clone)]
pub struct Table<S = BuildKeyHasher> {
    map: HashMap<Box<[u8]>, RunningStatistic, S>,
}

/// One worker's table for its chunk.
pub type PartialTable<S = BuildKeyHasher> = Table<S>;
/// The reduced table for the whole input.
pub type FinalTable<S = BuildKeyHasher> = Table<S>;

impl<S: BuildHasher + Default> Table<S> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, S::default()),
        }
    }
}

impl<S: BuildHasher + Default> Default for Table<S> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<S: BuildHasher> Table<S> {
    /// Folds one observation into `key`'s statistic with a single lookup; the key is
    /// copied only the first time it is seen.
    #[inline]
    pub fn record(&mut self, key: &[u8], value: f64) {
        self.map
            .entry_ref(key)
            .and_modify(|stat| stat.observe(value))
            .or_insert(RunningStatistic::new(value));
    }

    /// Folds a statistic produced elsewhere into `key`'s statistic.
    #[inline]
    pub fn merge_entry(&mut self, key: Box<[u8]>, stat: RunningStatistic) {
        self.map
            .entry(key)
            .and_modify(|existing| existing.merge(&stat))
            .or_insert(stat);
    }

    pub fn get(&self, key: &[u8]) -> Option<&RunningStatistic> {
        self.map.get(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of records folded into the table.
    pub fn total_count(&self) -> u64 {
        self.map.values().map(|stat| stat.count).sum()
    }

    /// Entries in table order, which is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &RunningStatistic)> {
        self.map.iter().map(|(key, stat)| (&**key, stat))
    }

    /// Entries ordered by key bytes.
    pub fn into_sorted(self) -> Vec<(Box<[u8]>, RunningStatistic)> {
        let mut entries: Vec<_> = self.map.into_iter().collect();
        entries.sort_unstable_by(|(k1, _), (k2, _)| k1.cmp(k2));
        entries
    }
}

impl<S> IntoIterator for Table<S> {
    type Item = (Box<[u8]>, RunningStatistic);
    type IntoIter = hashbrown::hash_map::IntoIter<Box<[u8]>, RunningStatistic>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}
