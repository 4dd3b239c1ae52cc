use std::hash::BuildHasher;

use crate::table::{FinalTable, PartialTable};

/// Merges partial tables into one. The largest table is reused as the accumulator, the
/// rest are drained into it key by key. The order of `partials` doesn't matter beyond
/// float rounding of the sums.
pub fn reduce<S>(mut partials: Vec<PartialTable<S>>) -> FinalTable<S>
where
    S: BuildHasher + Default,
{
    let Some(largest) = partials
        .iter()
        .enumerate()
        .max_by_key(|(_, table)| table.len())
        .map(|(i, _)| i)
    else {
        return FinalTable::<S>::default();
    };

    let mut result = partials.swap_remove(largest);
    for table in partials {
        for (key, stat) in table {
            result.merge_entry(key, stat);
        }
    }
    result
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    use super::reduce;
    use crate::table::{FinalTable, PartialTable};

    fn table(rows: &[(&str, f64)]) -> PartialTable {
        let mut table = PartialTable::with_capacity(rows.len());
        for (key, value) in rows {
            table.record(key.as_bytes(), *value);
        }
        table
    }

    fn assert_close(left: &FinalTable, right: &FinalTable) {
        assert_eq!(left.len(), right.len());
        for (key, l) in left.iter() {
            let r = right.get(key).expect("key missing from other table");
            assert_eq!((l.min, l.max, l.count), (r.min, r.max, r.count));
            assert!((l.sum - r.sum).abs() < 1e-9, "sums differ for {key:?}");
        }
    }

    #[test]
    fn nothing_to_reduce() {
        assert!(reduce::<crate::hasher::BuildKeyHasher>(vec![]).is_empty());
    }

    #[test]
    fn combines_fieldwise() {
        let result = reduce(vec![
            table(&[("A", 1.0), ("B", 2.0)]),
            table(&[("A", 3.0)]),
            table(&[("X", -5.25), ("A", -1.5)]),
            table(&[("X", 10.0)]),
        ]);
        assert_eq!(result.len(), 3);
        let a = result.get(b"A").unwrap();
        assert_eq!((a.min, a.max, a.sum, a.count), (-1.5, 3.0, 2.5, 3));
        let x = result.get(b"X").unwrap();
        assert_eq!((x.min, x.max, x.sum, x.count), (-5.25, 10.0, 4.75, 2));
        assert_eq!(result.total_count(), 6);
    }

    #[test]
    fn order_of_partials_is_irrelevant() {
        let partials = vec![
            table(&[("Hamburg", 12.0), ("Cracow", -3.4)]),
            table(&[("Hamburg", 1.25), ("Bulawayo", 8.9)]),
            table(&[("Cracow", 12.6), ("Palembang", 38.8), ("Hamburg", -0.5)]),
            table(&[]),
            table(&[("Bulawayo", -8.9)]),
        ];
        let expected = reduce(partials.clone());

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let mut shuffled = partials.clone();
            shuffled.shuffle(&mut rng);
            assert_close(&reduce(shuffled), &expected);
        }
    }
}
