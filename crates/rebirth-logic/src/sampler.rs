//! Weighted and distinct random sampling.
//!
//! Every generator in the engine draws through these helpers so that a
//! seeded RNG fully determines the outcome.

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

/// Pick one item with probability `weight / Σweights`.
///
/// Returns `None` for an empty table or when no weight is positive.
pub fn weighted_pick<'a, T>(rng: &mut impl Rng, table: &'a [(T, f64)]) -> Option<&'a T> {
    let index = WeightedIndex::new(table.iter().map(|(_, w)| *w)).ok()?;
    table.get(index.sample(rng)).map(|(item, _)| item)
}

/// Pick one item uniformly.
pub fn pick<'a, T>(rng: &mut impl Rng, items: &'a [T]) -> Option<&'a T> {
    items.choose(rng)
}

/// Return `count` distinct items in random order (shuffle and slice).
///
/// When `count` exceeds the list, every item is returned, shuffled.
pub fn sample_distinct<T: Clone>(rng: &mut impl Rng, items: &[T], count: usize) -> Vec<T> {
    let mut pool = items.to_vec();
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}

/// Same as [`sample_distinct`] for static string catalogs, producing owned keys.
pub fn sample_keys(rng: &mut impl Rng, items: &[&str], count: usize) -> Vec<String> {
    sample_distinct(rng, items, count)
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_weighted_frequencies_match_weights() {
        let table = [("a", 1.0), ("b", 2.0), ("c", 7.0)];
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts = [0u32; 3];
        let n = 100_000;
        for _ in 0..n {
            match *weighted_pick(&mut rng, &table).unwrap() {
                "a" => counts[0] += 1,
                "b" => counts[1] += 1,
                _ => counts[2] += 1,
            }
        }
        let expected = [0.1, 0.2, 0.7];
        for (count, want) in counts.iter().zip(expected) {
            let freq = *count as f64 / n as f64;
            assert!((freq - want).abs() < 0.01, "freq {freq} vs {want}");
        }
    }

    #[test]
    fn test_weighted_pick_empty_is_none() {
        let mut rng = StdRng::seed_from_u64(1);
        let table: [(u8, f64); 0] = [];
        assert!(weighted_pick(&mut rng, &table).is_none());
        assert!(weighted_pick(&mut rng, &[(1u8, 0.0)]).is_none());
    }

    #[test]
    fn test_distinct_sample_has_no_duplicates() {
        let mut rng = StdRng::seed_from_u64(9);
        let items: Vec<u32> = (0..16).collect();
        let picked = sample_distinct(&mut rng, &items, 6);
        assert_eq!(picked.len(), 6);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn test_oversized_count_returns_everything() {
        let mut rng = StdRng::seed_from_u64(3);
        let picked = sample_keys(&mut rng, &["x", "y", "z"], 10);
        assert_eq!(picked.len(), 3);
        let unique: HashSet<_> = picked.iter().map(String::as_str).collect();
        assert_eq!(unique, HashSet::from(["x", "y", "z"]));
    }

    #[test]
    fn test_same_seed_same_draws() {
        let items = ["a", "b", "c", "d", "e"];
        let a = sample_keys(&mut StdRng::seed_from_u64(5), &items, 3);
        let b = sample_keys(&mut StdRng::seed_from_u64(5), &items, 3);
        assert_eq!(a, b);
    }
}
