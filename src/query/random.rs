use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Draw a seeded random batch from the queryable pool.
///
/// The generator is instantiated per call from `seed`, never taken from
/// process-wide state, so concurrent callers cannot interfere and identical
/// inputs always reproduce the same selection.  The permutation is drawn
/// without replacement over the pool actually passed in, then filtered to
/// `queryable_ids` preserving permutation order, so a batch larger than the
/// queryable pool returns exactly the whole pool with no duplicates.
pub fn random_sampling(
    test_ids: &[u64],
    queryable_ids: &BTreeSet<u64>,
    batch: usize,
    seed: u64,
) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut order: Vec<usize> = (0..test_ids.len()).collect();
    order.shuffle(&mut rng);

    order
        .into_iter()
        .map(|i| test_ids[i])
        .filter(|id| queryable_ids.contains(id))
        .take(batch)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queryable(ids: &[u64]) -> BTreeSet<u64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn identical_inputs_and_seed_reproduce_the_selection() {
        let test_ids: Vec<u64> = (0..100).collect();
        let q = queryable(&[3, 17, 42, 77, 98]);
        let a = random_sampling(&test_ids, &q, 3, 42);
        let b = random_sampling(&test_ids, &q, 3, 42);
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn different_seeds_permute_differently() {
        let test_ids: Vec<u64> = (0..100).collect();
        let q = queryable(&test_ids);
        let a = random_sampling(&test_ids, &q, 100, 1);
        let b = random_sampling(&test_ids, &q, 100, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn oversized_batch_returns_the_whole_queryable_pool_without_duplicates() {
        let test_ids: Vec<u64> = (0..50).collect();
        let q = queryable(&[5, 10, 15]);
        let picked = random_sampling(&test_ids, &q, 1000, 7);
        assert_eq!(picked.len(), 3);
        let unique: BTreeSet<u64> = picked.iter().copied().collect();
        assert_eq!(unique, q);
    }

    #[test]
    fn only_queryable_ids_are_returned() {
        let test_ids: Vec<u64> = (0..50).collect();
        let q = queryable(&[1, 2, 3]);
        let picked = random_sampling(&test_ids, &q, 2, 9);
        assert!(picked.iter().all(|id| q.contains(id)));
    }

    #[test]
    fn zero_batch_and_empty_queryable_set_yield_empty_output() {
        let test_ids: Vec<u64> = (0..10).collect();
        assert!(random_sampling(&test_ids, &queryable(&[1]), 0, 4).is_empty());
        assert!(random_sampling(&test_ids, &BTreeSet::new(), 5, 4).is_empty());
    }
}
