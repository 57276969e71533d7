use std::collections::BTreeSet;

use super::QueryError;

/// Rank the pool by uncertainty and pick the `batch` most uncertain
/// queryable objects.
///
/// The informativeness score of row `i` is `|class_prob[i][1] − 0.5|`, the
/// distance to the binary decision boundary; score 0 is maximally uncertain
/// and queried first.  Ties keep the original row order (stable sort), so
/// the ranking is deterministic.  Ids outside `queryable_ids` are filtered
/// out after sorting, preserving relative order; when nothing is queryable
/// the result is empty, not an error.
///
/// The two-class contract is fixed by the `[f64; 2]` row type; a multi-class
/// margin or entropy score would be a different function.
pub fn uncertainty_sampling(
    class_prob: &[[f64; 2]],
    test_ids: &[u64],
    queryable_ids: &BTreeSet<u64>,
    batch: usize,
) -> Result<Vec<u64>, QueryError> {
    if class_prob.len() != test_ids.len() {
        return Err(QueryError::ShapeMismatch {
            rows: class_prob.len(),
            ids: test_ids.len(),
        });
    }

    let distance = |i: usize| (class_prob[i][1] - 0.5).abs();

    let mut order: Vec<usize> = (0..test_ids.len()).collect();
    order.sort_by(|&i, &j| distance(i).total_cmp(&distance(j)));

    Ok(order
        .into_iter()
        .map(|i| test_ids[i])
        .filter(|id| queryable_ids.contains(id))
        .take(batch)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queryable(ids: &[u64]) -> BTreeSet<u64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn picks_the_most_uncertain_queryable_objects_in_order() {
        let class_prob = [[0.9, 0.1], [0.5, 0.5], [0.6, 0.4], [0.95, 0.05]];
        let test_ids = [10, 20, 30, 40];
        // id 20 sits exactly on the boundary but is not queryable
        let picked =
            uncertainty_sampling(&class_prob, &test_ids, &queryable(&[10, 30]), 2).unwrap();
        assert_eq!(picked, vec![30, 10]);
    }

    #[test]
    fn never_returns_an_unqueryable_id() {
        let class_prob = [[0.9, 0.1], [0.5, 0.5], [0.6, 0.4], [0.95, 0.05]];
        let test_ids = [10, 20, 30, 40];
        let q = queryable(&[20, 40]);
        let picked = uncertainty_sampling(&class_prob, &test_ids, &q, 10).unwrap();
        assert!(picked.iter().all(|id| q.contains(id)));
        assert_eq!(picked, vec![20, 40]);
    }

    #[test]
    fn ties_keep_original_row_order() {
        // rows 0 and 2 score identically
        let class_prob = [[0.6, 0.4], [0.5, 0.5], [0.4, 0.6]];
        let test_ids = [1, 2, 3];
        let picked =
            uncertainty_sampling(&class_prob, &test_ids, &queryable(&[1, 2, 3]), 3).unwrap();
        assert_eq!(picked, vec![2, 1, 3]);
    }

    #[test]
    fn zero_batch_and_empty_queryable_set_yield_empty_output() {
        let class_prob = [[0.9, 0.1], [0.5, 0.5]];
        let test_ids = [10, 20];
        assert!(uncertainty_sampling(&class_prob, &test_ids, &queryable(&[10]), 0)
            .unwrap()
            .is_empty());
        assert!(uncertainty_sampling(&class_prob, &test_ids, &BTreeSet::new(), 5)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn misaligned_inputs_are_rejected() {
        let class_prob = [[0.9, 0.1]];
        let test_ids = [10, 20];
        assert_eq!(
            uncertainty_sampling(&class_prob, &test_ids, &queryable(&[10]), 1),
            Err(QueryError::ShapeMismatch { rows: 1, ids: 2 })
        );
    }
}
