//! Pool ranking for the active-learning query step.
//!
//! Both strategies are pure functions over their arguments: given the pool's
//! ids, the subset that is actually queryable (e.g. spectroscopic follow-up
//! exists), and a labeling budget, they return a priority-ordered,
//! budget-truncated id list.  No state, no I/O.

pub mod random;
pub mod uncertainty;

pub use random::random_sampling;
pub use uncertainty::uncertainty_sampling;

/// The class-probability matrix and the id sequence must stay aligned row
/// for row; anything else is a caller bug worth surfacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("class_prob has {rows} rows but test_ids has {ids} entries")]
    ShapeMismatch { rows: usize, ids: usize },
}
