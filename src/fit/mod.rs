//! Nonlinear template fitting: the Bazin flux model and the
//! Levenberg-Marquardt engine that fits it to one band's photometry.

pub mod bazin;
pub mod leastsq;

pub use bazin::{bazin, bazin_gradient, BazinParams, N_PARAMS, PARAM_SUFFIXES};
pub use leastsq::{fit_bazin, MAX_ITERATIONS, MIN_POINTS};

/// Reasons a per-band template fit can fail.
///
/// The feature extractor recovers from every variant by marking the band's
/// five slots missing; none of these abort an object's extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FitError {
    /// Fewer points than the 5-parameter model can support.
    #[error("only {0} photometry points, need at least 5")]
    InsufficientData(usize),
    /// The optimizer exhausted its iteration or damping budget.
    #[error("fit did not converge")]
    NoConvergence,
    /// A parameter, residual, or the cost went non-finite.
    #[error("fit produced a non-finite value")]
    NonFinite,
}
