use nalgebra::{DMatrix, DVector};

use super::bazin::{bazin, bazin_gradient, BazinParams, N_PARAMS};
use super::FitError;

// ---------------------------------------------------------------------------
// Levenberg-Marquardt least squares for the Bazin template
// ---------------------------------------------------------------------------

/// Hard cap on optimizer iterations; guarantees termination.
pub const MAX_ITERATIONS: usize = 100;

/// Minimum number of photometry points for a well-posed 5-parameter fit.
pub const MIN_POINTS: usize = 5;

// Timescale guesses in days, the scale of a typical supernova light curve.
const TAU_FALL_GUESS: f64 = 40.0;
const TAU_RISE_GUESS: f64 = 5.0;

const COST_TOL: f64 = 1e-10;
const STEP_TOL: f64 = 1e-10;
const GRAD_TOL: f64 = 1e-12;

const LAMBDA_INIT: f64 = 1e-3;
const LAMBDA_MIN: f64 = 1e-12;
const LAMBDA_MAX: f64 = 1e10;

/// Fit the Bazin template to one band's (time, flux) samples by minimizing
/// the unweighted sum of squared residuals.
///
/// The caller passes `time` already shifted so the earliest observation sits
/// near t = 0; the exponential terms are ill-conditioned on raw MJD values.
/// Flux uncertainties are intentionally not used as weights; every sample
/// counts equally.
///
/// All failure modes are reported as [`FitError`]; the optimizer never
/// panics and never runs unbounded.
pub fn fit_bazin(time: &[f64], flux: &[f64]) -> Result<BazinParams, FitError> {
    assert_eq!(time.len(), flux.len(), "time and flux must be the same length");
    if time.len() < MIN_POINTS {
        return Err(FitError::InsufficientData(time.len()));
    }

    let p = levenberg_marquardt(time, flux, initial_guess(time, flux))?;
    let params = BazinParams::from_array(p);
    if !params.is_finite() {
        return Err(FitError::NonFinite);
    }
    Ok(params)
}

/// Data-driven starting point: amplitude and peak epoch from the brightest
/// sample, zero baseline, canonical timescales.
fn initial_guess(time: &[f64], flux: &[f64]) -> [f64; N_PARAMS] {
    let mut peak = 0;
    for (i, &f) in flux.iter().enumerate() {
        if f > flux[peak] {
            peak = i;
        }
    }
    [flux[peak], 0.0, time[peak], TAU_FALL_GUESS, TAU_RISE_GUESS]
}

fn sum_squared_residuals(time: &[f64], flux: &[f64], p: &[f64; N_PARAMS]) -> f64 {
    time.iter()
        .zip(flux)
        .map(|(&t, &f)| {
            let r = bazin(t, p) - f;
            r * r
        })
        .sum()
}

/// Damped Gauss-Newton iteration.  Each outer iteration evaluates the
/// jacobian once, then grows the damping factor until a cost-decreasing step
/// is found or the trust region collapses.
fn levenberg_marquardt(
    time: &[f64],
    flux: &[f64],
    mut p: [f64; N_PARAMS],
) -> Result<[f64; N_PARAMS], FitError> {
    let n = time.len();
    let mut lambda = LAMBDA_INIT;
    let mut cost = sum_squared_residuals(time, flux, &p);
    if !cost.is_finite() {
        return Err(FitError::NonFinite);
    }

    for _ in 0..MAX_ITERATIONS {
        let mut jacobian = DMatrix::zeros(n, N_PARAMS);
        let mut residuals = DVector::zeros(n);
        for (row, (&t, &f)) in time.iter().zip(flux).enumerate() {
            residuals[row] = bazin(t, &p) - f;
            let grad = bazin_gradient(t, &p);
            for (col, g) in grad.into_iter().enumerate() {
                jacobian[(row, col)] = g;
            }
        }
        if !residuals.iter().all(|r| r.is_finite()) || !jacobian.iter().all(|g| g.is_finite()) {
            return Err(FitError::NonFinite);
        }

        let jt = jacobian.transpose();
        let jtj = &jt * &jacobian;
        let jtr = &jt * &residuals;

        // stationary point: nothing left to descend
        if jtr.norm() <= GRAD_TOL * (1.0 + cost) {
            return Ok(p);
        }

        loop {
            if lambda > LAMBDA_MAX {
                return Err(FitError::NoConvergence);
            }
            let mut damped = jtj.clone();
            for i in 0..N_PARAMS {
                damped[(i, i)] += lambda * jtj[(i, i)].max(f64::MIN_POSITIVE);
            }
            let Some(chol) = damped.cholesky() else {
                lambda *= 10.0;
                continue;
            };
            let step = chol.solve(&(-&jtr));

            let mut candidate = p;
            for i in 0..N_PARAMS {
                candidate[i] += step[i];
            }
            let new_cost = sum_squared_residuals(time, flux, &candidate);

            if new_cost.is_finite() && new_cost < cost {
                let decrease = cost - new_cost;
                p = candidate;
                cost = new_cost;
                lambda = (lambda * 0.1).max(LAMBDA_MIN);
                if decrease <= COST_TOL * (1.0 + cost) || step.norm() <= STEP_TOL {
                    return Ok(p);
                }
                break;
            }
            lambda *= 10.0;
        }
    }

    Err(FitError::NoConvergence)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRUTH: [f64; N_PARAMS] = [120.0, 5.0, 30.0, 40.0, 5.0];

    fn synthetic_band(n: usize) -> (Vec<f64>, Vec<f64>) {
        let time: Vec<f64> = (0..n).map(|i| i as f64 * 100.0 / n as f64).collect();
        let flux: Vec<f64> = time.iter().map(|&t| bazin(t, &TRUTH)).collect();
        (time, flux)
    }

    #[test]
    fn recovers_parameters_from_a_clean_curve() {
        let (time, flux) = synthetic_band(40);
        let fit = fit_bazin(&time, &flux).unwrap();

        assert!(fit.is_finite());
        assert!((fit.a - TRUTH[0]).abs() / TRUTH[0] < 0.05, "a = {}", fit.a);
        assert!((fit.b - TRUTH[1]).abs() < 1.0, "b = {}", fit.b);
        assert!((fit.t0 - TRUTH[2]).abs() < 1.0, "t0 = {}", fit.t0);
        assert!((fit.tau_fall - TRUTH[3]).abs() / TRUTH[3] < 0.05);
        assert!((fit.tau_rise - TRUTH[4]).abs() / TRUTH[4] < 0.05);

        // the fitted curve reproduces the data
        let worst = time
            .iter()
            .zip(&flux)
            .map(|(&t, &f)| (fit.evaluate(t) - f).abs())
            .fold(0.0_f64, f64::max);
        assert!(worst < 1e-3 * TRUTH[0], "worst residual {worst}");
    }

    #[test]
    fn too_few_points_is_insufficient_data() {
        let (time, flux) = synthetic_band(4);
        assert_eq!(fit_bazin(&time, &flux), Err(FitError::InsufficientData(4)));
    }

    #[test]
    fn non_finite_flux_is_rejected_not_propagated() {
        let (time, mut flux) = synthetic_band(20);
        flux[3] = f64::NAN;
        assert_eq!(fit_bazin(&time, &flux), Err(FitError::NonFinite));
    }

    #[test]
    fn flat_zero_flux_terminates() {
        let time: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let flux = vec![0.0; 10];
        // a degenerate band must terminate inside the iteration cap, whatever
        // the outcome
        let _ = fit_bazin(&time, &flux);
    }
}
