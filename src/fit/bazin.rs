use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Bazin flux template
// ---------------------------------------------------------------------------

/// Number of parameters in the Bazin template.
pub const N_PARAMS: usize = 5;

/// Column-name suffixes for the five parameters, in output order.
pub const PARAM_SUFFIXES: [&str; N_PARAMS] = ["A", "B", "t0", "tfall", "trise"];

/// Evaluate the Bazin flux template at time `t`:
///
/// ```text
/// f(t) = A · exp(−(t − t0)/τ_fall) / (1 + exp(−(t − t0)/τ_rise)) + B
/// ```
///
/// Parameter order is `[A, B, t0, τ_fall, τ_rise]`. The exponential rise is
/// gated by a logistic factor, the decay by a plain exponential, giving the
/// characteristic rise-peak-decay shape of a supernova light curve.
pub fn bazin(t: f64, p: &[f64; N_PARAMS]) -> f64 {
    let u = t - p[2];
    let fall = (-u / p[3]).exp();
    let rise = 1.0 / (1.0 + (-u / p[4]).exp());
    p[0] * fall * rise + p[1]
}

/// Partial derivatives of the template with respect to the five parameters,
/// evaluated at time `t`.  Same ordering as [`bazin`].
pub fn bazin_gradient(t: f64, p: &[f64; N_PARAMS]) -> [f64; N_PARAMS] {
    let [a, _b, t0, tau_fall, tau_rise] = *p;
    let u = t - t0;
    let fall = (-u / tau_fall).exp();
    let rise = 1.0 / (1.0 + (-u / tau_rise).exp());

    let d_a = fall * rise;
    let d_b = 1.0;
    let d_t0 = a * fall * rise * (1.0 / tau_fall - (1.0 - rise) / tau_rise);
    let d_tau_fall = a * fall * rise * u / (tau_fall * tau_fall);
    let d_tau_rise = -a * fall * rise * (1.0 - rise) * u / (tau_rise * tau_rise);

    [d_a, d_b, d_t0, d_tau_fall, d_tau_rise]
}

// ---------------------------------------------------------------------------
// BazinParams – best-fit parameters for one band
// ---------------------------------------------------------------------------

/// Best-fit Bazin parameters for one band.  A fixed-shape record, never a
/// grow-list: the five slots exist by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BazinParams {
    /// Amplitude, in flux units.
    pub a: f64,
    /// Baseline offset, in flux units.
    pub b: f64,
    /// Peak epoch, in days since the band's earliest observation.
    pub t0: f64,
    /// Decay timescale, in days.
    pub tau_fall: f64,
    /// Rise timescale, in days.
    pub tau_rise: f64,
}

impl BazinParams {
    pub fn from_array(p: [f64; N_PARAMS]) -> Self {
        let [a, b, t0, tau_fall, tau_rise] = p;
        BazinParams { a, b, t0, tau_fall, tau_rise }
    }

    /// The parameters in output order `[A, B, t0, τ_fall, τ_rise]`.
    pub fn as_array(&self) -> [f64; N_PARAMS] {
        [self.a, self.b, self.t0, self.tau_fall, self.tau_rise]
    }

    /// Whether every parameter is a finite number.
    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }

    /// Evaluate the fitted template at time `t`.
    pub fn evaluate(&self, t: f64) -> f64 {
        bazin(t, &self.as_array())
    }
}
