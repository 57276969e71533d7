//! Feature extraction: reduce each light curve to a fixed-width vector of
//! per-band Bazin parameters, with explicit missing markers where a band
//! cannot be fit.

pub mod table;

use rayon::prelude::*;

use crate::data::model::{LightCurve, Sample, SnType};
use crate::fit::{fit_bazin, BazinParams, MIN_POINTS, N_PARAMS};

// ---------------------------------------------------------------------------
// FeatureVector – one slot-group of 5 parameters per band
// ---------------------------------------------------------------------------

/// The five feature slots contributed by one band.  `None` is the explicit
/// missing marker: insufficient data and fit failure both blank the whole
/// band, never a subset of its slots.
#[derive(Debug, Clone, PartialEq)]
pub struct BandFeatures {
    pub band: String,
    pub fit: Option<BazinParams>,
}

/// Fixed-width feature vector for one light curve: 5 × |bands| slots, in
/// band order.  The width is constant across objects regardless of data
/// quality, so vectors stack into a table.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    bands: Vec<BandFeatures>,
}

impl FeatureVector {
    pub fn from_bands(bands: Vec<BandFeatures>) -> Self {
        FeatureVector { bands }
    }

    /// Total number of scalar slots: always `5 * bands`.
    pub fn len(&self) -> usize {
        self.bands.len() * N_PARAMS
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn bands(&self) -> &[BandFeatures] {
        &self.bands
    }

    /// Whether every slot holds a value.  This is the survivor boundary: an
    /// object with any missing slot is excluded from the training set
    /// entirely, across all bands.
    pub fn is_complete(&self) -> bool {
        self.bands.iter().all(|b| b.fit.is_some())
    }

    /// The scalar slots in output order: band-major, `A B t0 tfall trise`
    /// within each band.
    pub fn slots(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.bands
            .iter()
            .flat_map(|bf| (0..N_PARAMS).map(move |i| bf.fit.map(|p| p.as_array()[i])))
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Extract the feature vector for one light curve.
///
/// For each declared band, in order: select the band's photometry, skip the
/// fit when fewer than 5 rows matched, otherwise re-base time to the band's
/// earliest observation and fit the Bazin template.  Missing data and fit
/// failures are encoded as data, so this never fails.
pub fn extract(lc: &LightCurve) -> FeatureVector {
    let bands = lc
        .bands
        .iter()
        .map(|band| {
            let (time, flux) = lc.band_series(band);
            BandFeatures {
                band: band.clone(),
                fit: fit_band(&time, &flux),
            }
        })
        .collect();
    FeatureVector::from_bands(bands)
}

fn fit_band(time: &[f64], flux: &[f64]) -> Option<BazinParams> {
    if time.len() < MIN_POINTS {
        return None;
    }
    let earliest = time.iter().copied().fold(f64::INFINITY, f64::min);
    let shifted: Vec<f64> = time.iter().map(|t| t - earliest).collect();
    fit_bazin(&shifted, flux).ok()
}

// ---------------------------------------------------------------------------
// Batch extraction
// ---------------------------------------------------------------------------

/// One row of the feature table: the scalar metadata columns plus the
/// feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub id: u64,
    pub redshift: f64,
    pub sn_type: SnType,
    pub sim_code: u32,
    pub sample: Sample,
    pub features: FeatureVector,
}

/// Extract one feature row from a light curve.
pub fn extract_row(lc: &LightCurve) -> FeatureRow {
    FeatureRow {
        id: lc.id,
        redshift: lc.redshift,
        sn_type: lc.sn_type,
        sim_code: lc.sim_code,
        sample: lc.sample,
        features: extract(lc),
    }
}

/// Fit every light curve in parallel.  Per-object fits share no state, so
/// this is a plain data-parallel map; output order matches input order.
pub fn extract_batch(curves: &[LightCurve]) -> Vec<FeatureRow> {
    curves.par_iter().map(extract_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Observation;
    use crate::fit::bazin;

    const TRUTH: [f64; N_PARAMS] = [150.0, 2.0, 25.0, 35.0, 4.0];

    /// A light curve with a well-sampled g band and an `r` band of only
    /// `sparse_rows` points.
    fn test_curve(sparse_rows: usize) -> LightCurve {
        let mut photometry = Vec::new();
        for i in 0..30 {
            let t = i as f64 * 3.0;
            photometry.push(Observation {
                mjd: 56000.0 + t,
                band: "g".into(),
                flux: bazin(t, &TRUTH),
                flux_err: 1.0,
                snr: 10.0,
            });
        }
        for i in 0..sparse_rows {
            photometry.push(Observation {
                mjd: 56000.0 + i as f64 * 5.0,
                band: "r".into(),
                flux: 20.0,
                flux_err: 1.0,
                snr: 10.0,
            });
        }
        LightCurve {
            id: 42,
            redshift: 0.5,
            sample: Sample::Test,
            sn_type: SnType::Ia,
            sim_code: 0,
            sim_peakmag: vec![],
            bands: vec!["g".into(), "r".into()],
            photometry,
        }
    }

    #[test]
    fn vector_width_is_five_per_band_regardless_of_data() {
        for rows in [0, 2, 10] {
            let fv = extract(&test_curve(rows));
            assert_eq!(fv.len(), 2 * N_PARAMS);
            assert_eq!(fv.slots().count(), fv.len());
        }
    }

    #[test]
    fn four_or_fewer_rows_blank_the_whole_band() {
        let fv = extract(&test_curve(4));
        let r = &fv.bands()[1];
        assert_eq!(r.band, "r");
        assert!(r.fit.is_none());
        // exactly the last five slots are missing
        let slots: Vec<_> = fv.slots().collect();
        assert!(slots[..N_PARAMS].iter().all(|s| s.is_some()));
        assert!(slots[N_PARAMS..].iter().all(|s| s.is_none()));
        assert!(!fv.is_complete());
    }

    #[test]
    fn well_sampled_band_yields_finite_parameters() {
        let fv = extract(&test_curve(0));
        let g = &fv.bands()[0];
        let fit = g.fit.expect("g band fit should converge");
        assert!(fit.is_finite());
        // peak epoch is measured from the band's earliest observation
        assert!((fit.t0 - TRUTH[2]).abs() < 2.0, "t0 = {}", fit.t0);
    }

    #[test]
    fn complete_vector_survives() {
        let mut lc = test_curve(0);
        lc.bands = vec!["g".into()];
        let fv = extract(&lc);
        assert!(fv.is_complete());
        assert_eq!(fv.len(), N_PARAMS);
    }

    #[test]
    fn batch_output_is_aligned_with_input() {
        let mut a = test_curve(0);
        a.id = 1;
        let mut b = test_curve(2);
        b.id = 2;
        let rows = extract_batch(&[a, b]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[1].id, 2);
        assert!(!rows[1].features.is_complete());
    }
}
