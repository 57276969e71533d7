use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SnType – general supernova classification
// ---------------------------------------------------------------------------

/// SNPCC simulation codes mapping to type II supernovae.
const SNPCC_II_CODES: [u32; 28] = [
    2, 3, 4, 12, 15, 17, 19, 20, 21, 24, 25, 26, 27, 30, 31, 32, 33, 34, 35,
    36, 37, 38, 39, 40, 41, 42, 43, 44,
];

/// SNPCC simulation codes mapping to type Ib/c supernovae.
const SNPCC_IBC_CODES: [u32; 17] = [
    1, 5, 6, 7, 8, 9, 10, 11, 13, 14, 16, 18, 22, 23, 29, 45, 28,
];

/// A simulation code that maps to none of the recognized classes.
///
/// Fatal for the record carrying it: a light curve with an unknown code must
/// be skipped rather than emitted with a guessed label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown supernova simulation code: {0}")]
pub struct UnknownSnCode(pub u32);

/// General supernova classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnType {
    Ia,
    II,
    Ibc,
}

impl SnType {
    /// Map an SNPCC simulation code to its class. Code 0 is a type Ia by
    /// convention; everything else goes through the two membership sets.
    pub fn from_sim_code(code: u32) -> Result<Self, UnknownSnCode> {
        if code == 0 {
            Ok(SnType::Ia)
        } else if SNPCC_IBC_CODES.contains(&code) {
            Ok(SnType::Ibc)
        } else if SNPCC_II_CODES.contains(&code) {
            Ok(SnType::II)
        } else {
            Err(UnknownSnCode(code))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SnType::Ia => "Ia",
            SnType::II => "II",
            SnType::Ibc => "Ibc",
        }
    }
}

impl fmt::Display for SnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ia" => Ok(SnType::Ia),
            "II" => Ok(SnType::II),
            "Ibc" => Ok(SnType::Ibc),
            other => Err(format!("unknown supernova type: '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Sample – which split a light curve belongs to
// ---------------------------------------------------------------------------

/// Original sample a light curve is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sample {
    Train,
    Test,
}

impl Sample {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sample::Train => "train",
            Sample::Test => "test",
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sample {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Sample::Train),
            "test" => Ok(Sample::Test),
            other => Err(format!("unknown sample: '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Observation – one photometry row
// ---------------------------------------------------------------------------

/// A single photometric measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Modified Julian Date of the measurement.
    pub mjd: f64,
    /// Broad-band filter the measurement was taken through.
    pub band: String,
    /// Calibrated flux.
    pub flux: f64,
    /// Flux uncertainty.
    pub flux_err: f64,
    /// Signal-to-noise ratio.
    pub snr: f64,
}

// ---------------------------------------------------------------------------
// LightCurve – scalar metadata + photometry table for one object
// ---------------------------------------------------------------------------

/// One object's light curve: scalar metadata plus the photometry table.
///
/// `bands` is ordered; the order fixes the column layout of the feature
/// vector extracted from this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightCurve {
    /// Object identification number.
    pub id: u64,
    /// Simulated redshift.
    pub redshift: f64,
    /// Sample the object belongs to.
    pub sample: Sample,
    /// General classification derived from the simulation code.
    pub sn_type: SnType,
    /// Simulation model code.
    pub sim_code: u32,
    /// Simulated peak magnitude per band, when available.
    #[serde(default)]
    pub sim_peakmag: Vec<f64>,
    /// Declared broad-band filters, in output order.
    pub bands: Vec<String>,
    /// Photometry rows, in file order.
    pub photometry: Vec<Observation>,
}

impl LightCurve {
    /// (time, flux) of the photometry rows matching `band`, in row order.
    pub fn band_series(&self, band: &str) -> (Vec<f64>, Vec<f64>) {
        let mut time = Vec::new();
        let mut flux = Vec::new();
        for obs in self.photometry.iter().filter(|o| o.band == band) {
            time.push(obs.mjd);
            flux.push(obs.flux);
        }
        (time, flux)
    }

    /// Number of photometry rows matching `band`.
    pub fn band_len(&self, band: &str) -> usize {
        self.photometry.iter().filter(|o| o.band == band).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_code_zero_is_ia() {
        assert_eq!(SnType::from_sim_code(0).unwrap(), SnType::Ia);
    }

    #[test]
    fn sim_code_membership_sets() {
        assert_eq!(SnType::from_sim_code(2).unwrap(), SnType::II);
        assert_eq!(SnType::from_sim_code(44).unwrap(), SnType::II);
        assert_eq!(SnType::from_sim_code(1).unwrap(), SnType::Ibc);
        assert_eq!(SnType::from_sim_code(28).unwrap(), SnType::Ibc);
    }

    #[test]
    fn unknown_sim_code_is_an_error() {
        assert_eq!(SnType::from_sim_code(99), Err(UnknownSnCode(99)));
    }

    #[test]
    fn type_and_sample_round_trip_as_strings() {
        for t in [SnType::Ia, SnType::II, SnType::Ibc] {
            assert_eq!(t.as_str().parse::<SnType>().unwrap(), t);
        }
        for s in [Sample::Train, Sample::Test] {
            assert_eq!(s.as_str().parse::<Sample>().unwrap(), s);
        }
    }

    #[test]
    fn band_series_selects_matching_rows_in_order() {
        let lc = LightCurve {
            id: 7,
            redshift: 0.3,
            sample: Sample::Train,
            sn_type: SnType::Ia,
            sim_code: 0,
            sim_peakmag: vec![],
            bands: vec!["g".into(), "r".into()],
            photometry: vec![
                Observation { mjd: 1.0, band: "g".into(), flux: 10.0, flux_err: 1.0, snr: 10.0 },
                Observation { mjd: 2.0, band: "r".into(), flux: 20.0, flux_err: 1.0, snr: 20.0 },
                Observation { mjd: 3.0, band: "g".into(), flux: 30.0, flux_err: 1.0, snr: 30.0 },
            ],
        };
        let (time, flux) = lc.band_series("g");
        assert_eq!(time, vec![1.0, 3.0]);
        assert_eq!(flux, vec![10.0, 30.0]);
        assert_eq!(lc.band_len("r"), 1);
        assert_eq!(lc.band_len("z"), 0);
    }
}
