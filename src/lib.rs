//! rusty-nova – active-learning toolkit for supernova light-curve
//! classification.
//!
//! Two engines, unified only by the notion of a pool member:
//!
//! * [`features`] reduces each multi-band light curve to a fixed-width
//!   numeric vector by fitting the Bazin flux template ([`fit`])
//!   independently per band, with explicit missing markers where a band
//!   cannot be fit.
//! * [`query`] ranks a candidate pool by informativeness so a labeling
//!   budget is spent on the objects the classifier is least sure about,
//!   restricted to the subset that is actually queryable.
//!
//! The library never touches the filesystem except through [`data::loader`]
//! and [`features::table`], the concrete collaborators used by the `rusty-nova`
//! batch binary.

pub mod data;
pub mod features;
pub mod fit;
pub mod query;

pub use data::model::{LightCurve, Observation, Sample, SnType, UnknownSnCode};
pub use features::{extract, extract_batch, FeatureRow, FeatureVector};
pub use fit::{fit_bazin, BazinParams, FitError};
pub use query::{random_sampling, uncertainty_sampling, QueryError};
