//! Data layer: core types and loading.
//!
//! Architecture:
//! ```text
//!  .dat / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → LightCurve
//!   └──────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ LightCurve  │  metadata + photometry table
//!   └────────────┘
//!        │
//!        ▼
//!   ┌────────────────────┐
//!   │ features::extract   │  per-band Bazin fit → FeatureVector
//!   └────────────────────┘
//! ```

pub mod loader;
pub mod model;
