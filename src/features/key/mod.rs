//! Key estimation
//!
//! A pitch-class profile is scored against a bank of named tonal templates
//! (major/minor weight pairs), optionally enriched with an idealized
//! harmonic series and tonic/subdominant/dominant chord templates. The
//! winning rotation and scale become the reported key.

pub mod estimator;
pub mod profiles;

pub use estimator::{estimate_key, KeyEstimateConfig};
pub use profiles::TonalProfile;
