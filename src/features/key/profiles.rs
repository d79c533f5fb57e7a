//! Tonal profile bank
//!
//! Each named profile is a pair of 12-element weight vectors (major/minor),
//! index 0 holding the tonic weight. Profiles come from the literature on
//! key-finding: Krumhansl's probe-tone ratings, Temperley's modified
//! weights, Shaath's DJ-oriented profiles, plain tonic triads, and
//! electronic-music profiles fitted on beatport corpora.
//!
//! The chord variants (tonic/subdominant/dominant triads weighted by the
//! base profile) support the three-chord scoring mode.

use crate::error::{AnalysisError, Result};

const KRUMHANSL_MAJOR: [f64; 12] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];
const KRUMHANSL_MINOR: [f64; 12] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

const TEMPERLEY_MAJOR: [f64; 12] = [
    0.748, 0.060, 0.488, 0.082, 0.670, 0.460, 0.096, 0.715, 0.104, 0.366, 0.057, 0.400,
];
const TEMPERLEY_MINOR: [f64; 12] = [
    0.712, 0.084, 0.474, 0.618, 0.049, 0.460, 0.105, 0.747, 0.404, 0.067, 0.133, 0.330,
];

const SHAATH_MAJOR: [f64; 12] = [
    6.6, 2.0, 3.5, 2.3, 4.6, 4.0, 2.5, 5.2, 2.4, 3.7, 2.3, 3.2,
];
const SHAATH_MINOR: [f64; 12] = [
    6.5, 2.7, 3.5, 5.4, 2.6, 3.5, 2.5, 4.7, 4.0, 2.7, 3.4, 3.2,
];

const TONICTRIAD_MAJOR: [f64; 12] = [
    1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0,
];
const TONICTRIAD_MINOR: [f64; 12] = [
    1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0,
];

const EDMA_MAJOR: [f64; 12] = [
    0.16519551, 0.04749026, 0.08293076, 0.06687112, 0.09994645, 0.09274123, 0.05294487,
    0.13159476, 0.05218986, 0.07443653, 0.06940723, 0.06425150,
];
const EDMA_MINOR: [f64; 12] = [
    0.17235348, 0.05336489, 0.07610090, 0.10043649, 0.05621679, 0.08527853, 0.04979150,
    0.13451001, 0.07458916, 0.05003023, 0.09187879, 0.05545106,
];

const EDMM_MINOR: [f64; 12] = [
    0.18317229, 0.04829258, 0.06473717, 0.11695940, 0.05617976, 0.07306202, 0.05532585,
    0.16716279, 0.04737348, 0.05290845, 0.07994237, 0.05488384,
];

const BGATE_MAJOR: [f64; 12] = [
    16.80, 0.86, 12.95, 1.41, 13.49, 11.93, 1.25, 16.55, 0.92, 12.21, 1.33, 12.99,
];
const BGATE_MINOR: [f64; 12] = [
    18.16, 0.69, 12.99, 13.34, 1.07, 11.15, 1.38, 14.69, 1.61, 10.17, 2.42, 11.34,
];

/// Names accepted by [`TonalProfile::named`]
pub const PROFILE_NAMES: [&str; 7] = [
    "Krumhansl",
    "Temperley",
    "Shaath",
    "Tonictriad",
    "Edma",
    "Edmm",
    "Bgate",
];

/// A named pair of tonal weight templates plus derived chord templates
///
/// Index 0 of each template is the tonic; entries are weights per pitch
/// class relative to the tonic. Instances are immutable values built once
/// from the constant tables.
#[derive(Debug, Clone, PartialEq)]
pub struct TonalProfile {
    /// Profile name as accepted by [`TonalProfile::named`]
    pub name: String,

    /// Major-scale weights
    pub major: [f64; 12],

    /// Minor-scale weights
    pub minor: [f64; 12],

    /// Tonic/subdominant/dominant major triads weighted by the base profile
    pub major_chords: [f64; 12],

    /// Tonic/subdominant/dominant minor triads weighted by the base profile
    pub minor_chords: [f64; 12],
}

impl TonalProfile {
    /// Look up a profile by name
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidArgument`] for a name not listed in
    /// [`PROFILE_NAMES`].
    pub fn named(name: &str) -> Result<Self> {
        let (major, minor) = match name {
            "Krumhansl" => (KRUMHANSL_MAJOR, KRUMHANSL_MINOR),
            "Temperley" => (TEMPERLEY_MAJOR, TEMPERLEY_MINOR),
            "Shaath" => (SHAATH_MAJOR, SHAATH_MINOR),
            "Tonictriad" => (TONICTRIAD_MAJOR, TONICTRIAD_MINOR),
            "Edma" => (EDMA_MAJOR, EDMA_MINOR),
            "Edmm" => (EDMA_MAJOR, EDMM_MINOR),
            "Bgate" => (BGATE_MAJOR, BGATE_MINOR),
            other => {
                return Err(AnalysisError::InvalidArgument(format!(
                    "unknown tonal profile '{}'",
                    other
                )))
            }
        };

        Ok(Self {
            name: name.to_string(),
            major,
            minor,
            major_chords: chord_template(&major, true),
            minor_chords: chord_template(&minor, false),
        })
    }
}

/// Spread a template across an idealized harmonic series
///
/// Every pitch class `p` contributes to the classes of its harmonics
/// `h in 1..=num_harmonics` at offsets `round(12 * log2(h)) mod 12`, with
/// amplitude `slope^(h-1)`. `num_harmonics <= 1` leaves the template
/// unchanged.
pub fn spread_harmonics(template: &[f64; 12], num_harmonics: usize, slope: f64) -> [f64; 12] {
    if num_harmonics <= 1 {
        return *template;
    }

    let mut out = [0.0; 12];
    for (p, &weight) in template.iter().enumerate() {
        if weight == 0.0 {
            continue;
        }
        for h in 1..=num_harmonics {
            let offset = (12.0 * (h as f64).log2()).round() as usize % 12;
            out[(p + offset) % 12] += weight * slope.powi(h as i32 - 1);
        }
    }
    out
}

/// Build the tonic/subdominant/dominant chord template for a base profile
///
/// Each triad is weighted by the base profile's value at its root, so the
/// chord template inherits the profile's emphasis on the primary degrees.
fn chord_template(base: &[f64; 12], major: bool) -> [f64; 12] {
    let triad: [usize; 3] = if major { [0, 4, 7] } else { [0, 3, 7] };
    // Degrees I, IV and V (tonic, subdominant, dominant)
    let roots: [usize; 3] = [0, 5, 7];

    let mut out = [0.0; 12];
    for &root in &roots {
        let weight = base[root];
        for &interval in &triad {
            out[(root + interval) % 12] += weight;
        }
    }
    out
}
