//! Key estimation by tonal template matching
//!
//! Scores a pitch-class profile against every rotation of a tonal template
//! pair using Pearson correlation and reports the winning tonic and scale.
//! Bin 0 of the input profile is expected to hold the reference pitch class
//! (A, when the profile was folded against 440 Hz).

use crate::analysis::result::{KeyOutput, Scale, KEY_NAMES};
use crate::error::{AnalysisError, Result};
use crate::features::key::profiles::{spread_harmonics, TonalProfile};

/// Offset of the reference pitch class (A) within the C-based note names
const REFERENCE_NOTE_OFFSET: usize = 9;

/// Parameters for [`estimate_key`]
#[derive(Debug, Clone)]
pub struct KeyEstimateConfig {
    /// Named tonal profile to score against (default: `"Bgate"`)
    pub profile_type: String,

    /// Spread templates across an idealized harmonic series (default: true)
    pub use_polyphony: bool,

    /// Mix the profile's tonic/subdominant/dominant chord templates into
    /// the scored templates (default: true)
    pub use_three_chords: bool,

    /// Harmonics used by polyphony spreading (default: 4)
    pub num_harmonics: usize,

    /// Amplitude decay per harmonic for polyphony spreading (default: 0.6)
    pub slope: f64,

    /// Additionally score a blended major+minor template per tonic
    /// (default: false)
    pub use_maj_min: bool,
}

impl Default for KeyEstimateConfig {
    fn default() -> Self {
        Self {
            profile_type: "Bgate".to_string(),
            use_polyphony: true,
            use_three_chords: true,
            num_harmonics: 4,
            slope: 0.6,
            use_maj_min: false,
        }
    }
}

/// Estimate the key of a pitch-class profile
///
/// # Arguments
///
/// * `pcp` - Pitch-class profile; length must be a multiple of 12. Larger
///   profiles are folded down to 12 bins by summing each group of
///   `len/12` consecutive bins.
/// * `config` - Scoring parameters, see [`KeyEstimateConfig`]
///
/// # Returns
///
/// [`KeyOutput`] with the winning key and scale, the winner's correlation
/// as `strength`, and the margin over the best template of the opposite
/// scale. An all-zero profile yields a zero-strength result (degenerate
/// input, not an error).
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidArgument`] for an unknown profile name
/// or a profile length that is not a positive multiple of 12.
pub fn estimate_key(pcp: &[f64], config: &KeyEstimateConfig) -> Result<KeyOutput> {
    if pcp.is_empty() || pcp.len() % 12 != 0 {
        return Err(AnalysisError::InvalidArgument(format!(
            "pitch-class profile length {} must be a positive multiple of 12",
            pcp.len()
        )));
    }

    let profile = TonalProfile::named(&config.profile_type)?;
    let folded = fold_to_12(pcp);

    let (major_template, minor_template) = build_templates(&profile, config);

    log::debug!(
        "Estimating key against '{}' (polyphony={}, three_chords={}, maj_min={})",
        profile.name,
        config.use_polyphony,
        config.use_three_chords,
        config.use_maj_min
    );

    let blended_template: [f64; 12] =
        std::array::from_fn(|i| (major_template[i] + minor_template[i]) / 2.0);

    let mut best_root = 0usize;
    let mut best_scale = Scale::Major;
    let mut best_corr = f64::NEG_INFINITY;
    let mut best_major = f64::NEG_INFINITY;
    let mut best_minor = f64::NEG_INFINITY;

    for root in 0..12 {
        let major_corr = pearson(&folded, &major_template, root);
        let minor_corr = pearson(&folded, &minor_template, root);

        best_major = best_major.max(major_corr);
        best_minor = best_minor.max(minor_corr);

        for (corr, scale) in [(major_corr, Scale::Major), (minor_corr, Scale::Minor)] {
            if corr > best_corr {
                best_corr = corr;
                best_root = root;
                best_scale = scale;
            }
        }

        if config.use_maj_min {
            let blended_corr = pearson(&folded, &blended_template, root);
            if blended_corr > best_corr {
                best_corr = blended_corr;
                best_root = root;
                // A blended winner reports whichever pure scale fits better
                // at the same tonic
                best_scale = if major_corr >= minor_corr {
                    Scale::Major
                } else {
                    Scale::Minor
                };
            }
        }
    }

    let second_best = match best_scale {
        Scale::Major => best_minor,
        Scale::Minor => best_major,
    };

    let strength = if best_corr.is_finite() { best_corr } else { 0.0 };
    let relative = if strength > 0.0 {
        (strength - second_best) / strength
    } else {
        0.0
    };

    Ok(KeyOutput {
        key: KEY_NAMES[(best_root + REFERENCE_NOTE_OFFSET) % 12].to_string(),
        scale: best_scale,
        strength,
        first_to_second_relative_strength: relative,
    })
}

/// Build the scored template pair from a profile and the scoring options
fn build_templates(profile: &TonalProfile, config: &KeyEstimateConfig) -> ([f64; 12], [f64; 12]) {
    let harmonics = if config.use_polyphony {
        config.num_harmonics
    } else {
        0
    };

    let mut major = spread_harmonics(&profile.major, harmonics, config.slope);
    let mut minor = spread_harmonics(&profile.minor, harmonics, config.slope);

    if config.use_three_chords {
        let major_chords = spread_harmonics(&profile.major_chords, harmonics, config.slope);
        let minor_chords = spread_harmonics(&profile.minor_chords, harmonics, config.slope);
        for i in 0..12 {
            major[i] += major_chords[i];
            minor[i] += minor_chords[i];
        }
    }

    (major, minor)
}

/// Fold a larger profile down to 12 bins by summing each group of
/// consecutive bins covering one semitone
fn fold_to_12(pcp: &[f64]) -> [f64; 12] {
    let resolution = pcp.len() / 12;
    std::array::from_fn(|i| pcp[i * resolution..(i + 1) * resolution].iter().sum())
}

/// Pearson correlation between the profile and a template rotated so the
/// template's tonic aligns with pitch-class `root`
fn pearson(pcp: &[f64; 12], template: &[f64; 12], root: usize) -> f64 {
    let n = 12.0;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    let mut sum_y2 = 0.0;

    for i in 0..12 {
        let x = pcp[(root + i) % 12];
        let y = template[i];
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
        sum_y2 += y * y;
    }

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();

    if denominator < 1e-12 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 12-bin profile with bin 0 = A; pitch classes given in C-based
    /// numbering (C=0, ..., B=11)
    fn profile_from_notes(notes: &[(usize, f64)]) -> Vec<f64> {
        let mut pcp = vec![0.01; 12];
        for &(pitch_class, weight) in notes {
            pcp[(pitch_class + 12 - REFERENCE_NOTE_OFFSET) % 12] = weight;
        }
        pcp
    }

    fn plain_config(profile: &str) -> KeyEstimateConfig {
        KeyEstimateConfig {
            profile_type: profile.to_string(),
            use_polyphony: false,
            use_three_chords: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_c_major_triad() {
        // C, E, G
        let pcp = profile_from_notes(&[(0, 1.0), (4, 0.8), (7, 0.9)]);
        let output = estimate_key(&pcp, &plain_config("Temperley")).unwrap();

        assert_eq!(output.key, "C");
        assert_eq!(output.scale, Scale::Major);
        assert!(output.strength > 0.0);
        assert!(output.first_to_second_relative_strength >= 0.0);
    }

    #[test]
    fn test_a_minor_triad() {
        // A, C, E
        let pcp = profile_from_notes(&[(9, 1.0), (0, 0.8), (4, 0.9)]);
        let output = estimate_key(&pcp, &plain_config("Temperley")).unwrap();

        assert_eq!(output.key, "A");
        assert_eq!(output.scale, Scale::Minor);
    }

    #[test]
    fn test_flat_spelling() {
        // Eb major triad: Eb, G, Bb
        let pcp = profile_from_notes(&[(3, 1.0), (7, 0.8), (10, 0.9)]);
        let output = estimate_key(&pcp, &plain_config("Temperley")).unwrap();

        assert_eq!(output.key, "Eb");
        assert_eq!(output.scale, Scale::Major);
    }

    #[test]
    fn test_rotation_equivariance() {
        let base = profile_from_notes(&[(0, 1.0), (4, 0.8), (7, 0.9)]);
        let config = plain_config("Temperley");
        let reference = estimate_key(&base, &config).unwrap();
        assert_eq!(reference.key, "C");

        for shift in 0..12 {
            let mut rotated = base.clone();
            rotated.rotate_right(shift);
            let output = estimate_key(&rotated, &config).unwrap();

            assert_eq!(output.key, KEY_NAMES[shift % 12], "shift {}", shift);
            assert_eq!(output.scale, reference.scale, "shift {}", shift);
            assert!(
                (output.strength - reference.strength).abs() < 1e-9,
                "strength changed under rotation by {}",
                shift
            );
        }
    }

    #[test]
    fn test_36_bin_profile_folds_like_12() {
        let pcp12 = profile_from_notes(&[(0, 1.0), (4, 0.8), (7, 0.9)]);
        let mut pcp36 = vec![0.0; 36];
        for (i, &v) in pcp12.iter().enumerate() {
            pcp36[i * 3] = v;
        }

        let config = plain_config("Temperley");
        let from12 = estimate_key(&pcp12, &config).unwrap();
        let from36 = estimate_key(&pcp36, &config).unwrap();

        assert_eq!(from12.key, from36.key);
        assert_eq!(from12.scale, from36.scale);
        assert!((from12.strength - from36.strength).abs() < 1e-9);
    }

    #[test]
    fn test_polyphonic_scoring_still_finds_c_major() {
        let pcp = profile_from_notes(&[(0, 1.0), (4, 0.8), (7, 0.9)]);
        let config = KeyEstimateConfig {
            profile_type: "Temperley".to_string(),
            ..Default::default()
        };
        let output = estimate_key(&pcp, &config).unwrap();
        assert_eq!(output.key, "C");
        assert_eq!(output.scale, Scale::Major);
    }

    #[test]
    fn test_maj_min_mode_reports_a_pure_scale() {
        let pcp = profile_from_notes(&[(0, 1.0), (4, 0.8), (7, 0.9)]);
        let config = KeyEstimateConfig {
            profile_type: "Temperley".to_string(),
            use_polyphony: false,
            use_three_chords: false,
            use_maj_min: true,
            ..Default::default()
        };
        let output = estimate_key(&pcp, &config).unwrap();
        assert_eq!(output.key, "C");
        assert!(matches!(output.scale, Scale::Major | Scale::Minor));
    }

    #[test]
    fn test_relative_strength_margin() {
        let pcp = profile_from_notes(&[(0, 1.0), (4, 0.8), (7, 0.9)]);
        let output = estimate_key(&pcp, &plain_config("Temperley")).unwrap();

        // The winner beats the opposite scale, so the margin is positive
        // and below 1 unless the opposite scale anti-correlates
        assert!(output.first_to_second_relative_strength > 0.0);
        assert!(output.strength <= 1.0 && output.strength >= -1.0);
    }

    #[test]
    fn test_zero_profile_is_degenerate_not_an_error() {
        let pcp = vec![0.0; 12];
        let output = estimate_key(&pcp, &plain_config("Temperley")).unwrap();
        assert_eq!(output.strength, 0.0);
        assert_eq!(output.first_to_second_relative_strength, 0.0);
    }

    #[test]
    fn test_invalid_inputs() {
        let pcp = vec![0.0; 11];
        assert!(estimate_key(&pcp, &plain_config("Temperley")).is_err());
        assert!(estimate_key(&[], &plain_config("Temperley")).is_err());

        let pcp = vec![0.0; 12];
        assert!(estimate_key(&pcp, &plain_config("NotAProfile")).is_err());
    }
}
