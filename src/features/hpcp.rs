//! Harmonic pitch-class profile
//!
//! Folds spectral peaks into an octave-collapsed pitch-class histogram.
//! Each peak contributes at the pitch classes of its harmonic-series
//! fundamental candidates, weighted by squared magnitude, a per-harmonic
//! decay, and a cosine-family window measured in semitones around the exact
//! pitch class.
//!
//! Bin 0 corresponds to the reference frequency (A4 = 440 Hz by default);
//! bin resolution is `size / 12` bins per semitone.

use crate::error::{AnalysisError, Result};
use crate::features::spectral::SpectralPeak;
use std::str::FromStr;

/// Decay applied per harmonic when folding a peak's fundamental candidates
const HARMONIC_DECAY: f64 = 0.8;

/// Weighting window applied around a contribution's pitch class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightType {
    /// Deposit the whole contribution in the nearest bin
    None,
    /// `cos(pi/2 * d / window_size)` over semitone distance `d`
    Cosine,
    /// Squared cosine window
    SquaredCosine,
}

impl FromStr for WeightType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(WeightType::None),
            "cosine" => Ok(WeightType::Cosine),
            "squared cosine" => Ok(WeightType::SquaredCosine),
            other => Err(AnalysisError::InvalidArgument(format!(
                "unknown weight type '{}'",
                other
            ))),
        }
    }
}

/// Output normalization of the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PcpNormalization {
    /// Leave raw accumulated values
    None,
    /// Scale so the largest bin is 1
    UnitMax,
    /// Scale so the bins sum to 1
    UnitSum,
}

impl FromStr for PcpNormalization {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(PcpNormalization::None),
            "unit max" => Ok(PcpNormalization::UnitMax),
            "unit sum" => Ok(PcpNormalization::UnitSum),
            other => Err(AnalysisError::InvalidArgument(format!(
                "unknown normalization '{}'",
                other
            ))),
        }
    }
}

/// Parameters for [`hpcp`]
#[derive(Debug, Clone)]
pub struct HpcpConfig {
    /// Profile resolution; must be a positive multiple of 12 (default: 12)
    pub size: usize,

    /// Frequency mapped to bin 0, in Hz (default: 440, A4)
    pub reference_frequency: f64,

    /// Number of additional harmonics folded per peak; 0 uses only the
    /// peak itself (default: 0)
    pub harmonics: usize,

    /// Accumulate low and high bands separately and renormalize each before
    /// summing (default: true)
    pub band_preset: bool,

    /// Split frequency between the low and high band, in Hz (default: 500)
    pub band_split_frequency: f64,

    /// Peaks below this frequency are ignored (default: 40 Hz)
    pub min_frequency: f64,

    /// Peaks above this frequency are ignored (default: 5000 Hz)
    pub max_frequency: f64,

    /// Contribution window shape (default: squared cosine)
    pub weight: WeightType,

    /// Half-width of the contribution window in semitones (default: 1.0)
    pub window_size: f64,

    /// Sample rate of the analyzed signal, used to sanity-check the
    /// frequency bounds (default: 44100)
    pub sample_rate: u32,

    /// Rotate the result so the largest bin sits at index 0
    /// (default: false)
    pub max_shifted: bool,

    /// Apply a non-linear emphasis of strong bins (default: false)
    pub non_linear: bool,

    /// Output normalization (default: unit max)
    pub normalized: PcpNormalization,
}

impl Default for HpcpConfig {
    fn default() -> Self {
        Self {
            size: 12,
            reference_frequency: 440.0,
            harmonics: 0,
            band_preset: true,
            band_split_frequency: 500.0,
            min_frequency: 40.0,
            max_frequency: 5000.0,
            weight: WeightType::SquaredCosine,
            window_size: 1.0,
            sample_rate: 44100,
            max_shifted: false,
            non_linear: false,
            normalized: PcpNormalization::UnitMax,
        }
    }
}

/// Compute a harmonic pitch-class profile from spectral peaks
///
/// # Arguments
///
/// * `peaks` - Spectral peaks as frequency/magnitude pairs
/// * `config` - Fold parameters, see [`HpcpConfig`]
///
/// # Returns
///
/// A `config.size`-element profile, element-wise non-negative. No admissible
/// peaks produce an all-zero profile (a legitimate analysis outcome, not an
/// error).
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidArgument`] when `size` is not a positive
/// multiple of 12, the frequency bounds are inconsistent, the reference
/// frequency is not positive, or the window size is outside `(0, 12]`.
pub fn hpcp(peaks: &[SpectralPeak], config: &HpcpConfig) -> Result<Vec<f64>> {
    validate(config)?;

    let size = config.size;
    let mut low = vec![0.0; size];
    let mut high = vec![0.0; size];
    let mut pcp = vec![0.0; size];

    for peak in peaks {
        if peak.frequency < config.min_frequency || peak.frequency > config.max_frequency {
            continue;
        }

        let contribution = peak.magnitude * peak.magnitude;
        for h in 0..=config.harmonics {
            let candidate = peak.frequency / (h + 1) as f64;
            let pitch_class = (size as f64
                * (candidate / config.reference_frequency).log2())
            .rem_euclid(size as f64);
            let harmonic_weight = HARMONIC_DECAY.powi(h as i32);

            let target = if config.band_preset {
                if peak.frequency < config.band_split_frequency {
                    &mut low
                } else {
                    &mut high
                }
            } else {
                &mut pcp
            };
            deposit(target, pitch_class, contribution * harmonic_weight, config);
        }
    }

    if config.band_preset {
        normalize_unit_max(&mut low);
        normalize_unit_max(&mut high);
        for i in 0..size {
            pcp[i] = low[i] + high[i];
        }
    }

    if config.non_linear {
        apply_non_linear(&mut pcp);
    }

    if config.max_shifted {
        shift_max_to_front(&mut pcp);
    }

    match config.normalized {
        PcpNormalization::None => {}
        PcpNormalization::UnitMax => normalize_unit_max(&mut pcp),
        PcpNormalization::UnitSum => {
            let sum: f64 = pcp.iter().sum();
            if sum > 0.0 {
                for value in &mut pcp {
                    *value /= sum;
                }
            }
        }
    }

    Ok(pcp)
}

fn validate(config: &HpcpConfig) -> Result<()> {
    if config.size == 0 || config.size % 12 != 0 {
        return Err(AnalysisError::InvalidArgument(format!(
            "profile size {} must be a positive multiple of 12",
            config.size
        )));
    }
    if config.reference_frequency <= 0.0 {
        return Err(AnalysisError::InvalidArgument(
            "reference frequency must be positive".to_string(),
        ));
    }
    if config.min_frequency < 0.0 || config.max_frequency <= config.min_frequency {
        return Err(AnalysisError::InvalidArgument(format!(
            "invalid frequency bounds [{}, {}]",
            config.min_frequency, config.max_frequency
        )));
    }
    if !(config.window_size > 0.0 && config.window_size <= 12.0) {
        return Err(AnalysisError::InvalidArgument(format!(
            "window size {} outside (0, 12] semitones",
            config.window_size
        )));
    }
    if config.sample_rate > 0 && config.max_frequency > config.sample_rate as f64 / 2.0 {
        log::warn!(
            "max frequency {} Hz above Nyquist for {} Hz",
            config.max_frequency,
            config.sample_rate
        );
    }
    Ok(())
}

/// Spread one weighted contribution around `pitch_class` (in bins)
fn deposit(pcp: &mut [f64], pitch_class: f64, amount: f64, config: &HpcpConfig) {
    let size = pcp.len();
    let resolution = (size / 12) as f64; // bins per semitone

    match config.weight {
        WeightType::None => {
            let bin = (pitch_class.round() as usize) % size;
            pcp[bin] += amount;
        }
        WeightType::Cosine | WeightType::SquaredCosine => {
            let half_width_bins = config.window_size * resolution;
            let lo = (pitch_class - half_width_bins).ceil() as i64;
            let hi = (pitch_class + half_width_bins).floor() as i64;
            for raw_bin in lo..=hi {
                let semitone_distance = (raw_bin as f64 - pitch_class) / resolution;
                let mut weight = (std::f64::consts::FRAC_PI_2 * semitone_distance
                    / config.window_size)
                    .cos();
                if config.weight == WeightType::SquaredCosine {
                    weight *= weight;
                }
                let bin = raw_bin.rem_euclid(size as i64) as usize;
                pcp[bin] += amount * weight;
            }
        }
    }
}

fn normalize_unit_max(values: &mut [f64]) {
    let max = values.iter().cloned().fold(0.0f64, f64::max);
    if max > 0.0 {
        for value in values {
            *value /= max;
        }
    }
}

/// Emphasize strong bins: `v <- v^2 * sin(pi/2 * v / max)`
fn apply_non_linear(pcp: &mut [f64]) {
    let max = pcp.iter().cloned().fold(0.0f64, f64::max);
    if max <= 0.0 {
        return;
    }
    for value in pcp {
        *value = *value * *value * (std::f64::consts::FRAC_PI_2 * *value / max).sin();
    }
}

fn shift_max_to_front(pcp: &mut [f64]) {
    let (argmax, _) = pcp
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(bi, bv), (i, &v)| {
            if v > bv {
                (i, v)
            } else {
                (bi, bv)
            }
        });
    pcp.rotate_left(argmax);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(frequency: f64, magnitude: f64) -> SpectralPeak {
        SpectralPeak {
            frequency,
            magnitude,
        }
    }

    fn plain_config(size: usize) -> HpcpConfig {
        HpcpConfig {
            size,
            band_preset: false,
            weight: WeightType::None,
            normalized: PcpNormalization::None,
            ..Default::default()
        }
    }

    #[test]
    fn test_size_must_be_multiple_of_12() {
        let config = HpcpConfig {
            size: 10,
            ..Default::default()
        };
        assert!(hpcp(&[], &config).is_err());

        let config = HpcpConfig {
            size: 0,
            ..Default::default()
        };
        assert!(hpcp(&[], &config).is_err());
    }

    #[test]
    fn test_no_peaks_gives_zero_profile() {
        let profile = hpcp(&[], &HpcpConfig::default()).unwrap();
        assert_eq!(profile.len(), 12);
        assert!(profile.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_reference_tone_lands_in_bin_zero() {
        let profile = hpcp(&[peak(440.0, 1.0)], &plain_config(12)).unwrap();
        assert_eq!(profile[0], 1.0);
        assert!(profile[1..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_octaves_fold_together() {
        // A2, A4 and A6 all collapse onto bin 0
        let peaks = [peak(110.0, 1.0), peak(440.0, 1.0), peak(1760.0, 1.0)];
        let profile = hpcp(&peaks, &plain_config(12)).unwrap();
        assert!((profile[0] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_harmonic_candidates_decay() {
        // 880 Hz folds once directly and once as the 2nd-harmonic candidate
        // of 440, both onto bin 0, the latter scaled by the harmonic decay
        let config = HpcpConfig {
            harmonics: 1,
            ..plain_config(12)
        };
        let profile = hpcp(&[peak(880.0, 1.0)], &config).unwrap();
        assert!((profile[0] - 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_magnitude_enters_squared() {
        let profile = hpcp(&[peak(440.0, 3.0)], &plain_config(12)).unwrap();
        assert!((profile[0] - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_squared_cosine_spread_is_symmetric() {
        let config = HpcpConfig {
            size: 36,
            band_preset: false,
            weight: WeightType::SquaredCosine,
            window_size: 0.5,
            normalized: PcpNormalization::None,
            ..Default::default()
        };
        let profile = hpcp(&[peak(440.0, 1.0)], &config).unwrap();

        // Center bin takes the full contribution, immediate neighbors a
        // symmetric partial one
        assert!((profile[0] - 1.0).abs() < 1e-9);
        assert!(profile[1] > 0.0);
        assert!((profile[1] - profile[35]).abs() < 1e-9);
        assert_eq!(profile[2], 0.0);
    }

    #[test]
    fn test_out_of_range_peaks_ignored() {
        let peaks = [peak(20.0, 1.0), peak(10000.0, 1.0)];
        let profile = hpcp(&peaks, &plain_config(12)).unwrap();
        assert!(profile.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_band_preset_normalizes_each_band() {
        // A quiet low-band peak and a loud high-band peak both end up with
        // unit weight before the bands are summed
        let config = HpcpConfig {
            weight: WeightType::None,
            normalized: PcpNormalization::None,
            ..Default::default()
        };
        let peaks = [peak(110.0, 0.1), peak(1760.0, 10.0)];
        let profile = hpcp(&peaks, &config).unwrap();
        assert!((profile[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_max_bounds() {
        let config = HpcpConfig {
            size: 36,
            harmonics: 3,
            ..Default::default()
        };
        let peaks = [
            peak(261.63, 0.8),
            peak(329.63, 0.6),
            peak(392.0, 0.7),
            peak(523.25, 0.4),
        ];
        let profile = hpcp(&peaks, &config).unwrap();

        assert_eq!(profile.len(), 36);
        assert!(profile.iter().all(|&v| (0.0..=1.0).contains(&v)));
        let max = profile.iter().cloned().fold(0.0f64, f64::max);
        assert!((max - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_sum_normalization() {
        let config = HpcpConfig {
            normalized: PcpNormalization::UnitSum,
            ..Default::default()
        };
        let peaks = [peak(440.0, 1.0), peak(523.25, 0.5)];
        let profile = hpcp(&peaks, &config).unwrap();
        let sum: f64 = profile.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_shifted_rotates_peak_to_front() {
        // C5 maps three semitones above the A reference
        let config = HpcpConfig {
            max_shifted: true,
            weight: WeightType::None,
            band_preset: false,
            ..Default::default()
        };
        let profile = hpcp(&[peak(523.25, 1.0)], &config).unwrap();
        let argmax = profile
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap()
            .0;
        assert_eq!(argmax, 0);
    }

    #[test]
    fn test_non_linear_attenuates_weak_bins() {
        let config = HpcpConfig {
            non_linear: true,
            weight: WeightType::None,
            band_preset: false,
            normalized: PcpNormalization::None,
            ..Default::default()
        };
        // Strong A and weak C#
        let peaks = [peak(440.0, 1.0), peak(554.37, 0.4)];
        let profile = hpcp(&peaks, &config).unwrap();

        // Weak bin: (0.16)^2 * sin(pi/2 * 0.16) is far below 0.16
        assert!(profile[4] < 0.16 * 0.16);
        assert!((profile[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_weight_type_parsing() {
        assert_eq!("none".parse::<WeightType>().unwrap(), WeightType::None);
        assert_eq!(
            "squared cosine".parse::<WeightType>().unwrap(),
            WeightType::SquaredCosine
        );
        assert!("hann".parse::<WeightType>().is_err());

        assert_eq!(
            "unit max".parse::<PcpNormalization>().unwrap(),
            PcpNormalization::UnitMax
        );
        assert!("l2".parse::<PcpNormalization>().is_err());
    }
}
