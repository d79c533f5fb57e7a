//! Peak detection in 1-D signals
//!
//! Finds local maxima with optional quadratic (parabolic) refinement,
//! plateau handling, position/height filtering and sorting. The spectral
//! wrapper maps bin indices to frequencies in Hz.
//!
//! Peak rules:
//! - An interior index is a peak when it is strictly greater than both
//!   neighbors.
//! - A plateau entered by a rise and left by a fall reports its midpoint
//!   (integer index, biased toward the lower index), never interpolated.
//! - The first/last index is a peak when it is strictly greater than its
//!   single neighbor, never interpolated.

use crate::error::{AnalysisError, Result};
use std::str::FromStr;

/// Ordering applied to the returned peak list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeakSort {
    /// Ascending by position
    Position,
    /// Descending by height; ties break by ascending position
    Height,
}

impl FromStr for PeakSort {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "position" => Ok(PeakSort::Position),
            "height" => Ok(PeakSort::Height),
            other => Err(AnalysisError::InvalidArgument(format!(
                "unknown peak sort order '{}'",
                other
            ))),
        }
    }
}

/// Parameters for [`peak_detect`]
#[derive(Debug, Clone)]
pub struct PeakDetectConfig {
    /// Only peaks with height strictly above this survive (default: -1000)
    pub threshold: f64,

    /// Refine interior peaks with a parabolic fit through the three samples
    /// around the maximum (default: true)
    pub interpolate: bool,

    /// Output ordering (default: by position)
    pub sort: PeakSort,

    /// Maximum number of peaks returned; 0 means unlimited (default: 0)
    pub max_peaks: usize,

    /// When positive, positions are rescaled so `[0, N-1]` maps to
    /// `[0, range]`; 0 keeps raw indices (default: 0)
    pub range: f64,

    /// Lowest admissible position, in output units (default: 0)
    pub min_pos: f64,

    /// Highest admissible position, in output units; 0 means no upper
    /// limit (default: 0)
    pub max_pos: f64,
}

impl Default for PeakDetectConfig {
    fn default() -> Self {
        Self {
            threshold: -1000.0,
            interpolate: true,
            sort: PeakSort::Position,
            max_peaks: 0,
            range: 0.0,
            min_pos: 0.0,
            max_pos: 0.0,
        }
    }
}

/// A spectral peak in physical units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralPeak {
    /// Peak frequency in Hz, strictly within `(0, sample_rate/2]`
    pub frequency: f64,

    /// Interpolated magnitude at the peak
    pub magnitude: f64,
}

/// Detect peaks in a signal
///
/// # Arguments
///
/// * `signal` - Input samples
/// * `config` - Detection parameters, see [`PeakDetectConfig`]
///
/// # Returns
///
/// `(position, height)` pairs filtered, sorted and truncated per the
/// configuration. Signals shorter than two samples have no peaks.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidArgument`] for a negative range or an
/// upper position bound below the lower one.
pub fn peak_detect(signal: &[f64], config: &PeakDetectConfig) -> Result<Vec<(f64, f64)>> {
    if config.range < 0.0 {
        return Err(AnalysisError::InvalidArgument(
            "range must be non-negative".to_string(),
        ));
    }
    if config.max_pos > 0.0 && config.min_pos > config.max_pos {
        return Err(AnalysisError::InvalidArgument(format!(
            "min position {} above max position {}",
            config.min_pos, config.max_pos
        )));
    }

    let n = signal.len();
    if n < 2 {
        return Ok(Vec::new());
    }

    let scale = if config.range > 0.0 {
        config.range / (n - 1) as f64
    } else {
        1.0
    };
    let max_pos = if config.max_pos > 0.0 {
        config.max_pos
    } else {
        f64::INFINITY
    };

    let mut peaks: Vec<(f64, f64)> = Vec::new();

    if signal[0] > signal[1] {
        peaks.push((0.0, signal[0]));
    }

    let mut i = 1;
    while i + 1 < n {
        if signal[i] > signal[i - 1] {
            if signal[i] > signal[i + 1] {
                let (position, height) = if config.interpolate {
                    interpolate_peak(signal[i - 1], signal[i], signal[i + 1], i)
                } else {
                    (i as f64, signal[i])
                };
                peaks.push((position, height));
            } else if signal[i] == signal[i + 1] {
                // Plateau: walk to its end and report the midpoint if the
                // signal falls afterwards
                let start = i;
                let mut end = i;
                while end + 1 < n && signal[end + 1] == signal[start] {
                    end += 1;
                }
                if end + 1 < n && signal[end + 1] < signal[start] {
                    let midpoint = (start + end) / 2;
                    peaks.push((midpoint as f64, signal[start]));
                }
                i = end;
            }
        }
        i += 1;
    }

    if signal[n - 1] > signal[n - 2] {
        peaks.push(((n - 1) as f64, signal[n - 1]));
    }

    let mut peaks: Vec<(f64, f64)> = peaks
        .into_iter()
        .map(|(position, height)| (position * scale, height))
        .filter(|&(position, height)| {
            height > config.threshold && position >= config.min_pos && position <= max_pos
        })
        .collect();

    match config.sort {
        PeakSort::Position => {
            peaks.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        }
        PeakSort::Height => {
            peaks.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            });
        }
    }

    if config.max_peaks > 0 && peaks.len() > config.max_peaks {
        peaks.truncate(config.max_peaks);
    }

    Ok(peaks)
}

/// Parabolic refinement through `(i-1, left)`, `(i, middle)`, `(i+1, right)`
fn interpolate_peak(left: f64, middle: f64, right: f64, i: usize) -> (f64, f64) {
    let denom = right - 2.0 * middle + left;
    if denom.abs() < f64::EPSILON {
        return (i as f64, middle);
    }
    let position = i as f64 - 0.5 * (right - left) / denom;
    let height = middle - 0.25 * (left - right) * (position - i as f64);
    (position, height)
}

/// Extract spectral peaks as `(frequency, magnitude)` pairs
///
/// Wraps [`peak_detect`] with positions rescaled to Hz
/// (`range = sample_rate / 2` over the spectrum's bins), interpolation on,
/// and a DC guard: the minimum frequency is clamped to at least 1 Hz so the
/// zero bin never reports a peak.
///
/// # Arguments
///
/// * `spectrum` - Magnitude spectrum (bins `0..=N/2`)
/// * `threshold` - Minimum peak magnitude
/// * `sort` - Output ordering (height-descending for analysis pipelines)
/// * `max_peaks` - Maximum peaks kept, 0 for all
/// * `sample_rate` - Sample rate in Hz of the source signal
/// * `min_frequency` - Lowest admissible frequency in Hz
/// * `max_frequency` - Highest admissible frequency in Hz, 0 for Nyquist
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidArgument`] for a zero sample rate or
/// inconsistent frequency bounds.
pub fn spectral_peaks(
    spectrum: &[f64],
    threshold: f64,
    sort: PeakSort,
    max_peaks: usize,
    sample_rate: u32,
    min_frequency: f64,
    max_frequency: f64,
) -> Result<Vec<SpectralPeak>> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidArgument(
            "sample rate must be > 0".to_string(),
        ));
    }

    let nyquist = sample_rate as f64 / 2.0;
    let config = PeakDetectConfig {
        threshold,
        interpolate: true,
        sort,
        max_peaks,
        range: nyquist,
        min_pos: min_frequency.max(1.0),
        max_pos: if max_frequency > 0.0 {
            max_frequency.min(nyquist)
        } else {
            nyquist
        },
    };

    let peaks = peak_detect(spectrum, &config)?;
    log::debug!("Found {} spectral peaks", peaks.len());

    Ok(peaks
        .into_iter()
        .map(|(frequency, magnitude)| SpectralPeak {
            frequency,
            magnitude,
        })
        .collect())
}
