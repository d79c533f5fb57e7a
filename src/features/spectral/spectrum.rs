//! Magnitude spectrum of a windowed frame
//!
//! Real-to-magnitude transform built on rustfft. The planner is mixed-radix,
//! so any even frame length works; powers of two are merely fastest.

use crate::error::{AnalysisError, Result};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Compute the magnitude spectrum of a windowed frame
///
/// # Arguments
///
/// * `frame` - Windowed time-domain samples; length must be even
///
/// # Returns
///
/// Magnitudes `sqrt(re^2 + im^2)` for bins `0..=N/2`
/// (`N/2 + 1` values, all non-negative)
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidArgument`] for an empty or odd-length
/// frame.
pub fn convert_to_frequency_spectrum(frame: &[f64]) -> Result<Vec<f64>> {
    let n = frame.len();
    if n == 0 {
        return Err(AnalysisError::InvalidArgument(
            "cannot compute the spectrum of an empty frame".to_string(),
        ));
    }
    if n % 2 != 0 {
        return Err(AnalysisError::InvalidArgument(format!(
            "frame length {} must be even",
            n
        )));
    }

    let mut buffer: Vec<Complex<f64>> = frame.iter().map(|&x| Complex::new(x, 0.0)).collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    Ok(buffer[..n / 2 + 1].iter().map(|c| c.norm()).collect())
}
