//! Frame windowing with Blackman-Harris families
//!
//! A window function takes the frame length and returns the coefficient
//! vector; [`windowing`] multiplies a frame by those coefficients with
//! optional energy normalization, right zero-padding and zero-phase
//! rotation (peak moved to index 0, as required for real-FFT phase
//! analysis).

use crate::error::{AnalysisError, Result};

/// Window families selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    /// 4-term Blackman-Harris, -62 dB sidelobes
    BlackmanHarris62,
    /// 4-term Blackman-Harris, -92 dB sidelobes
    BlackmanHarris92,
}

impl WindowKind {
    /// Coefficient vector of this window for a given frame length
    pub fn coefficients(self, len: usize) -> Vec<f64> {
        match self {
            WindowKind::BlackmanHarris62 => blackman_harris_62db(len),
            WindowKind::BlackmanHarris92 => blackman_harris_92db(len),
        }
    }
}

/// Generic 4-term Blackman-Harris window
///
/// `w[n] = a0 - a1*cos(2*pi*n/(N-1)) + a2*cos(4*pi*n/(N-1)) - a3*cos(6*pi*n/(N-1))`
pub fn blackman_harris(len: usize, a0: f64, a1: f64, a2: f64, a3: f64) -> Vec<f64> {
    if len == 0 {
        return Vec::new();
    }
    if len == 1 {
        return vec![a0 - a1 + a2 - a3];
    }

    let denom = (len - 1) as f64;
    (0..len)
        .map(|n| {
            let x = std::f64::consts::PI * n as f64 / denom;
            a0 - a1 * (2.0 * x).cos() + a2 * (4.0 * x).cos() - a3 * (6.0 * x).cos()
        })
        .collect()
}

/// Blackman-Harris window with -62 dB sidelobe attenuation
pub fn blackman_harris_62db(len: usize) -> Vec<f64> {
    blackman_harris(len, 0.44959, 0.49364, 0.05677, 0.0)
}

/// Blackman-Harris window with -92 dB sidelobe attenuation
pub fn blackman_harris_92db(len: usize) -> Vec<f64> {
    blackman_harris(len, 0.35875, 0.48829, 0.14128, 0.01168)
}

/// Apply a window function to a frame
///
/// # Arguments
///
/// * `frame` - Input samples
/// * `window_fn` - Function producing window coefficients for a length
/// * `zero_padding_size` - Zeros appended after the windowed samples
/// * `zero_phase` - Rotate the output by half the frame so the window peak
///   lands at index 0
/// * `normalize` - Scale coefficients so they sum to 2.0, preserving
///   spectral energy across window lengths
///
/// # Returns
///
/// Windowed (and optionally padded/rotated) samples of length
/// `frame.len() + zero_padding_size`
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidArgument`] for frames shorter than two
/// samples or a window function returning the wrong number of coefficients.
pub fn windowing<F>(
    frame: &[f64],
    window_fn: F,
    zero_padding_size: usize,
    zero_phase: bool,
    normalize: bool,
) -> Result<Vec<f64>>
where
    F: Fn(usize) -> Vec<f64>,
{
    let size = frame.len();
    if size < 2 {
        return Err(AnalysisError::InvalidArgument(
            "windowing needs at least 2 samples".to_string(),
        ));
    }

    let mut window = window_fn(size);
    if window.len() != size {
        return Err(AnalysisError::InvalidArgument(format!(
            "window function returned {} coefficients for {} samples",
            window.len(),
            size
        )));
    }

    if normalize {
        let sum: f64 = window.iter().sum();
        if sum.abs() > f64::EPSILON {
            let scale = 2.0 / sum;
            for w in &mut window {
                *w *= scale;
            }
        }
    }

    let total = size + zero_padding_size;
    let mut windowed = vec![0.0; total];
    for i in 0..size {
        windowed[i] = frame[i] * window[i];
    }

    if !zero_phase {
        return Ok(windowed);
    }

    let shift = size / 2;
    let mut rotated = vec![0.0; total];
    for (i, slot) in rotated.iter_mut().enumerate() {
        *slot = windowed[(i + shift) % total];
    }
    Ok(rotated)
}
