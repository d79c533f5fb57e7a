//! Wavelet-domain BPM detection
//!
//! Algorithm:
//! 1. Decompose the mono signal through 4 levels of db4 DWT.
//! 2. Turn every detail band into an onset envelope: one-pole low-pass,
//!    absolute value, decimation to a common rate, mean removal.
//! 3. Sum the envelopes (plus the final approximation band) into one
//!    accumulator.
//! 4. Autocorrelate the accumulator via FFT and pick the strongest
//!    absolute peak inside the admissible beat-period window.
//!
//! Degenerate signals (empty, silent, too short for the lag window) yield
//! 0.0 rather than an error.

use crate::features::spectral::{peak_detect, PeakDetectConfig, PeakSort};
use crate::features::tempo::wavelet::Db4Dwt;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// DWT decomposition depth
const LEVELS: usize = 4;

/// Decimation bringing the first detail band to the common envelope rate
const MAX_DECIMATION: usize = 1 << (LEVELS - 1);

/// Lower edge of the tempo search window
const MIN_BPM: f64 = 40.0;

/// Upper edge of the tempo search window
const MAX_BPM: f64 = 220.0;

/// One-pole low-pass coefficient for envelope smoothing
const LOWPASS_ALPHA: f64 = 0.99;

const SILENCE_EPSILON: f64 = 1e-12;

/// Estimate the tempo of a mono signal in beats per minute
///
/// # Arguments
///
/// * `signal` - Mono samples normalized to `[-1, 1]`
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
///
/// The estimated BPM within `[40, 220]`, or 0.0 when no confident
/// autocorrelation peak exists (silence, too-short input, empty input)
pub fn bpm_detection(signal: &[f64], sample_rate: u32) -> f64 {
    if signal.is_empty() || sample_rate == 0 {
        return 0.0;
    }

    log::debug!(
        "Detecting BPM: {} samples at {} Hz",
        signal.len(),
        sample_rate
    );

    let dwt = Db4Dwt::new();

    let mut accumulator: Vec<f64> = Vec::new();
    let mut approximation: Vec<f64> = Vec::new();

    for level in 0..LEVELS {
        let bands = if level == 0 {
            dwt.decompose(signal)
        } else {
            dwt.decompose(&approximation)
        };
        approximation = bands.approximation;

        if level == 0 {
            let common_len = bands.detail.len() / MAX_DECIMATION + 1;
            accumulator = vec![0.0; common_len];
        }

        let decimation = 1 << (LEVELS - level - 1);
        let envelope = envelope_of(&bands.detail, decimation);
        accumulate(&mut accumulator, &envelope);
    }

    // A silent residual means the whole signal carried no energy
    if approximation.iter().all(|&v| v.abs() < SILENCE_EPSILON) {
        return 0.0;
    }
    let envelope = envelope_of(&approximation, 1);
    accumulate(&mut accumulator, &envelope);

    let acorr = autocorrelate(&accumulator);

    let effective_rate = sample_rate as f64 / MAX_DECIMATION as f64;
    let min_idx = (60.0 / MAX_BPM * effective_rate).floor() as usize;
    let max_idx = (60.0 / MIN_BPM * effective_rate).floor() as usize;

    if acorr.is_empty() || min_idx + 1 >= acorr.len() {
        return 0.0;
    }
    let max_idx = max_idx.min(acorr.len() - 1);
    if min_idx >= max_idx {
        return 0.0;
    }

    let window: Vec<f64> = acorr[min_idx..=max_idx].iter().map(|v| v.abs()).collect();
    let config = PeakDetectConfig {
        interpolate: true,
        sort: PeakSort::Height,
        ..Default::default()
    };
    let peaks = match peak_detect(&window, &config) {
        Ok(peaks) => peaks,
        Err(_) => return 0.0,
    };

    let Some(&(relative_lag, _)) = peaks.first() else {
        return 0.0;
    };
    let lag = relative_lag + min_idx as f64;
    if lag <= 0.0 {
        return 0.0;
    }

    let bpm = 60.0 / lag * effective_rate;
    log::debug!("Autocorrelation peak at lag {:.2} -> {:.2} BPM", lag, bpm);
    bpm
}

/// Median BPM over non-overlapping analysis windows
///
/// Splits the signal into full windows of `window_seconds`, estimates each
/// window independently and returns the rounded median over all windows.
/// Windows with no confident periodicity contribute 0.0 to the median like
/// any other estimate. Returns 0.0 for signals shorter than one window.
pub fn bpms_over_window(signal: &[f64], sample_rate: u32, window_seconds: usize) -> f64 {
    if window_seconds == 0 || sample_rate == 0 {
        return 0.0;
    }
    let window_len = window_seconds * sample_rate as usize;
    if window_len == 0 {
        return 0.0;
    }

    let mut bpms: Vec<f64> = signal
        .chunks_exact(window_len)
        .map(|window| bpm_detection(window, sample_rate))
        .collect();

    if bpms.is_empty() {
        return 0.0;
    }

    bpms.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = bpms.len() / 2;
    let median = if bpms.len() % 2 == 1 {
        bpms[mid]
    } else {
        (bpms[mid - 1] + bpms[mid]) / 2.0
    };

    median.round()
}

/// Low-pass, rectify, decimate and center one band
fn envelope_of(band: &[f64], decimation: usize) -> Vec<f64> {
    let mut filtered = band.to_vec();
    one_pole_lowpass(&mut filtered);

    let mut envelope: Vec<f64> = filtered
        .iter()
        .step_by(decimation.max(1))
        .map(|v| v.abs())
        .collect();

    if !envelope.is_empty() {
        let mean = envelope.iter().sum::<f64>() / envelope.len() as f64;
        for value in &mut envelope {
            *value -= mean;
        }
    }
    envelope
}

/// `y[n] = (1 - alpha) * y[n-1] + alpha * x[n]`
fn one_pole_lowpass(signal: &mut [f64]) {
    let mut previous = 0.0;
    for value in signal {
        previous = (1.0 - LOWPASS_ALPHA) * previous + LOWPASS_ALPHA * *value;
        *value = previous;
    }
}

fn accumulate(accumulator: &mut [f64], envelope: &[f64]) {
    for (slot, &value) in accumulator.iter_mut().zip(envelope.iter()) {
        *slot += value;
    }
}

/// Linear autocorrelation (positive lags) via zero-padded FFT
///
/// Convolves the signal with its reverse in the frequency domain and keeps
/// lags `0..n`.
fn autocorrelate(signal: &[f64]) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }

    let size = (2 * n).next_power_of_two();
    let mut buffer: Vec<Complex<f64>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    buffer.resize(size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(size);
    fft.process(&mut buffer);

    for value in &mut buffer {
        *value = *value * value.conj();
    }

    let ifft = planner.plan_fft_inverse(size);
    ifft.process(&mut buffer);

    let scale = 1.0 / size as f64;
    buffer[..n].iter().map(|c| c.re * scale).collect()
}
