//! Spectral analysis: magnitude spectra and peak extraction

pub mod peaks;
pub mod spectrum;

pub use peaks::{peak_detect, spectral_peaks, PeakDetectConfig, PeakSort, SpectralPeak};
pub use spectrum::convert_to_frequency_spectrum;
