//! # Cadenza DSP
//!
//! A music-analysis engine that decodes audio, derives normalized PCM
//! streams and estimates two perceptual descriptors: the musical key and
//! the tempo of a recording.
//!
//! ## Features
//!
//! - **Decoding**: RIFF/WAVE parsing (8/16/24-bit PCM) and an MP3 adapter,
//!   both producing normalized de-interleaved `f64` samples
//! - **Key Detection**: framewise harmonic pitch-class profiles matched
//!   against tonal templates (Krumhansl, Temperley, Shaath, beatport-fitted
//!   profiles and more)
//! - **BPM Detection**: multi-level db4 wavelet decomposition with
//!   envelope autocorrelation
//!
//! ## Quick Start
//!
//! ```no_run
//! use cadenza_dsp::{decode_wav_file, detect_key, detect_bpm, KeyDetectionConfig};
//!
//! let pcm = decode_wav_file("track.wav")?;
//!
//! let key = detect_key(&pcm.samples, pcm.sample_rate, &KeyDetectionConfig::default())?;
//! println!("Key: {} {} (strength {:.2})", key.key, key.scale, key.strength);
//!
//! let bpm = detect_bpm(&pcm.samples, pcm.sample_rate);
//! println!("BPM: {:.1}", bpm);
//! # Ok::<(), cadenza_dsp::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! The analysis is a fixed synchronous pipeline:
//!
//! ```text
//! Bytes -> PcmAudio -> MonoMix -> Frames -> Window -> Spectrum
//!        -> SpectralPeaks -> HPCP -> KeyEstimator
//! MonoMix -> DWT -> Envelopes -> Autocorrelation -> BPM
//! ```
//!
//! Every stage takes inputs by reference and returns owned values; nothing
//! is shared or retained across calls, so per-thread usage only requires
//! per-thread invocations.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;

pub use analysis::result::{KeyOutput, Scale};
pub use config::KeyDetectionConfig;
pub use error::{AnalysisError, Result};
pub use features::hpcp::{hpcp, HpcpConfig, PcpNormalization, WeightType};
pub use features::key::{estimate_key, profiles::TonalProfile, KeyEstimateConfig};
pub use features::spectral::{
    convert_to_frequency_spectrum, peak_detect, spectral_peaks, PeakDetectConfig, PeakSort,
    SpectralPeak,
};
pub use features::tempo::{bpm_detection, bpms_over_window};
pub use io::{decode_mp3, decode_wav, decode_wav_file, load_audio_file, Mp3Metadata, PcmAudio};
pub use preprocessing::{
    blackman_harris_62db, blackman_harris_92db, mono_mixer, windowing, Framecutter, WindowKind,
};

/// Estimate the key of a recording end to end
///
/// Mixes the channels to mono, cuts 4096-sample frames hopped by 512,
/// windows each with Blackman-Harris 62 dB, extracts up to 100 spectral
/// peaks per frame, folds them into a 36-bin harmonic pitch-class profile,
/// averages the profiles over all frames and scores the average against the
/// configured tonal template bank. All stage parameters come from
/// [`KeyDetectionConfig`].
///
/// # Arguments
///
/// * `samples` - De-interleaved normalized channels (a [`PcmAudio`]'s
///   `samples` field)
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Pipeline parameters
///
/// # Returns
///
/// The estimated [`KeyOutput`]. Silent or empty input yields a
/// zero-strength result rather than an error.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidArgument`] for a zero sample rate, an
/// invalid frame/hop geometry, a profile size that is not a multiple of 12
/// or an unknown profile name.
pub fn detect_key(
    samples: &[Vec<f64>],
    sample_rate: u32,
    config: &KeyDetectionConfig,
) -> Result<KeyOutput> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidArgument(
            "sample rate must be > 0".to_string(),
        ));
    }

    let mono = mono_mixer(samples);
    log::debug!(
        "Detecting key: {} mono samples at {} Hz, profile '{}'",
        mono.len(),
        sample_rate,
        config.profile_type
    );

    // The per-frame pitch-class fold always uses 3 harmonic candidates;
    // `num_harmonics` shapes only the estimator's templates.
    let hpcp_config = HpcpConfig {
        size: config.pcp_size,
        harmonics: 3,
        band_preset: true,
        band_split_frequency: 500.0,
        min_frequency: 40.0,
        max_frequency: 5000.0,
        weight: WeightType::SquaredCosine,
        window_size: config.window_size,
        sample_rate,
        normalized: PcpNormalization::UnitMax,
        ..HpcpConfig::default()
    };

    let nyquist = sample_rate as f64 / 2.0;
    let mut sums = vec![0.0; config.pcp_size];
    let mut frame_count = 0usize;

    for frame in Framecutter::new(&mono, config.frame_size, config.hop_size)? {
        let windowed = windowing(&frame, |len| config.window.coefficients(len), 0, true, true)?;
        let spectrum = convert_to_frequency_spectrum(&windowed)?;
        let peaks = spectral_peaks(
            &spectrum,
            -1000.0,
            PeakSort::Height,
            config.max_num_peaks,
            sample_rate,
            0.0,
            nyquist,
        )?;
        let profile = hpcp(&peaks, &hpcp_config)?;

        for (sum, value) in sums.iter_mut().zip(profile.iter()) {
            *sum += value;
        }
        frame_count += 1;
    }

    if frame_count > 0 {
        for sum in &mut sums {
            *sum /= frame_count as f64;
        }
    }

    let estimate_config = KeyEstimateConfig {
        profile_type: config.profile_type.clone(),
        use_polyphony: config.use_polyphony,
        use_three_chords: config.use_three_chords,
        num_harmonics: config.num_harmonics,
        slope: config.slope,
        use_maj_min: config.use_maj_min,
    };
    estimate_key(&sums, &estimate_config)
}

/// Estimate the tempo of a recording end to end
///
/// Mixes the channels to mono and runs the wavelet-domain BPM detector.
/// Returns 0.0 for signals with no confident beat periodicity.
pub fn detect_bpm(samples: &[Vec<f64>], sample_rate: u32) -> f64 {
    let mono = mono_mixer(samples);
    bpm_detection(&mono, sample_rate)
}
