//! Configuration parameters for the key detection pipeline

use crate::preprocessing::windowing::WindowKind;

/// Tunable parameters for [`detect_key`](crate::detect_key)
///
/// The defaults reproduce the standard analysis chain: 4096-sample frames
/// hopped by 512, Blackman-Harris 62 dB windowing, up to 100 spectral peaks
/// per frame, a 36-bin pitch-class profile and the `Bgate` tonal profile.
#[derive(Debug, Clone)]
pub struct KeyDetectionConfig {
    /// Named tonal profile to score against (default: `"Bgate"`)
    pub profile_type: String,

    /// Spread template weights across an idealized harmonic series
    /// (default: true)
    pub use_polyphony: bool,

    /// Mix tonic/subdominant/dominant chord templates into the scoring
    /// (default: true)
    pub use_three_chords: bool,

    /// Harmonics used by the key estimator's polyphony spreading
    /// (default: 4)
    pub num_harmonics: usize,

    /// Amplitude decay per harmonic for polyphony spreading (default: 0.6)
    pub slope: f64,

    /// Also score a blended major+minor template per tonic (default: false)
    pub use_maj_min: bool,

    /// Pitch-class profile resolution; must be a multiple of 12
    /// (default: 36)
    pub pcp_size: usize,

    /// Analysis frame size in samples (default: 4096)
    pub frame_size: usize,

    /// Hop between consecutive frames in samples (default: 512)
    pub hop_size: usize,

    /// Window applied to each frame before the FFT
    /// (default: Blackman-Harris 62 dB)
    pub window: WindowKind,

    /// Maximum spectral peaks retained per frame (default: 100)
    pub max_num_peaks: usize,

    /// Half-width, in semitones, of the weighting window used when folding
    /// a peak into the pitch-class profile (default: 0.5)
    pub window_size: f64,
}

impl Default for KeyDetectionConfig {
    fn default() -> Self {
        Self {
            profile_type: "Bgate".to_string(),
            use_polyphony: true,
            use_three_chords: true,
            num_harmonics: 4,
            slope: 0.6,
            use_maj_min: false,
            pcp_size: 36,
            frame_size: 4096,
            hop_size: 512,
            window: WindowKind::BlackmanHarris62,
            max_num_peaks: 100,
            window_size: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KeyDetectionConfig::default();
        assert_eq!(config.frame_size, 4096);
        assert_eq!(config.hop_size, 512);
        assert_eq!(config.pcp_size % 12, 0);
        assert_eq!(config.num_harmonics, 4);
    }
}
