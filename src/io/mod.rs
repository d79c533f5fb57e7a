//! Audio input: container decoding and the normalized PCM data model

pub mod mp3;
pub mod wav;

use crate::error::Result;
use std::path::Path;

pub use mp3::{decode_mp3, Mp3Metadata};
pub use wav::{decode_wav, decode_wav_file};

/// Decoded, normalized PCM audio
///
/// `samples[c][i]` is the i-th sample of channel `c`, normalized to
/// `[-1.0, +1.0]`. All channel vectors have equal length. Decoders are the
/// only producers; the struct is treated as immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmAudio {
    /// Samples per second
    pub sample_rate: u32,

    /// Bits per sample in the source container (8, 16 or 24 for WAV,
    /// 16 for MP3)
    pub bit_depth: u8,

    /// Channel count (1 or 2)
    pub channels: u8,

    /// De-interleaved normalized samples, one vector per channel
    pub samples: Vec<Vec<f64>>,
}

impl PcmAudio {
    /// Number of samples in each channel
    pub fn samples_per_channel(&self) -> usize {
        self.samples.first().map_or(0, Vec::len)
    }

    /// Duration of the recording in seconds
    pub fn length_in_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples_per_channel() as f64 / self.sample_rate as f64
    }

    /// True for single-channel audio
    pub fn is_mono(&self) -> bool {
        self.channels == 1
    }

    /// True for two-channel audio
    pub fn is_stereo(&self) -> bool {
        self.channels == 2
    }

    /// Channel-interleaved copy of the samples (L R L R ... for stereo)
    pub fn interleaved(&self) -> Vec<f64> {
        let per_channel = self.samples_per_channel();
        let mut out = Vec::with_capacity(per_channel * self.samples.len());
        for i in 0..per_channel {
            for channel in &self.samples {
                out.push(channel[i]);
            }
        }
        out
    }
}

/// Read a whole audio file into memory
///
/// Convenience wrapper used by the path-based decode entry points; the
/// decoders themselves operate on byte slices.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`](crate::AnalysisError::Io) if the file
/// cannot be opened or read.
pub fn load_audio_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    log::debug!("Loading audio file: {}", path.display());
    Ok(std::fs::read(path)?)
}
