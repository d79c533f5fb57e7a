//! MP3 decoding adapter
//!
//! Wraps the external minimp3 frame decoder and reshapes its interleaved
//! `i16` output into the same [`PcmAudio`] form the WAV decoder produces.
//! Samples are normalized by `2^15`; per-frame bitrates are averaged into
//! [`Mp3Metadata::avg_bitrate_kbps`].

use crate::error::{AnalysisError, Result};
use crate::io::PcmAudio;
use minimp3::{Decoder, Error as Mp3Error, Frame};
use std::fs::File;
use std::path::Path;

/// Stream-level metadata gathered while decoding an MP3 file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mp3Metadata {
    /// Average bitrate across all decoded frames, in kbit/s
    pub avg_bitrate_kbps: u32,
}

const I16_SCALE: f64 = 32768.0;

/// Decode an MP3 file into normalized PCM
///
/// # Arguments
///
/// * `path` - Path to the MP3 file
///
/// # Returns
///
/// `(PcmAudio, Mp3Metadata)` with de-interleaved samples normalized to
/// `[-1.0, +1.0)` and the average stream bitrate
///
/// # Errors
///
/// Returns [`AnalysisError::Io`](crate::AnalysisError::Io) if the file cannot
/// be opened, [`AnalysisError::DecodeFailure`] if the decoder rejects the
/// stream, and [`AnalysisError::InvalidFormat`] if the stream holds no
/// decodable frames or an unsupported channel count.
pub fn decode_mp3<P: AsRef<Path>>(path: P) -> Result<(PcmAudio, Mp3Metadata)> {
    let path = path.as_ref();
    log::debug!("Decoding MP3 file: {}", path.display());

    let mut decoder = Decoder::new(File::open(path)?);

    let mut sample_rate: u32 = 0;
    let mut channels: usize = 0;
    let mut interleaved: Vec<i16> = Vec::new();
    let mut bitrate_sum: u64 = 0;
    let mut frame_count: u64 = 0;

    loop {
        match decoder.next_frame() {
            Ok(Frame {
                data,
                sample_rate: frame_rate,
                channels: frame_channels,
                bitrate,
                ..
            }) => {
                if frame_count == 0 {
                    sample_rate = frame_rate as u32;
                    channels = frame_channels;
                }
                interleaved.extend_from_slice(&data);
                bitrate_sum += bitrate.max(0) as u64;
                frame_count += 1;
            }
            Err(Mp3Error::Eof) => break,
            Err(err) => {
                return Err(AnalysisError::DecodeFailure(format!(
                    "mp3 decoder error: {:?}",
                    err
                )))
            }
        }
    }

    if frame_count == 0 || interleaved.is_empty() {
        return Err(AnalysisError::InvalidFormat(
            "no decodable MP3 frames".to_string(),
        ));
    }
    if channels == 0 || channels > 2 {
        return Err(AnalysisError::InvalidFormat(format!(
            "unsupported MP3 channel count {}",
            channels
        )));
    }

    let samples_per_channel = interleaved.len() / channels;
    let mut samples: Vec<Vec<f64>> = (0..channels)
        .map(|_| Vec::with_capacity(samples_per_channel))
        .collect();

    for (i, &value) in interleaved.iter().enumerate() {
        samples[i % channels].push(value as f64 / I16_SCALE);
    }

    let metadata = Mp3Metadata {
        avg_bitrate_kbps: (bitrate_sum / frame_count) as u32,
    };

    log::debug!(
        "Decoded MP3: {} Hz, {} channels, {} samples/channel, ~{} kbps",
        sample_rate,
        channels,
        samples_per_channel,
        metadata.avg_bitrate_kbps
    );

    Ok((
        PcmAudio {
            sample_rate,
            bit_depth: 16,
            channels: channels as u8,
            samples,
        },
        metadata,
    ))
}
