//! Channel mixing (multi-channel to mono)

/// Mix N channels down to one by averaging
///
/// `output[i] = (sum over channels of samples[c][i]) / channel_count`.
/// Decoder output always has equal-length channels; if lengths differ the
/// mix stops at the shortest channel.
///
/// # Arguments
///
/// * `samples` - De-interleaved channels, one vector per channel
///
/// # Returns
///
/// Mono samples; empty input yields an empty vector
pub fn mono_mixer(samples: &[Vec<f64>]) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }

    let len = samples.iter().map(Vec::len).min().unwrap_or(0);
    let scale = 1.0 / samples.len() as f64;

    log::debug!("Mixing {} channels of {} samples to mono", samples.len(), len);

    (0..len)
        .map(|i| samples.iter().map(|channel| channel[i]).sum::<f64>() * scale)
        .collect()
}
