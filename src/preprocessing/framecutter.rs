//! Lazy frame iteration over a sample buffer
//!
//! [`Framecutter`] yields fixed-size frames advanced by a hop, either
//! starting at the buffer's first sample (edge mode) or with the first frame
//! centered on it (centered mode, left half zero-padded). Frames reaching
//! past the buffer are zero-padded on the right. The iterator borrows the
//! buffer immutably and can be restarted; iteration state is just the next
//! frame's start index.

use crate::error::{AnalysisError, Result};

/// Iterator over fixed-size, hop-advanced frames of a signal
///
/// Termination rules:
/// - Edge mode: frames start at `0, hop, 2*hop, ...` while the start index
///   is inside the buffer, which yields `ceil(len / hop)` frames.
/// - Centered mode: the frame whose center index reaches the end of the
///   buffer is the last one produced.
/// - `last_frame_to_end_of_file` extends centered iteration until the frame
///   lies entirely past the end.
///
/// A frame with fewer than `valid_frame_threshold_ratio * frame_size`
/// samples drawn from the buffer is skipped (ratio 0 disables the filter).
#[derive(Debug, Clone)]
pub struct Framecutter<'a> {
    buffer: &'a [f64],
    frame_size: usize,
    hop_size: usize,
    start_from_center: bool,
    last_frame_to_end_of_file: bool,
    valid_frame_threshold_ratio: f64,
    position: i64,
    done: bool,
}

impl<'a> Framecutter<'a> {
    /// Create an edge-mode frame iterator
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidArgument`] if `frame_size` or
    /// `hop_size` is zero.
    pub fn new(buffer: &'a [f64], frame_size: usize, hop_size: usize) -> Result<Self> {
        Self::with_options(buffer, frame_size, hop_size, false, false, 0.0)
    }

    /// Create a frame iterator with full control over the edge policy
    ///
    /// # Arguments
    ///
    /// * `buffer` - Signal to cut; borrowed for the iterator's lifetime
    /// * `frame_size` - Length of every yielded frame
    /// * `hop_size` - Advance between consecutive frames
    /// * `start_from_center` - Center the first frame on buffer sample 0
    /// * `last_frame_to_end_of_file` - Keep producing frames until the frame
    ///   lies entirely past the buffer end
    /// * `valid_frame_threshold_ratio` - Minimum fraction of real (non-pad)
    ///   samples a frame must contain to be yielded, in `[0, 1]`
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidArgument`] for a zero frame or hop
    /// size, or a threshold ratio outside `[0, 1]`.
    pub fn with_options(
        buffer: &'a [f64],
        frame_size: usize,
        hop_size: usize,
        start_from_center: bool,
        last_frame_to_end_of_file: bool,
        valid_frame_threshold_ratio: f64,
    ) -> Result<Self> {
        if frame_size == 0 {
            return Err(AnalysisError::InvalidArgument(
                "frame size must be > 0".to_string(),
            ));
        }
        if hop_size == 0 {
            return Err(AnalysisError::InvalidArgument(
                "hop size must be > 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&valid_frame_threshold_ratio) {
            return Err(AnalysisError::InvalidArgument(format!(
                "valid frame threshold ratio {} outside [0, 1]",
                valid_frame_threshold_ratio
            )));
        }

        let mut cutter = Self {
            buffer,
            frame_size,
            hop_size,
            start_from_center,
            last_frame_to_end_of_file,
            valid_frame_threshold_ratio,
            position: 0,
            done: false,
        };
        cutter.restart();
        Ok(cutter)
    }

    /// Reset iteration to the first frame
    pub fn restart(&mut self) {
        self.position = if self.start_from_center {
            -(self.half_frame() as i64)
        } else {
            0
        };
        self.done = false;
    }

    /// Index of the frame slot holding the frame's center sample
    fn half_frame(&self) -> usize {
        (self.frame_size + 1) / 2
    }
}

impl Iterator for Framecutter<'_> {
    type Item = Vec<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.buffer.len() as i64;

        loop {
            if self.done || self.buffer.is_empty() {
                self.done = true;
                return None;
            }

            let start = self.position;
            if start >= len {
                self.done = true;
                return None;
            }

            let mut frame = vec![0.0; self.frame_size];
            let mut valid = 0usize;
            for (j, slot) in frame.iter_mut().enumerate() {
                let idx = start + j as i64;
                if (0..len).contains(&idx) {
                    *slot = self.buffer[idx as usize];
                    valid += 1;
                }
            }

            self.position += self.hop_size as i64;

            // In centered mode the frame whose center reaches the end of the
            // buffer closes the sequence (unless extended to end of file).
            if self.start_from_center && !self.last_frame_to_end_of_file {
                let center = start + self.half_frame() as i64;
                if center >= len {
                    self.done = true;
                }
            }

            if (valid as f64) < self.valid_frame_threshold_ratio * self.frame_size as f64 {
                continue;
            }

            return Some(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<f64> {
        (0..len).map(|i| i as f64).collect()
    }

    #[test]
    fn test_empty_buffer() {
        let buffer: Vec<f64> = Vec::new();
        let mut cutter = Framecutter::new(&buffer, 100, 60).unwrap();
        assert!(cutter.next().is_none());

        let mut centered = Framecutter::with_options(&buffer, 100, 60, true, false, 0.0).unwrap();
        assert!(centered.next().is_none());
    }

    #[test]
    fn test_zero_sizes_rejected() {
        let buffer = vec![0.0; 10];
        assert!(Framecutter::new(&buffer, 0, 60).is_err());
        assert!(Framecutter::new(&buffer, 100, 0).is_err());
        assert!(Framecutter::with_options(&buffer, 100, 60, false, false, 1.5).is_err());
    }

    #[test]
    fn test_single_sample_edge() {
        let buffer = vec![23.0];
        let mut cutter = Framecutter::new(&buffer, 100, 60).unwrap();

        let frame = cutter.next().unwrap();
        assert_eq!(frame.len(), 100);
        assert_eq!(frame[0], 23.0);
        assert!(frame[1..].iter().all(|&x| x == 0.0));
        assert!(cutter.next().is_none());
    }

    #[test]
    fn test_single_sample_centered() {
        let buffer = vec![23.0];
        let mut cutter = Framecutter::with_options(&buffer, 100, 60, true, false, 0.0).unwrap();

        let frame = cutter.next().unwrap();
        assert_eq!(frame[50], 23.0);
        assert_eq!(frame.iter().filter(|&&x| x != 0.0).count(), 1);
    }

    #[test]
    fn test_single_sample_centered_odd_frame() {
        let buffer = vec![23.0];
        let mut cutter = Framecutter::with_options(&buffer, 101, 60, true, false, 0.0).unwrap();

        let frame = cutter.next().unwrap();
        assert_eq!(frame[51], 23.0);
    }

    #[test]
    fn test_full_frame_edge() {
        let buffer = ramp(100);
        let mut cutter = Framecutter::new(&buffer, 100, 60).unwrap();

        let frame = cutter.next().unwrap();
        assert_eq!(frame, ramp(100));
    }

    #[test]
    fn test_tail_zero_padding() {
        let buffer = ramp(100);
        let mut cutter = Framecutter::new(&buffer, 101, 60).unwrap();

        let frame = cutter.next().unwrap();
        assert_eq!(frame[..100], ramp(100)[..]);
        assert_eq!(frame[100], 0.0);
    }

    #[test]
    fn test_edge_mode_frame_count() {
        // ceil(len / hop) frames in edge mode
        let buffer = ramp(100);
        let frames: Vec<_> = Framecutter::new(&buffer, 100, 60).unwrap().collect();
        assert_eq!(frames.len(), 2);

        assert_eq!(frames[1][..40], ramp(100)[60..]);
        assert!(frames[1][40..].iter().all(|&x| x == 0.0));

        let frames: Vec<_> = Framecutter::new(&buffer, 20, 40).unwrap().collect();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2][..20], ramp(100)[80..]);
    }

    #[test]
    fn test_centered_frames_even_size() {
        let buffer = ramp(100);
        let frames: Vec<_> = Framecutter::with_options(&buffer, 100, 60, true, false, 0.0)
            .unwrap()
            .collect();
        assert_eq!(frames.len(), 3);

        // First frame: left half padded, samples 0..50 in the right half
        assert!(frames[0][..50].iter().all(|&x| x == 0.0));
        assert_eq!(frames[0][50..], ramp(50)[..]);

        // Second frame: samples 10..100 then padding
        assert_eq!(frames[1][..90], buffer[10..100]);
        assert!(frames[1][90..].iter().all(|&x| x == 0.0));

        // Third frame: samples 70..100 then padding
        assert_eq!(frames[2][..30], buffer[70..100]);
        assert!(frames[2][30..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_centered_frames_odd_size() {
        let buffer = ramp(100);
        let frames: Vec<_> = Framecutter::with_options(&buffer, 101, 60, true, false, 0.0)
            .unwrap()
            .collect();
        assert_eq!(frames.len(), 3);

        assert!(frames[0][..51].iter().all(|&x| x == 0.0));
        assert_eq!(frames[0][51..], ramp(50)[..]);

        assert_eq!(frames[1][..91], buffer[9..100]);
        assert_eq!(frames[2][..31], buffer[69..100]);
    }

    #[test]
    fn test_last_frame_to_end_of_file_extends() {
        let buffer = ramp(100);
        let default_count = Framecutter::with_options(&buffer, 100, 35, true, false, 0.0)
            .unwrap()
            .count();
        let extended: Vec<_> = Framecutter::with_options(&buffer, 100, 35, true, true, 0.0)
            .unwrap()
            .collect();

        // Extended mode keeps going while the frame still overlaps the buffer
        assert!(extended.len() > default_count);
        let last = extended.last().unwrap();
        assert!(last.iter().any(|&x| x != 0.0));
    }

    #[test]
    fn test_valid_frame_threshold_skips_padded_tail() {
        let buffer = ramp(100);
        let frames: Vec<_> = Framecutter::with_options(&buffer, 100, 60, false, false, 0.5)
            .unwrap()
            .collect();

        // Second frame has only 40 real samples out of 100 and is dropped
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0], ramp(100));
    }

    #[test]
    fn test_restart_replays_sequence() {
        let buffer = ramp(100);
        let mut cutter = Framecutter::new(&buffer, 20, 40).unwrap();
        let first_pass: Vec<_> = cutter.by_ref().collect();
        assert!(cutter.next().is_none());

        cutter.restart();
        let second_pass: Vec<_> = cutter.collect();
        assert_eq!(first_pass, second_pass);
    }
}
