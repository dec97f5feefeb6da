//! Frame buffer adapter
//!
//! An `AudioFrame` is a fixed window of mono samples in roughly [-1, 1] plus
//! the rate they were captured at. Frames are validated once on construction
//! and are immutable afterwards.

use crate::error::FrameError;

/// One analysis window of mono audio
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFrame {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioFrame {
    /// Build a frame, rejecting empty buffers, a zero rate and NaN/inf samples
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, FrameError> {
        if samples.is_empty() {
            return Err(FrameError::Empty);
        }
        if sample_rate == 0 {
            return Err(FrameError::UnsupportedSampleRate {
                rate: 0,
                min: 1,
                max: u32::MAX,
            });
        }
        if let Some(idx) = samples.iter().position(|s| !s.is_finite()) {
            return Err(FrameError::NonFiniteSample(idx));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Frame duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        self.samples.len() as f64 * 1000.0 / self.sample_rate as f64
    }

    /// Check the rate against an accepted range
    pub fn check_sample_rate(&self, min: u32, max: u32) -> Result<(), FrameError> {
        if self.sample_rate < min || self.sample_rate > max {
            return Err(FrameError::UnsupportedSampleRate {
                rate: self.sample_rate,
                min,
                max,
            });
        }
        Ok(())
    }
}

/// Splits a longer buffer into consecutive fixed-size frames.
///
/// A trailing partial frame is dropped rather than padded, so every frame
/// carries the same amount of audio.
pub struct FrameSplitter<'a> {
    samples: &'a [f32],
    sample_rate: u32,
    frame_size: usize,
    position: usize,
}

impl<'a> FrameSplitter<'a> {
    pub fn new(samples: &'a [f32], sample_rate: u32, frame_size: usize) -> Self {
        Self {
            samples,
            sample_rate,
            frame_size,
            position: 0,
        }
    }

    /// Number of whole frames in the buffer
    pub fn frame_count(&self) -> usize {
        if self.frame_size == 0 {
            0
        } else {
            self.samples.len() / self.frame_size
        }
    }
}

impl Iterator for FrameSplitter<'_> {
    type Item = Result<AudioFrame, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.frame_size == 0 || self.position + self.frame_size > self.samples.len() {
            return None;
        }
        let chunk = &self.samples[self.position..self.position + self.frame_size];
        self.position += self.frame_size;
        Some(AudioFrame::new(chunk.to_vec(), self.sample_rate))
    }
}
