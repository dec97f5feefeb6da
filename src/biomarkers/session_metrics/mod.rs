//! Session metrics aggregation
//!
//! Tracks session-level peaks from per-frame estimates:
//! - Peak RMS energy
//! - Peak accepted pitch
//! - Peak relative jitter from the rolling pitch history
//! - Frame and voiced-frame counts, audio clock
//!
//! Peaks are used instead of averages: voiced/unvoiced detection is sparse
//! and noisy, so silent frames would otherwise dilute the loud, clearly
//! voiced frames that carry the clinical information.

use tracing::debug;

use super::voice_metrics::{PitchTracker, ENERGY_FLOOR};
use super::{FrameEstimate, LiveMetrics, Provenance, SessionAggregate, SessionOutcome};

/// Floor for the dBFS conversion of silent frames
const MIN_DB: f64 = -100.0;

/// Aggregates one recording session
pub struct SessionAggregator {
    tracker: PitchTracker,
    peak_rms: f64,
    peak_pitch_hz: Option<f64>,
    peak_jitter: Option<f64>,
    frames_observed: u32,
    voiced_frames: u32,
    /// Frames at or above the energy floor
    frames_with_signal: u32,
    /// Audio clock in milliseconds
    audio_clock_ms: f64,
}

impl SessionAggregator {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            tracker: PitchTracker::new(history_capacity),
            peak_rms: 0.0,
            peak_pitch_hz: None,
            peak_jitter: None,
            frames_observed: 0,
            voiced_frames: 0,
            frames_with_signal: 0,
            audio_clock_ms: 0.0,
        }
    }

    /// Zero all peaks and clear the pitch history for a new session
    pub fn start(&mut self) {
        self.tracker.reset();
        self.peak_rms = 0.0;
        self.peak_pitch_hz = None;
        self.peak_jitter = None;
        self.frames_observed = 0;
        self.voiced_frames = 0;
        self.frames_with_signal = 0;
        self.audio_clock_ms = 0.0;
    }

    /// Fold one frame estimate into the session and return its live metrics
    pub fn observe(&mut self, estimate: &FrameEstimate) -> LiveMetrics {
        self.frames_observed += 1;
        self.peak_rms = self.peak_rms.max(estimate.rms);
        if estimate.rms >= ENERGY_FLOOR {
            self.frames_with_signal += 1;
        }

        let mut jitter = None;
        if let Some(pitch) = estimate.pitch_hz {
            self.voiced_frames += 1;
            self.tracker.accept(pitch);
            self.peak_pitch_hz = Some(self.peak_pitch_hz.map_or(pitch, |p| p.max(pitch)));

            jitter = self.tracker.jitter();
            if let Some(j) = jitter {
                self.peak_jitter = Some(self.peak_jitter.map_or(j, |p| p.max(j)));
            }
        }

        let rms_db = if estimate.rms > 0.0 {
            (20.0 * estimate.rms.log10()).max(MIN_DB)
        } else {
            MIN_DB
        };

        LiveMetrics {
            rms: estimate.rms,
            rms_db,
            pitch_hz: estimate.pitch_hz,
            jitter,
        }
    }

    /// Advance the audio clock by one frame's duration
    pub fn advance_audio_clock(&mut self, ms: f64) {
        self.audio_clock_ms += ms;
    }

    pub fn audio_clock_ms(&self) -> f64 {
        self.audio_clock_ms
    }

    pub fn frames_observed(&self) -> u32 {
        self.frames_observed
    }

    /// Current stability score of the pitch history
    pub fn stability(&self) -> f64 {
        self.tracker.stability()
    }

    /// Freeze the session.
    ///
    /// A session in which no frame reached the energy floor is reported as
    /// `Insufficient` rather than as an all-zero aggregate.
    pub fn finish(&self) -> SessionOutcome {
        if self.frames_with_signal == 0 || self.peak_rms <= 0.0 {
            debug!(
                "Session insufficient: {} frames, none above the energy floor",
                self.frames_observed
            );
            return SessionOutcome::Insufficient {
                frames_observed: self.frames_observed,
            };
        }

        SessionOutcome::Measured(SessionAggregate {
            peak_rms: self.peak_rms,
            peak_pitch_hz: self.peak_pitch_hz,
            peak_jitter: self.peak_jitter,
            pitch_history: self.tracker.snapshot(),
            frames_observed: self.frames_observed,
            voiced_frames: self.voiced_frames,
            duration_ms: self.audio_clock_ms.round() as u64,
            provenance: Provenance::Measured,
        })
    }
}
