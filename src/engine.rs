//! Screening engine
//!
//! Owns one recording session at a time and drives it through
//! `Idle -> Recording -> Analyzing -> Idle`. Frames are processed
//! synchronously; the session ends either on an explicit `stop()` or once
//! the configured duration of audio has been observed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::biomarkers::{
    analyze, estimate, AnalysisResult, LiveMetrics, SessionAggregate, SessionAggregator,
    SessionOutcome,
};
use crate::config::{EngineConfig, InsufficientSignalPolicy};
use crate::error::{EngineError, FrameError};
use crate::frame::AudioFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    Idle,
    Recording,
    Analyzing,
}

/// Result of processing one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameUpdate {
    pub metrics: LiveMetrics,
    /// The configured session duration was reached with this frame
    pub session_complete: bool,
}

/// Analysis result for one completed session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub session_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub result: AnalysisResult,
}

pub struct ScreeningEngine {
    config: EngineConfig,
    state: EngineState,
    aggregator: SessionAggregator,
    /// Rate of the first frame of the session; later frames must match
    sample_rate: Option<u32>,
    samples_observed: u64,
    session_id: Option<Uuid>,
}

impl ScreeningEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            aggregator: SessionAggregator::new(config.pitch_history_capacity),
            config,
            state: EngineState::Idle,
            sample_rate: None,
            samples_observed: 0,
            session_id: None,
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// ID of the current (or last) session
    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    /// Audio time observed in the current session
    pub fn elapsed_ms(&self) -> f64 {
        self.aggregator.audio_clock_ms()
    }

    /// Begin a new session, discarding everything from the previous one
    pub fn start(&mut self) -> Result<Uuid, EngineError> {
        if self.state != EngineState::Idle {
            return Err(EngineError::InvalidTransition {
                action: "start",
                state: self.state,
            });
        }

        let session_id = Uuid::new_v4();
        info!("Session {} transitioning to Recording", session_id);
        self.aggregator.start();
        self.sample_rate = None;
        self.samples_observed = 0;
        self.session_id = Some(session_id);
        self.state = EngineState::Recording;
        Ok(session_id)
    }

    /// Estimate one frame and fold it into the session.
    ///
    /// Frames must hold exactly `frame_size` samples at one supported rate.
    /// Malformed frames are rejected without touching the session.
    pub fn process_frame(&mut self, frame: &AudioFrame) -> Result<FrameUpdate, EngineError> {
        if self.state != EngineState::Recording {
            return Err(EngineError::InvalidTransition {
                action: "process a frame",
                state: self.state,
            });
        }

        frame.check_sample_rate(self.config.min_sample_rate, self.config.max_sample_rate)?;
        let sample_rate = *self.sample_rate.get_or_insert(frame.sample_rate());
        if sample_rate != frame.sample_rate() {
            return Err(FrameError::SampleRateMismatch {
                expected: sample_rate,
                actual: frame.sample_rate(),
            }
            .into());
        }

        if frame.len() != self.config.frame_size {
            return Err(FrameError::FrameSizeMismatch {
                expected: self.config.frame_size,
                actual: frame.len(),
            }
            .into());
        }

        let frame_estimate = estimate(frame);
        let metrics = self.aggregator.observe(&frame_estimate);
        self.aggregator.advance_audio_clock(frame.duration_ms());
        self.samples_observed += frame.len() as u64;

        let session_complete = self.samples_observed >= self.config.session_samples(sample_rate);
        if session_complete {
            info!(
                "Session duration reached after {} frames, transitioning to Analyzing",
                self.aggregator.frames_observed()
            );
            self.state = EngineState::Analyzing;
        }

        Ok(FrameUpdate {
            metrics,
            session_complete,
        })
    }

    /// End recording early; the frames seen so far form the session
    pub fn stop(&mut self) -> Result<(), EngineError> {
        if self.state != EngineState::Recording {
            return Err(EngineError::InvalidTransition {
                action: "stop",
                state: self.state,
            });
        }

        info!(
            "Session stopped after {:.0} ms of audio, transitioning to Analyzing",
            self.aggregator.audio_clock_ms()
        );
        self.state = EngineState::Analyzing;
        Ok(())
    }

    /// Analyze the finished session and return to `Idle`.
    ///
    /// The engine is back in `Idle` whether or not a report is produced.
    pub fn complete(&mut self) -> Result<ScreeningReport, EngineError> {
        if self.state != EngineState::Analyzing {
            return Err(EngineError::InvalidTransition {
                action: "complete",
                state: self.state,
            });
        }

        let outcome = self.aggregator.finish();
        self.state = EngineState::Idle;
        info!("Session transitioning to Idle");

        let aggregate = match outcome {
            SessionOutcome::Measured(aggregate) => aggregate,
            SessionOutcome::Insufficient { frames_observed } => {
                match self.config.insufficient_signal {
                    InsufficientSignalPolicy::Reject => {
                        warn!(
                            "No usable signal in {} frames, rejecting session",
                            frames_observed
                        );
                        return Err(EngineError::InsufficientSignal);
                    }
                    InsufficientSignalPolicy::Placeholder => {
                        warn!(
                            "No usable signal in {} frames, analyzing placeholder values",
                            frames_observed
                        );
                        SessionAggregate::placeholder()
                    }
                }
            }
        };

        let result = analyze(&aggregate);
        debug!(
            "Session analyzed: risk {:?}, quality {:.0}, {} findings",
            result.risk_level,
            result.quality_score,
            result.findings.len()
        );

        Ok(ScreeningReport {
            session_id: self.session_id.unwrap_or_else(Uuid::new_v4),
            completed_at: Utc::now(),
            result,
        })
    }
}
