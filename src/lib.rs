//! Voice biomarker screening engine
//!
//! Turns short windows of raw audio into live pitch/energy metrics and, at the
//! end of a fixed-duration recording, into clinical findings, per-condition
//! risk assessments, a voice-characteristic profile and recommendations.
//!
//! ```text
//!   AudioFrame ──> estimate() ──> SessionAggregator ──> SessionOutcome
//!                                  (PitchTracker)            |
//!                                                            v
//!                                  generate / assess / profile (pure)
//!                                                            |
//!                                                            v
//!                                                  recommend ──> AnalysisResult
//! ```

pub mod biomarkers;
pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod wav;
pub mod worker;

pub use biomarkers::{
    analyze, AnalysisResult, FrameEstimate, LiveMetrics, Provenance, SessionAggregate,
    SessionOutcome,
};
pub use config::{EngineConfig, InsufficientSignalPolicy};
pub use engine::{EngineState, FrameUpdate, ScreeningEngine, ScreeningReport};
pub use error::{EngineError, FrameError};
pub use frame::{AudioFrame, FrameSplitter};
pub use worker::{start_screening_thread, ScreeningHandle, ScreeningInput, ScreeningOutput};
