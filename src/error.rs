use thiserror::Error;

use crate::engine::EngineState;

/// Frame validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("Empty audio frame")]
    Empty,
    #[error("Unsupported sample rate: {rate} Hz (supported {min}-{max} Hz)")]
    UnsupportedSampleRate { rate: u32, min: u32, max: u32 },
    #[error("Non-finite sample at index {0}")]
    NonFiniteSample(usize),
    #[error("Sample rate changed mid-session: expected {expected} Hz, got {actual} Hz")]
    SampleRateMismatch { expected: u32, actual: u32 },
    #[error("Frame has {actual} samples, expected {expected}")]
    FrameSizeMismatch { expected: usize, actual: usize },
}

/// Screening engine errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Invalid frame: {0}")]
    Frame(#[from] FrameError),
    #[error("Invalid state transition: cannot {action} while {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: EngineState,
    },
    #[error("Insufficient signal: no frame exceeded the energy floor, please retry the recording")]
    InsufficientSignal,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Screening worker disconnected")]
    WorkerDisconnected,
}
