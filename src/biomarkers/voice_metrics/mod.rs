//! Voice metrics: Pitch/Energy and Stability
//!
//! - **Pitch & energy** (per frame):
//!   RMS loudness and F0 via normalized autocorrelation, with a magnitude
//!   spectrum peak as fallback when the autocorrelation is inconclusive.
//!
//! - **Stability** (across frames):
//!   Rolling pitch history yielding relative jitter (pitch perturbation) and
//!   a 0-1 stability score.

mod pitch;
mod stability;

pub use pitch::{estimate, rms, ENERGY_FLOOR, MAX_PITCH_HZ, MIN_PITCH_HZ};
pub use stability::{
    pitch_spread, pitch_stability, relative_jitter, PitchTracker, MIN_JITTER_SAMPLES,
};
