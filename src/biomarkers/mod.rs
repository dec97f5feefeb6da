//! Biomarker Analysis Module
//!
//! Extracts vocal biomarkers from a recording session and turns them into a
//! screening report.
//!
//! ## Components
//!
//! - **Pitch & energy** - per-frame RMS and F0 (autocorrelation, spectral fallback)
//! - **Stability** - rolling pitch history, relative jitter and stability score
//! - **Session metrics** - peak values across the session
//! - **Clinical** - findings, per-condition risk, voice profile, recommendations
//!
//! ## Architecture
//!
//! ```text
//!    AudioFrame (per frame)
//!          |
//!          v
//!   voice_metrics::estimate ──> FrameEstimate
//!          |
//!          v
//!   SessionAggregator ──> LiveMetrics (live display)
//!   (PitchTracker)
//!          |
//!     session end
//!          v
//!   SessionOutcome::Measured(SessionAggregate)
//!          |
//!    ┌─────┼──────────┐
//!    v     v          v
//! generate assess  profile
//!    └─────┼──────────┘
//!          v
//!      recommend ──> AnalysisResult
//! ```

pub mod clinical;
mod report;
pub mod session_metrics;
pub mod voice_metrics;

use serde::{Deserialize, Serialize};

use clinical::{ClinicalFinding, DiseaseRiskAssessment, VoiceCharacteristics};

pub use report::analyze;
pub use session_metrics::SessionAggregator;
pub use voice_metrics::{estimate, PitchTracker};

/// Per-frame estimate from the pitch & energy estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameEstimate {
    /// Root-mean-square amplitude of the frame
    pub rms: f64,
    /// Fundamental frequency, `None` when no reliable periodicity was found
    pub pitch_hz: Option<f64>,
}

/// Live metrics emitted once per frame for real-time display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiveMetrics {
    pub rms: f64,
    /// RMS level in dBFS (0 = full scale)
    pub rms_db: f64,
    pub pitch_hz: Option<f64>,
    /// Relative jitter over the current pitch history, once enough pitches exist
    pub jitter: Option<f64>,
}

/// Whether an aggregate was measured or substituted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Measured,
    /// Fixed stand-in values used when a session captured no usable signal
    Placeholder,
}

/// Frozen summary of one recording session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAggregate {
    /// Highest frame RMS observed
    pub peak_rms: f64,
    /// Highest accepted pitch in Hz
    pub peak_pitch_hz: Option<f64>,
    /// Highest relative jitter reported by the stability tracker
    pub peak_jitter: Option<f64>,
    /// Pitch history at session end (oldest first)
    pub pitch_history: Vec<f64>,
    /// Frames observed during the session
    pub frames_observed: u32,
    /// Frames with an accepted pitch
    pub voiced_frames: u32,
    /// Audio time covered by the session
    pub duration_ms: u64,
    pub provenance: Provenance,
}

impl SessionAggregate {
    /// Measured aggregate with the three peak features and no history
    pub fn new(peak_rms: f64, peak_pitch_hz: Option<f64>, peak_jitter: Option<f64>) -> Self {
        Self {
            peak_rms,
            peak_pitch_hz,
            peak_jitter,
            pitch_history: Vec::new(),
            frames_observed: 0,
            voiced_frames: 0,
            duration_ms: 0,
            provenance: Provenance::Measured,
        }
    }

    pub fn with_pitch_history(mut self, history: Vec<f64>) -> Self {
        self.pitch_history = history;
        self
    }

    /// Fixed, plausible stand-in for a session with no usable audio.
    ///
    /// Flagged `Provenance::Placeholder`; every report built from it carries
    /// that flag and a retry notice.
    pub fn placeholder() -> Self {
        const CONTOUR: [f64; 12] = [0.0, 1.5, -1.0, 2.0, 0.5, -1.5, 1.0, -0.5, 2.5, -2.0, 0.5, 1.0];
        Self {
            peak_rms: 0.06,
            peak_pitch_hz: Some(165.0),
            peak_jitter: Some(0.03),
            pitch_history: CONTOUR.iter().map(|d| 160.0 + d).collect(),
            frames_observed: 0,
            voiced_frames: 0,
            duration_ms: 0,
            provenance: Provenance::Placeholder,
        }
    }

    /// Fraction of observed frames that were voiced
    pub fn voiced_ratio(&self) -> Option<f64> {
        if self.frames_observed == 0 {
            return None;
        }
        Some(self.voiced_frames as f64 / self.frames_observed as f64)
    }

    /// Pitch stability of the frozen history (`None` with fewer than two pitches)
    pub fn stability(&self) -> Option<f64> {
        voice_metrics::pitch_stability(&self.pitch_history)
    }

    pub fn is_placeholder(&self) -> bool {
        self.provenance == Provenance::Placeholder
    }
}

/// Result of finishing a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionOutcome {
    Measured(SessionAggregate),
    /// No frame exceeded the energy floor
    Insufficient { frames_observed: u32 },
}

impl SessionOutcome {
    pub fn is_measured(&self) -> bool {
        matches!(self, Self::Measured(_))
    }
}

/// Overall screening risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OverallRisk {
    Low,
    Medium,
    High,
}

/// Complete end-of-session analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub aggregate: SessionAggregate,
    pub findings: Vec<ClinicalFinding>,
    pub risk_assessments: Vec<DiseaseRiskAssessment>,
    pub characteristics: VoiceCharacteristics,
    /// 0-100, higher is healthier
    pub quality_score: f64,
    pub risk_level: OverallRisk,
    pub recommendations: Vec<String>,
    pub provenance: Provenance,
}
