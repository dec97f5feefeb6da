//! Clinical interpretation of a frozen session aggregate
//!
//! Every stage here is a pure function: the same aggregate always yields the
//! same findings, assessments, profile and recommendations.

mod findings;
mod profile;
mod recommendations;
mod risk;
pub mod thresholds;

use serde::{Deserialize, Serialize};

use super::voice_metrics::pitch_spread;
use super::SessionAggregate;

pub use findings::{generate, generate_features};
pub use profile::{profile, Articulation, Prosody, VoiceCharacteristics, VoiceQuality};
pub use recommendations::{recommend, DISCLAIMERS};
pub use risk::{
    assess, assess_features, COGNITIVE_DECLINE, LARYNGEAL_PATHOLOGY, MOVEMENT_DISORDER,
};

/// Acoustic features the rules read, each absent when not measured
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceFeatures {
    pub rms: Option<f64>,
    pub pitch_hz: Option<f64>,
    pub jitter: Option<f64>,
    /// Stability score of the pitch history (0-1)
    pub stability: Option<f64>,
    /// Standard deviation of the pitch history (Hz)
    pub pitch_spread: Option<f64>,
    pub voiced_ratio: Option<f64>,
}

impl VoiceFeatures {
    /// Extract the rule inputs. A zero peak RMS means nothing was measured.
    pub fn from_aggregate(aggregate: &SessionAggregate) -> Self {
        Self {
            rms: (aggregate.peak_rms > 0.0).then_some(aggregate.peak_rms),
            pitch_hz: aggregate.peak_pitch_hz,
            jitter: aggregate.peak_jitter,
            stability: aggregate.stability(),
            pitch_spread: pitch_spread(&aggregate.pitch_history),
            voiced_ratio: aggregate.voiced_ratio(),
        }
    }
}

/// Where a feature sits relative to its normal range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindingStatus {
    Normal,
    Borderline,
    Abnormal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Normal,
    Mild,
    Moderate,
    Severe,
}

/// One interpreted acoustic feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalFinding {
    pub category: String,
    pub statement: String,
    pub status: FindingStatus,
    pub severity: Severity,
    pub clinical_significance: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

/// Risk estimate for one condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseRiskAssessment {
    pub condition: String,
    pub risk_level: RiskLevel,
    /// Clamped to 0-1
    pub confidence: f64,
    pub indicators: Vec<String>,
    pub symptoms: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rms_is_absent() {
        let features = VoiceFeatures::from_aggregate(&SessionAggregate::new(0.0, None, None));
        assert_eq!(features, VoiceFeatures::default());
    }

    #[test]
    fn test_features_from_history() {
        let agg = SessionAggregate::new(0.05, Some(150.0), Some(0.04))
            .with_pitch_history(vec![140.0, 160.0, 140.0, 160.0]);
        let features = VoiceFeatures::from_aggregate(&agg);
        assert_eq!(features.rms, Some(0.05));
        assert_eq!(features.pitch_spread, Some(10.0));
        assert!((features.stability.unwrap() - 0.8).abs() < 1e-12);
        assert!(features.voiced_ratio.is_none());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Severe > Severity::Moderate);
        assert!(Severity::Mild > Severity::Normal);
    }
}
