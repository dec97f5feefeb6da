//! Disease risk assessor
//!
//! Three independent weighted rule sets over the same features. Each rule
//! that fires adds its weight to the condition's confidence and appends an
//! indicator and a symptom, in rule order, so identical input always yields
//! identical output.

use super::thresholds::*;
use super::{DiseaseRiskAssessment, RiskLevel, VoiceFeatures};
use crate::biomarkers::SessionAggregate;

pub const MOVEMENT_DISORDER: &str = "Movement Disorder (Parkinsonian)";
pub const COGNITIVE_DECLINE: &str = "Cognitive Decline";
pub const LARYNGEAL_PATHOLOGY: &str = "Laryngeal Pathology";

/// Confidence accumulator for one condition
struct RuleSet {
    condition: &'static str,
    confidence: f64,
    indicators: Vec<String>,
    symptoms: Vec<String>,
}

impl RuleSet {
    fn new(condition: &'static str) -> Self {
        Self {
            condition,
            confidence: 0.0,
            indicators: Vec::new(),
            symptoms: Vec::new(),
        }
    }

    fn apply(&mut self, fired: bool, weight: f64, indicator: &str, symptom: &str) {
        if fired {
            self.confidence += weight;
            self.indicators.push(indicator.to_string());
            self.symptoms.push(symptom.to_string());
        }
    }

    /// Clamp, band and drop conditions where nothing meaningful fired
    fn finish(self, high: f64, moderate: f64) -> Option<DiseaseRiskAssessment> {
        let confidence = self.confidence.clamp(0.0, 1.0);
        if confidence <= RISK_REPORT_FLOOR {
            return None;
        }

        let risk_level = if confidence > high {
            RiskLevel::High
        } else if confidence > moderate {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        };

        Some(DiseaseRiskAssessment {
            condition: self.condition.to_string(),
            risk_level,
            confidence,
            indicators: self.indicators,
            symptoms: self.symptoms,
        })
    }
}

fn below(value: Option<f64>, limit: f64) -> bool {
    value.is_some_and(|v| v < limit)
}

fn above(value: Option<f64>, limit: f64) -> bool {
    value.is_some_and(|v| v > limit)
}

/// Risk assessments for a frozen session aggregate
pub fn assess(aggregate: &SessionAggregate) -> Vec<DiseaseRiskAssessment> {
    assess_features(&VoiceFeatures::from_aggregate(aggregate))
}

/// Risk assessments for an extracted feature set
pub fn assess_features(features: &VoiceFeatures) -> Vec<DiseaseRiskAssessment> {
    [
        movement_disorder(features),
        cognitive_decline(features),
        laryngeal_pathology(features),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn movement_disorder(f: &VoiceFeatures) -> Option<DiseaseRiskAssessment> {
    let mut rules = RuleSet::new(MOVEMENT_DISORDER);
    rules.apply(
        below(f.rms, MOVEMENT_LOW_RMS),
        MOVEMENT_LOW_RMS_WEIGHT,
        "Reduced vocal loudness (hypophonia)",
        "Soft or fading voice",
    );
    rules.apply(
        above(f.jitter, MOVEMENT_HIGH_JITTER),
        MOVEMENT_HIGH_JITTER_WEIGHT,
        "Elevated pitch perturbation",
        "Voice tremor",
    );
    rules.apply(
        below(f.pitch_hz, MOVEMENT_LOW_PITCH),
        MOVEMENT_LOW_PITCH_WEIGHT,
        "Lowered fundamental frequency",
        "Low-pitched, monotonous speech",
    );
    rules.apply(
        below(f.stability, MOVEMENT_LOW_STABILITY),
        MOVEMENT_LOW_STABILITY_WEIGHT,
        "Reduced pitch stability",
        "Unsteady voice",
    );
    rules.finish(MOVEMENT_HIGH_RISK, MOVEMENT_MODERATE_RISK)
}

fn cognitive_decline(f: &VoiceFeatures) -> Option<DiseaseRiskAssessment> {
    let mut rules = RuleSet::new(COGNITIVE_DECLINE);
    rules.apply(
        below(f.voiced_ratio, COGNITIVE_LOW_VOICED_RATIO),
        COGNITIVE_LOW_VOICED_RATIO_WEIGHT,
        "Low proportion of voiced speech",
        "Hesitant speech with frequent pauses",
    );
    rules.apply(
        below(f.pitch_spread, COGNITIVE_FLAT_SPREAD),
        COGNITIVE_FLAT_SPREAD_WEIGHT,
        "Reduced prosodic variation",
        "Flat, expressionless intonation",
    );
    rules.apply(
        below(f.rms, COGNITIVE_LOW_RMS),
        COGNITIVE_LOW_RMS_WEIGHT,
        "Reduced vocal effort",
        "Quiet, low-energy speech",
    );
    rules.apply(
        above(f.jitter, COGNITIVE_HIGH_JITTER),
        COGNITIVE_HIGH_JITTER_WEIGHT,
        "Mild pitch instability",
        "Wavering voice",
    );
    rules.finish(COGNITIVE_HIGH_RISK, COGNITIVE_MODERATE_RISK)
}

fn laryngeal_pathology(f: &VoiceFeatures) -> Option<DiseaseRiskAssessment> {
    let mut rules = RuleSet::new(LARYNGEAL_PATHOLOGY);
    rules.apply(
        above(f.jitter, LARYNGEAL_HIGH_JITTER),
        LARYNGEAL_HIGH_JITTER_WEIGHT,
        "Marked pitch perturbation",
        "Hoarseness",
    );
    rules.apply(
        below(f.pitch_hz, PITCH_ABNORMAL_LOW) || above(f.pitch_hz, PITCH_ABNORMAL_HIGH),
        LARYNGEAL_ATYPICAL_PITCH_WEIGHT,
        "Fundamental frequency outside the normal range",
        "Altered voice pitch",
    );
    rules.apply(
        below(f.stability, LARYNGEAL_LOW_STABILITY),
        LARYNGEAL_LOW_STABILITY_WEIGHT,
        "Irregular vocal fold vibration",
        "Voice breaks",
    );
    rules.apply(
        below(f.rms, LARYNGEAL_WEAK_RMS),
        LARYNGEAL_WEAK_RMS_WEIGHT,
        "Weak phonation",
        "Breathy voice",
    );
    rules.apply(
        above(f.rms, LARYNGEAL_STRAIN_RMS) && above(f.pitch_hz, LARYNGEAL_STRAIN_PITCH),
        LARYNGEAL_STRAIN_WEIGHT,
        "Loud, high-pitched phonation",
        "Vocal strain",
    );
    rules.finish(LARYNGEAL_HIGH_RISK, LARYNGEAL_MODERATE_RISK)
}
