//! Recommendation generator
//!
//! Priority order: abnormal findings, then High/Moderate conditions, then
//! voice quality, then (only if none of those fired) a default monitoring
//! pair, and finally the two disclaimers that every report carries.

use super::findings::{CATEGORY_AMPLITUDE, CATEGORY_PERTURBATION, CATEGORY_PITCH};
use super::risk::{COGNITIVE_DECLINE, LARYNGEAL_PATHOLOGY, MOVEMENT_DISORDER};
use super::{
    ClinicalFinding, DiseaseRiskAssessment, FindingStatus, RiskLevel, VoiceCharacteristics,
    VoiceQuality,
};

/// Appended to every recommendation list
pub const DISCLAIMERS: [&str; 2] = [
    "This screening is a decision-support aid and does not constitute a medical diagnosis",
    "Consult a qualified healthcare professional to interpret these results",
];

const DEFAULT_RECOMMENDATIONS: [&str; 2] = [
    "Maintain good vocal hygiene: stay hydrated and avoid prolonged vocal overuse",
    "Continue periodic voice monitoring to track changes over time",
];

fn finding_recommendation(finding: &ClinicalFinding) -> Option<&'static str> {
    if finding.status != FindingStatus::Abnormal {
        return None;
    }
    match finding.category.as_str() {
        CATEGORY_PITCH => Some("Consult an otolaryngologist (ENT) to evaluate atypical vocal pitch"),
        CATEGORY_AMPLITUDE => {
            Some("Have vocal loudness and breath support assessed by a speech-language pathologist")
        }
        CATEGORY_PERTURBATION => {
            Some("Seek a laryngeal examination to assess the stability of vocal fold vibration")
        }
        _ => None,
    }
}

fn risk_recommendation(risk: &DiseaseRiskAssessment) -> Option<&'static str> {
    match (risk.condition.as_str(), risk.risk_level) {
        (MOVEMENT_DISORDER, RiskLevel::High) => {
            Some("Refer to a neurologist for movement-disorder evaluation")
        }
        (MOVEMENT_DISORDER, RiskLevel::Moderate) => {
            Some("Repeat the voice screening in 3 months to monitor motor speech changes")
        }
        (COGNITIVE_DECLINE, RiskLevel::High) => {
            Some("Arrange a formal cognitive assessment with a clinician")
        }
        (COGNITIVE_DECLINE, RiskLevel::Moderate) => {
            Some("Monitor speech fluency and memory, and rescreen in 6 months")
        }
        (LARYNGEAL_PATHOLOGY, RiskLevel::High) => {
            Some("Arrange laryngoscopy with an ENT specialist")
        }
        (LARYNGEAL_PATHOLOGY, RiskLevel::Moderate) => {
            Some("Rest the voice and stay hydrated; seek ENT review if hoarseness persists beyond 2 weeks")
        }
        _ => None,
    }
}

fn quality_recommendation(quality: VoiceQuality) -> Option<&'static str> {
    match quality {
        VoiceQuality::Normal => None,
        VoiceQuality::Breathy => {
            Some("Breath-support and vocal fold closure exercises may improve breathy voice quality")
        }
        VoiceQuality::Rough => {
            Some("Avoid throat clearing and irritants such as smoke and alcohol that aggravate a rough voice")
        }
        VoiceQuality::Strained => {
            Some("Practise relaxation and resonant-voice techniques to reduce vocal strain")
        }
    }
}

/// Ordered, deduplicated recommendations; never empty
pub fn recommend(
    findings: &[ClinicalFinding],
    risks: &[DiseaseRiskAssessment],
    profile: &VoiceCharacteristics,
) -> Vec<String> {
    let specific: Vec<&str> = findings
        .iter()
        .filter_map(finding_recommendation)
        .chain(risks.iter().filter_map(risk_recommendation))
        .chain(quality_recommendation(profile.voice_quality))
        .collect();

    let mut recommendations: Vec<String> = Vec::new();
    let mut push = |text: &str| {
        if !recommendations.iter().any(|r| r == text) {
            recommendations.push(text.to_string());
        }
    };

    let body: &[&str] = if specific.is_empty() {
        &DEFAULT_RECOMMENDATIONS
    } else {
        &specific
    };
    for &text in body.iter().chain(DISCLAIMERS.iter()) {
        push(text);
    }

    recommendations
}
