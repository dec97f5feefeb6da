//! Clinical finding generator
//!
//! One finding per measured feature, graded against its normal range.
//! Boundaries are strict: a value sitting exactly on an abnormal limit is
//! still borderline.

use super::thresholds::*;
use super::{ClinicalFinding, FindingStatus, Severity, VoiceFeatures};
use crate::biomarkers::SessionAggregate;

pub const CATEGORY_PITCH: &str = "Fundamental Frequency";
pub const CATEGORY_AMPLITUDE: &str = "Voice Amplitude";
pub const CATEGORY_PERTURBATION: &str = "Pitch Perturbation";

/// Normal-range limits for one feature
struct Band {
    abnormal: (f64, f64),
    borderline: (f64, f64),
    severe: (f64, f64),
}

const PITCH_BAND: Band = Band {
    abnormal: (PITCH_ABNORMAL_LOW, PITCH_ABNORMAL_HIGH),
    borderline: (PITCH_BORDERLINE_LOW, PITCH_BORDERLINE_HIGH),
    severe: (PITCH_SEVERE_LOW, PITCH_SEVERE_HIGH),
};

const RMS_BAND: Band = Band {
    abnormal: (RMS_ABNORMAL_LOW, RMS_ABNORMAL_HIGH),
    borderline: (RMS_BORDERLINE_LOW, RMS_BORDERLINE_HIGH),
    severe: (RMS_SEVERE_LOW, RMS_SEVERE_HIGH),
};

// Jitter only has an upper limit
const JITTER_BAND: Band = Band {
    abnormal: (f64::NEG_INFINITY, JITTER_ABNORMAL),
    borderline: (f64::NEG_INFINITY, JITTER_BORDERLINE),
    severe: (f64::NEG_INFINITY, JITTER_SEVERE),
};

impl Band {
    fn grade(&self, value: f64) -> (FindingStatus, Severity) {
        let outside = |(lo, hi): (f64, f64)| value < lo || value > hi;
        if outside(self.abnormal) {
            let severity = if outside(self.severe) {
                Severity::Severe
            } else {
                Severity::Moderate
            };
            (FindingStatus::Abnormal, severity)
        } else if outside(self.borderline) {
            (FindingStatus::Borderline, Severity::Mild)
        } else {
            (FindingStatus::Normal, Severity::Normal)
        }
    }

    fn is_low(&self, value: f64) -> bool {
        value < self.borderline.0
    }
}

/// Findings for a frozen session aggregate
pub fn generate(aggregate: &SessionAggregate) -> Vec<ClinicalFinding> {
    generate_features(&VoiceFeatures::from_aggregate(aggregate))
}

/// Findings for an already extracted feature set; absent features are skipped
pub fn generate_features(features: &VoiceFeatures) -> Vec<ClinicalFinding> {
    let mut findings = Vec::new();

    if let Some(pitch) = features.pitch_hz {
        findings.push(pitch_finding(pitch));
    }
    if let Some(rms) = features.rms {
        findings.push(amplitude_finding(rms));
    }
    if let Some(jitter) = features.jitter {
        findings.push(perturbation_finding(jitter));
    }

    findings
}

fn pitch_finding(pitch: f64) -> ClinicalFinding {
    let (status, severity) = PITCH_BAND.grade(pitch);
    let direction = if PITCH_BAND.is_low(pitch) { "low" } else { "high" };

    let (statement, significance) = match status {
        FindingStatus::Normal => (
            format!(
                "Fundamental frequency of {:.0} Hz is within the normal range ({:.0}-{:.0} Hz)",
                pitch, PITCH_BORDERLINE_LOW, PITCH_BORDERLINE_HIGH
            ),
            "Pitch is consistent with typical adult phonation.",
        ),
        FindingStatus::Borderline => (
            format!(
                "Fundamental frequency of {:.0} Hz is borderline {}",
                pitch, direction
            ),
            "Mildly atypical pitch; may reflect speaking style, vocal fatigue or early laryngeal change.",
        ),
        FindingStatus::Abnormal => (
            format!(
                "Fundamental frequency of {:.0} Hz is abnormally {} (expected {:.0}-{:.0} Hz)",
                pitch, direction, PITCH_ABNORMAL_LOW, PITCH_ABNORMAL_HIGH
            ),
            "Atypical pitch can accompany laryngeal pathology, hormonal change or neuromuscular disorders.",
        ),
    };

    ClinicalFinding {
        category: CATEGORY_PITCH.to_string(),
        statement,
        status,
        severity,
        clinical_significance: significance.to_string(),
    }
}

fn amplitude_finding(rms: f64) -> ClinicalFinding {
    let (status, severity) = RMS_BAND.grade(rms);
    let direction = if RMS_BAND.is_low(rms) { "reduced" } else { "elevated" };

    let (statement, significance) = match status {
        FindingStatus::Normal => (
            format!("Voice amplitude (RMS {:.3}) is within the normal range", rms),
            "Adequate vocal loudness and respiratory support.",
        ),
        FindingStatus::Borderline => (
            format!("Voice amplitude (RMS {:.3}) is mildly {}", rms, direction),
            "May reflect microphone distance or mildly altered vocal effort.",
        ),
        FindingStatus::Abnormal => (
            format!("Voice amplitude (RMS {:.3}) is markedly {}", rms, direction),
            "Abnormal loudness can indicate hypophonia, reduced respiratory support or vocal strain.",
        ),
    };

    ClinicalFinding {
        category: CATEGORY_AMPLITUDE.to_string(),
        statement,
        status,
        severity,
        clinical_significance: significance.to_string(),
    }
}

fn perturbation_finding(jitter: f64) -> ClinicalFinding {
    let (status, severity) = JITTER_BAND.grade(jitter);
    let percent = jitter * 100.0;

    let (statement, significance) = match status {
        FindingStatus::Normal => (
            format!("Pitch perturbation ({:.1}% jitter) is within normal limits", percent),
            "Stable vocal fold vibration.",
        ),
        FindingStatus::Borderline => (
            format!("Pitch perturbation ({:.1}% jitter) is mildly elevated", percent),
            "Mild instability; may reflect fatigue or early vocal fold change.",
        ),
        FindingStatus::Abnormal => (
            format!("Pitch perturbation ({:.1}% jitter) is abnormally high", percent),
            "Irregular vocal fold vibration is associated with laryngeal pathology and neuromotor disorders.",
        ),
    };

    ClinicalFinding {
        category: CATEGORY_PERTURBATION.to_string(),
        statement,
        status,
        severity,
        clinical_significance: significance.to_string(),
    }
}
