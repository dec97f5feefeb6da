//! End-of-session report assembly

use super::clinical::thresholds::*;
use super::clinical::{
    assess, generate, profile, recommend, ClinicalFinding, DiseaseRiskAssessment, RiskLevel,
    Severity,
};
use super::{AnalysisResult, OverallRisk, SessionAggregate};

const PLACEHOLDER_NOTICE: &str = "No usable voice signal was captured; these results are a \
placeholder estimate, not a measurement. Please repeat the recording.";

/// Run every clinical stage over a frozen aggregate.
///
/// Pure: the same aggregate always produces the same result.
pub fn analyze(aggregate: &SessionAggregate) -> AnalysisResult {
    let findings = generate(aggregate);
    let risk_assessments = assess(aggregate);
    let characteristics = profile(aggregate, aggregate.stability().unwrap_or(1.0));

    let mut recommendations = recommend(&findings, &risk_assessments, &characteristics);
    if aggregate.is_placeholder() {
        recommendations.insert(0, PLACEHOLDER_NOTICE.to_string());
    }

    AnalysisResult {
        aggregate: aggregate.clone(),
        quality_score: quality_score(&findings, &risk_assessments),
        risk_level: overall_risk(&findings, &risk_assessments),
        findings,
        risk_assessments,
        characteristics,
        recommendations,
        provenance: aggregate.provenance,
    }
}

fn quality_score(findings: &[ClinicalFinding], risks: &[DiseaseRiskAssessment]) -> f64 {
    let finding_penalty: f64 = findings
        .iter()
        .map(|f| match f.severity {
            Severity::Normal => 0.0,
            Severity::Mild => PENALTY_MILD_FINDING,
            Severity::Moderate => PENALTY_MODERATE_FINDING,
            Severity::Severe => PENALTY_SEVERE_FINDING,
        })
        .sum();
    let risk_penalty: f64 = risks
        .iter()
        .map(|r| match r.risk_level {
            RiskLevel::Low => 0.0,
            RiskLevel::Moderate => PENALTY_MODERATE_RISK,
            RiskLevel::High => PENALTY_HIGH_RISK,
        })
        .sum();

    (100.0 - finding_penalty - risk_penalty).clamp(0.0, 100.0)
}

fn overall_risk(findings: &[ClinicalFinding], risks: &[DiseaseRiskAssessment]) -> OverallRisk {
    if risks.iter().any(|r| r.risk_level == RiskLevel::High) {
        OverallRisk::High
    } else if risks.iter().any(|r| r.risk_level == RiskLevel::Moderate)
        || findings.iter().any(|f| f.severity >= Severity::Moderate)
    {
        OverallRisk::Medium
    } else {
        OverallRisk::Low
    }
}
