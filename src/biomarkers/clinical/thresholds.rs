//! Threshold table for every clinical rule.
//!
//! Ranges follow published adult voice norms; risk weights are hand-tuned.

// --- Fundamental frequency (Hz) ---
pub const PITCH_ABNORMAL_LOW: f64 = 85.0;
pub const PITCH_ABNORMAL_HIGH: f64 = 300.0;
pub const PITCH_BORDERLINE_LOW: f64 = 100.0;
pub const PITCH_BORDERLINE_HIGH: f64 = 250.0;
pub const PITCH_SEVERE_LOW: f64 = 70.0;
pub const PITCH_SEVERE_HIGH: f64 = 350.0;

// --- RMS amplitude ---
pub const RMS_ABNORMAL_LOW: f64 = 0.01;
pub const RMS_ABNORMAL_HIGH: f64 = 0.15;
pub const RMS_BORDERLINE_LOW: f64 = 0.03;
pub const RMS_BORDERLINE_HIGH: f64 = 0.12;
pub const RMS_SEVERE_LOW: f64 = 0.005;
pub const RMS_SEVERE_HIGH: f64 = 0.25;

// --- Relative jitter ---
pub const JITTER_ABNORMAL: f64 = 0.10;
pub const JITTER_BORDERLINE: f64 = 0.06;
pub const JITTER_SEVERE: f64 = 0.11;

/// Conditions at or below this confidence are not reported
pub const RISK_REPORT_FLOOR: f64 = 0.10;

// --- Movement disorder ---
pub const MOVEMENT_LOW_RMS: f64 = 0.04;
pub const MOVEMENT_LOW_RMS_WEIGHT: f64 = 0.25;
pub const MOVEMENT_HIGH_JITTER: f64 = 0.08;
pub const MOVEMENT_HIGH_JITTER_WEIGHT: f64 = 0.20;
pub const MOVEMENT_LOW_PITCH: f64 = 120.0;
pub const MOVEMENT_LOW_PITCH_WEIGHT: f64 = 0.20;
pub const MOVEMENT_LOW_STABILITY: f64 = 0.6;
pub const MOVEMENT_LOW_STABILITY_WEIGHT: f64 = 0.15;
pub const MOVEMENT_HIGH_RISK: f64 = 0.5;
pub const MOVEMENT_MODERATE_RISK: f64 = 0.25;

// --- Cognitive decline ---
pub const COGNITIVE_LOW_VOICED_RATIO: f64 = 0.3;
pub const COGNITIVE_LOW_VOICED_RATIO_WEIGHT: f64 = 0.25;
/// Pitch spread (Hz) below which prosody is considered flat
pub const COGNITIVE_FLAT_SPREAD: f64 = 5.0;
pub const COGNITIVE_FLAT_SPREAD_WEIGHT: f64 = 0.20;
pub const COGNITIVE_LOW_RMS: f64 = 0.03;
pub const COGNITIVE_LOW_RMS_WEIGHT: f64 = 0.15;
pub const COGNITIVE_HIGH_JITTER: f64 = 0.06;
pub const COGNITIVE_HIGH_JITTER_WEIGHT: f64 = 0.15;
pub const COGNITIVE_HIGH_RISK: f64 = 0.4;
pub const COGNITIVE_MODERATE_RISK: f64 = 0.2;

// --- Laryngeal pathology ---
pub const LARYNGEAL_HIGH_JITTER: f64 = 0.10;
pub const LARYNGEAL_HIGH_JITTER_WEIGHT: f64 = 0.30;
pub const LARYNGEAL_ATYPICAL_PITCH_WEIGHT: f64 = 0.20;
pub const LARYNGEAL_LOW_STABILITY: f64 = 0.5;
pub const LARYNGEAL_LOW_STABILITY_WEIGHT: f64 = 0.15;
pub const LARYNGEAL_WEAK_RMS: f64 = 0.02;
pub const LARYNGEAL_WEAK_RMS_WEIGHT: f64 = 0.15;
pub const LARYNGEAL_STRAIN_RMS: f64 = 0.12;
pub const LARYNGEAL_STRAIN_PITCH: f64 = 250.0;
pub const LARYNGEAL_STRAIN_WEIGHT: f64 = 0.15;
pub const LARYNGEAL_HIGH_RISK: f64 = 0.5;
pub const LARYNGEAL_MODERATE_RISK: f64 = 0.25;

// --- Voice profile ---
pub const QUALITY_ROUGH_JITTER: f64 = 0.08;
pub const QUALITY_BREATHY_RMS: f64 = 0.03;
pub const QUALITY_BREATHY_JITTER: f64 = 0.04;
pub const QUALITY_STRAINED_RMS: f64 = 0.12;
pub const QUALITY_STRAINED_PITCH: f64 = 250.0;
pub const ARTICULATION_CLEAR_STABILITY: f64 = 0.8;
pub const ARTICULATION_MILD_STABILITY: f64 = 0.6;
pub const ARTICULATION_MODERATE_STABILITY: f64 = 0.4;
pub const PROSODY_IRREGULAR_STABILITY: f64 = 0.5;
pub const PROSODY_MONOTONE_SPREAD: f64 = 5.0;
/// Pitches needed before prosody can be called monotone
pub const PROSODY_MIN_HISTORY: usize = 10;

// --- Quality score penalties (points off 100) ---
pub const PENALTY_MILD_FINDING: f64 = 5.0;
pub const PENALTY_MODERATE_FINDING: f64 = 15.0;
pub const PENALTY_SEVERE_FINDING: f64 = 25.0;
pub const PENALTY_MODERATE_RISK: f64 = 10.0;
pub const PENALTY_HIGH_RISK: f64 = 20.0;
