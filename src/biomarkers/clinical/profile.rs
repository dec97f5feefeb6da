//! Voice characteristic profile
//!
//! Four categorical axes derived from the same aggregate plus the pitch
//! stability score.

use serde::{Deserialize, Serialize};

use super::thresholds::*;
use super::VoiceFeatures;
use crate::biomarkers::SessionAggregate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceQuality {
    Normal,
    Breathy,
    Rough,
    Strained,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Articulation {
    Clear,
    Mild,
    Moderate,
    Severe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prosody {
    Normal,
    Monotone,
    Irregular,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceCharacteristics {
    /// 0-1, higher is steadier
    pub pitch_stability: f64,
    pub voice_quality: VoiceQuality,
    pub articulation: Articulation,
    pub prosody: Prosody,
    pub overall_assessment: String,
}

/// Profile a session; `stability` is the 0-1 pitch stability score
pub fn profile(aggregate: &SessionAggregate, stability: f64) -> VoiceCharacteristics {
    let features = VoiceFeatures::from_aggregate(aggregate);
    let stability = if stability.is_finite() {
        stability.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let voice_quality = voice_quality(&features);
    let articulation = articulation(stability);
    let prosody = prosody(&features, stability, aggregate.pitch_history.len());
    let overall_assessment = overall_assessment(voice_quality, articulation, prosody);

    VoiceCharacteristics {
        pitch_stability: stability,
        voice_quality,
        articulation,
        prosody,
        overall_assessment,
    }
}

fn voice_quality(f: &VoiceFeatures) -> VoiceQuality {
    let rms = f.rms.unwrap_or(0.0);
    let jitter = f.jitter.unwrap_or(0.0);

    if f.jitter.is_some() && jitter > QUALITY_ROUGH_JITTER {
        VoiceQuality::Rough
    } else if f.rms.is_some() && rms < QUALITY_BREATHY_RMS && jitter > QUALITY_BREATHY_JITTER {
        VoiceQuality::Breathy
    } else if rms > QUALITY_STRAINED_RMS
        && f.pitch_hz.is_some_and(|p| p > QUALITY_STRAINED_PITCH)
    {
        VoiceQuality::Strained
    } else {
        VoiceQuality::Normal
    }
}

fn articulation(stability: f64) -> Articulation {
    if stability >= ARTICULATION_CLEAR_STABILITY {
        Articulation::Clear
    } else if stability >= ARTICULATION_MILD_STABILITY {
        Articulation::Mild
    } else if stability >= ARTICULATION_MODERATE_STABILITY {
        Articulation::Moderate
    } else {
        Articulation::Severe
    }
}

fn prosody(f: &VoiceFeatures, stability: f64, history_len: usize) -> Prosody {
    if stability < PROSODY_IRREGULAR_STABILITY || f.jitter.is_some_and(|j| j > JITTER_ABNORMAL) {
        Prosody::Irregular
    } else if history_len >= PROSODY_MIN_HISTORY
        && f.pitch_spread.is_some_and(|s| s < PROSODY_MONOTONE_SPREAD)
    {
        Prosody::Monotone
    } else {
        Prosody::Normal
    }
}

fn overall_assessment(quality: VoiceQuality, articulation: Articulation, prosody: Prosody) -> String {
    if quality == VoiceQuality::Normal
        && articulation == Articulation::Clear
        && prosody == Prosody::Normal
    {
        return "Voice characteristics are within normal limits".to_string();
    }

    let mut notes = Vec::new();
    match quality {
        VoiceQuality::Normal => {}
        VoiceQuality::Breathy => notes.push("breathy voice quality"),
        VoiceQuality::Rough => notes.push("rough voice quality"),
        VoiceQuality::Strained => notes.push("strained voice quality"),
    }
    match articulation {
        Articulation::Clear => {}
        Articulation::Mild => notes.push("mildly reduced articulatory stability"),
        Articulation::Moderate => notes.push("moderately reduced articulatory stability"),
        Articulation::Severe => notes.push("severely reduced articulatory stability"),
    }
    match prosody {
        Prosody::Normal => {}
        Prosody::Monotone => notes.push("monotone prosody"),
        Prosody::Irregular => notes.push("irregular prosody"),
    }

    format!("Voice shows {}", notes.join(", "))
}
