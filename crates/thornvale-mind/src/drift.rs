//! Behavioral drift - divergence of rolling behavior from baseline

use crate::relationship::BehavioralProfile;
use serde::{Deserialize, Serialize};

/// A trait drifts into the affected set at this delta.
const AFFECTED_THRESHOLD: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftLevel {
    None,
    Subtle,
    Moderate,
    Severe,
}

impl DriftLevel {
    fn classify(score: f64) -> Self {
        if score >= 0.7 {
            DriftLevel::Severe
        } else if score >= 0.5 {
            DriftLevel::Moderate
        } else if score >= 0.3 {
            DriftLevel::Subtle
        } else {
            DriftLevel::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DriftLevel::None => "none",
            DriftLevel::Subtle => "subtle",
            DriftLevel::Moderate => "moderate",
            DriftLevel::Severe => "severe",
        }
    }

    /// Prompt-builder instruction for how strongly to play the change.
    pub fn instruction(&self) -> &'static str {
        match self {
            DriftLevel::None => "",
            DriftLevel::Subtle => {
                "Something about them seems faintly different lately; let an occasional word choice hint at it."
            }
            DriftLevel::Moderate => {
                "Their manner has noticeably changed; let the shift color their tone and reactions."
            }
            DriftLevel::Severe => {
                "They are almost unrecognizable from who they were; the change should unsettle the conversation."
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriftMetrics {
    /// Max per-trait divergence, in [0, 1].
    pub score: f64,
    /// Sign of the max-drift delta: +1 rising, -1 falling.
    pub direction: i8,
    pub affected_traits: Vec<String>,
    pub level: DriftLevel,
}

/// Compare rolling behavior against the long-term baseline.
pub fn compute_drift(baseline: &BehavioralProfile, current: &BehavioralProfile) -> DriftMetrics {
    let mut score = 0.0_f64;
    let mut direction = 1_i8;
    let mut affected = Vec::new();

    for dimension in BehavioralProfile::DIMENSIONS {
        let delta = current.get(dimension) - baseline.get(dimension);
        let magnitude = delta.abs();
        if magnitude > score {
            score = magnitude;
            direction = if delta >= 0.0 { 1 } else { -1 };
        }
        if magnitude >= AFFECTED_THRESHOLD {
            affected.push(dimension.to_string());
        }
    }

    DriftMetrics {
        score: score.min(1.0),
        direction,
        affected_traits: affected,
        level: DriftLevel::classify(score),
    }
}

/// An observer's reaction to drift: a spoken comment, a memory seed, and
/// affinity adjustments scaled by magnitude and direction.
#[derive(Clone, Debug, PartialEq)]
pub struct DriftReaction {
    pub comment: &'static str,
    pub memory_seed: String,
    pub affection_delta: f64,
    pub trust_delta: f64,
}

/// No reaction below the subtle threshold. Severe drift carries a fixed
/// trust penalty on top of the directional adjustment.
pub fn react_to_drift(metrics: &DriftMetrics) -> Option<DriftReaction> {
    let direction = f64::from(metrics.direction);
    let affection_delta = metrics.score * 50.0 * direction;
    let mut trust_delta = metrics.score * 30.0 * direction;

    let comment = match metrics.level {
        DriftLevel::None => return None,
        DriftLevel::Subtle => "You seem a little different lately.",
        DriftLevel::Moderate => "Something has changed about you, and I can't place it.",
        DriftLevel::Severe => "I hardly know you anymore.",
    };

    if metrics.level == DriftLevel::Severe {
        trust_delta -= 25.0;
    }

    let memory_seed = format!(
        "noticed a {} change in their {}",
        metrics.level.as_str(),
        if metrics.affected_traits.is_empty() {
            "manner".to_string()
        } else {
            metrics.affected_traits.join(", ")
        }
    );

    Some(DriftReaction {
        comment,
        memory_seed,
        affection_delta,
        trust_delta,
    })
}
