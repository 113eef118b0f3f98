//! Mood lifecycle - typed moods with timed expiry back to calm

use crate::personality::Personality;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodKind {
    Cheerful,
    Melancholy,
    Anxious,
    Angry,
    Excited,
    Calm,
}

impl MoodKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodKind::Cheerful => "cheerful",
            MoodKind::Melancholy => "melancholy",
            MoodKind::Anxious => "anxious",
            MoodKind::Angry => "angry",
            MoodKind::Excited => "excited",
            MoodKind::Calm => "calm",
        }
    }

    /// Sparse OCEAN modifiers while the mood holds.
    fn trait_modifiers(&self) -> BTreeMap<String, f64> {
        let pairs: &[(&str, f64)] = match self {
            MoodKind::Cheerful => &[("agreeableness", 10.0), ("extraversion", 5.0)],
            MoodKind::Melancholy => &[("extraversion", -10.0), ("neuroticism", 10.0)],
            MoodKind::Anxious => &[("neuroticism", 15.0)],
            MoodKind::Angry => &[("agreeableness", -15.0)],
            MoodKind::Excited => &[("extraversion", 10.0), ("openness", 5.0)],
            MoodKind::Calm => &[],
        };
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }
}

/// Current mood: kind, remaining duration in hours, and trait modifiers.
/// `calm` is the absorbing state - zero duration, no modifiers. New triggers
/// replace the current mood wholesale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoodState {
    pub kind: MoodKind,
    pub remaining_hours: f64,
    pub modifiers: BTreeMap<String, f64>,
}

impl MoodState {
    pub fn calm() -> Self {
        Self {
            kind: MoodKind::Calm,
            remaining_hours: 0.0,
            modifiers: BTreeMap::new(),
        }
    }

    /// Emit a mood from an event. Duration scales with neuroticism:
    /// `base * (1 + N/100)`, so an anxious character holds moods up to
    /// twice as long. A non-positive base collapses to calm.
    pub fn trigger(kind: MoodKind, base_duration_hours: f64, personality: &Personality) -> Self {
        if kind == MoodKind::Calm || base_duration_hours <= 0.0 {
            return Self::calm();
        }
        Self {
            kind,
            remaining_hours: base_duration_hours * (1.0 + personality.neuroticism / 100.0),
            modifiers: kind.trait_modifiers(),
        }
    }

    /// Advance time; an expired mood returns to calm.
    pub fn tick(&mut self, delta_hours: f64) {
        if self.kind == MoodKind::Calm {
            return;
        }
        self.remaining_hours -= delta_hours;
        if self.remaining_hours <= 0.0 {
            *self = Self::calm();
        }
    }

    pub fn modifier(&self, trait_name: &str) -> f64 {
        self.modifiers.get(trait_name).copied().unwrap_or(0.0)
    }

    pub fn is_calm(&self) -> bool {
        self.kind == MoodKind::Calm
    }
}

impl Default for MoodState {
    fn default() -> Self {
        Self::calm()
    }
}
