//! Emotion analysis - events to weighted emotion profiles, text to reactions

use crate::personality::Personality;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const JOY: &str = "joy";
pub const ANGER: &str = "anger";
pub const FEAR: &str = "fear";
pub const SADNESS: &str = "sadness";
pub const SURPRISE: &str = "surprise";
pub const DISGUST: &str = "disgust";
pub const ANTICIPATION: &str = "anticipation";
pub const CONTEMPT: &str = "contempt";
pub const ANXIETY: &str = "anxiety";

/// Sparse map of emotion name to intensity in [0, 1].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionProfile(BTreeMap<String, f64>);

impl EmotionProfile {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, emotion: &str) -> f64 {
        self.0.get(emotion).copied().unwrap_or(0.0)
    }

    /// Insert capped to [0, 1]; zero intensities are not stored.
    pub fn set(&mut self, emotion: &str, intensity: f64) {
        let v = intensity.clamp(0.0, 1.0);
        if v > 0.0 {
            self.0.insert(emotion.to_string(), v);
        } else {
            self.0.remove(emotion);
        }
    }

    pub fn scale(&mut self, emotion: &str, factor: f64) {
        let v = self.get(emotion);
        if v > 0.0 {
            self.set(emotion, v * factor);
        }
    }

    pub fn dominant(&self) -> Option<(&str, f64)> {
        self.0
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, v)| (k.as_str(), *v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Emotion-congruence against another profile: mean of `1 - |a - b|`
    /// over the emotions both profiles carry; 0 when nothing is shared.
    pub fn similarity(&self, other: &EmotionProfile) -> f64 {
        let shared: Vec<&str> = self.keys().filter(|k| other.0.contains_key(*k)).collect();
        if shared.is_empty() {
            return 0.0;
        }
        let total: f64 = shared
            .iter()
            .map(|k| 1.0 - (self.get(k) - other.get(k)).abs())
            .sum();
        total / shared.len() as f64
    }
}

/// Events the emotion engine scores. Combat and social events arrive from
/// outside the core; gifts carry their appraised value against the
/// recipient's wealth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmotionalEvent {
    Threat,
    Betrayal,
    Death,
    FirstMeeting,
    Gift { value: f64, wealth: f64 },
    Combat { damage: f64, max_hp: f64 },
    Mundane,
}

fn base_profile(event: &EmotionalEvent) -> EmotionProfile {
    let mut p = EmotionProfile::new();
    match event {
        EmotionalEvent::Threat => {
            p.set(FEAR, 0.95);
            p.set(ANGER, 0.5);
        }
        EmotionalEvent::Betrayal => {
            p.set(ANGER, 0.8);
            p.set(SADNESS, 0.6);
        }
        EmotionalEvent::Death => {
            p.set(SADNESS, 0.9);
            p.set(ANGER, 0.3);
        }
        EmotionalEvent::FirstMeeting => {
            p.set(SURPRISE, 0.5);
            p.set(JOY, 0.2);
        }
        EmotionalEvent::Gift { value, wealth } => {
            let ratio = if *wealth > 0.0 { value / wealth } else { 1.0 };
            p.set(JOY, 0.3 + 0.7 * ratio.min(1.0));
        }
        EmotionalEvent::Combat { damage, max_hp } => {
            let ratio = if *max_hp > 0.0 { damage / max_hp } else { 1.0 };
            p.set(FEAR, 0.5 + 0.5 * ratio.min(1.0));
            p.set(ANGER, 0.5);
        }
        EmotionalEvent::Mundane => {
            p.set(JOY, 0.1);
        }
    }
    p
}

fn event_weight(event: &EmotionalEvent) -> f64 {
    let w = match event {
        EmotionalEvent::Threat => 0.95,
        EmotionalEvent::Betrayal => 0.8,
        EmotionalEvent::Death => 0.9,
        EmotionalEvent::FirstMeeting => 0.5,
        EmotionalEvent::Gift { value, wealth } => {
            let ratio = if *wealth > 0.0 { value / wealth } else { 1.0 };
            0.3 + 0.7 * ratio.min(1.0)
        }
        EmotionalEvent::Combat { damage, max_hp } => {
            let ratio = if *max_hp > 0.0 { damage / max_hp } else { 1.0 };
            0.5 + 0.5 * ratio.min(1.0)
        }
        EmotionalEvent::Mundane => 0.1,
    };
    w.min(1.0)
}

/// Score an event for one NPC: personality-modified base vector, derived
/// complex emotions, and the scalar weight used by memory formation.
pub fn analyze_event(event: &EmotionalEvent, personality: &Personality) -> (EmotionProfile, f64) {
    let mut profile = base_profile(event);

    // Neurotic characters feel threats harder; disagreeable ones anger
    // faster; low-neuroticism optimists brighten everything.
    if personality.neuroticism >= 70.0 {
        profile.scale(FEAR, 1.2);
        profile.scale(SADNESS, 1.2);
    }
    if personality.agreeableness <= 30.0 {
        profile.scale(ANGER, 1.3);
    }
    if personality.neuroticism <= 30.0 {
        profile.scale(JOY, 1.2);
        profile.scale(SADNESS, 0.8);
    }

    derive_complex(&mut profile);

    (profile, event_weight(event))
}

fn derive_complex(profile: &mut EmotionProfile) {
    let joy = profile.get(JOY);
    let surprise = profile.get(SURPRISE);
    let anger = profile.get(ANGER);
    let disgust = profile.get(DISGUST);
    let fear = profile.get(FEAR);

    if joy > 0.0 && surprise > 0.0 {
        profile.set(ANTICIPATION, 0.5 * joy + 0.5 * surprise);
    }
    if anger > 0.0 && disgust > 0.0 {
        profile.set(CONTEMPT, 0.6 * anger + 0.4 * disgust);
    }
    if fear > 0.0 && surprise > 0.0 {
        profile.set(ANXIETY, 0.7 * fear + 0.3 * surprise);
    }
}

const JOY_WORDS: &[&str] = &["happy", "glad", "wonderful", "delight", "laugh", "smile", "joy"];
const ANGER_WORDS: &[&str] = &["angry", "furious", "rage", "hate", "annoyed", "scowl"];
const FEAR_WORDS: &[&str] = &["afraid", "scared", "terrified", "fear", "dread", "tremble"];
const SADNESS_WORDS: &[&str] = &["sad", "sorrow", "miserable", "weep", "grief", "mourn"];

/// Infer an emotional reaction from generated dialogue text. Keyword
/// buckets first, then punctuation signals, else a faint neutral.
pub fn infer_reaction(text: &str) -> (String, f64) {
    let lowered = text.to_lowercase();

    for (bucket, words, weight) in [
        (JOY, JOY_WORDS, 0.5),
        (ANGER, ANGER_WORDS, 0.5),
        (FEAR, FEAR_WORDS, 0.5),
        (SADNESS, SADNESS_WORDS, 0.5),
    ] {
        if words.iter().any(|w| lowered.contains(w)) {
            return (bucket.to_string(), weight);
        }
    }

    if text.contains("!!") {
        return ("excited".to_string(), 0.6);
    }
    if text.contains("??") {
        return ("confused".to_string(), 0.5);
    }

    ("neutral".to_string(), 0.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threat_is_fear_dominated() {
        let (profile, weight) = analyze_event(&EmotionalEvent::Threat, &Personality::default());
        assert_eq!(profile.dominant().unwrap().0, FEAR);
        assert_eq!(weight, 0.95);
    }

    #[test]
    fn neurotic_fear_caps_at_one() {
        let neurotic = Personality::new(50.0, 50.0, 50.0, 50.0, 90.0);
        let (profile, _) = analyze_event(&EmotionalEvent::Threat, &neurotic);
        // 0.95 * 1.2 capped
        assert_eq!(profile.get(FEAR), 1.0);
    }

    #[test]
    fn aggressive_anger_scales() {
        let hostile = Personality::new(50.0, 50.0, 50.0, 10.0, 50.0);
        let (profile, _) = analyze_event(&EmotionalEvent::Betrayal, &hostile);
        assert!((profile.get(ANGER) - 0.8 * 1.3).abs() < 1e-9);
    }

    #[test]
    fn optimist_brightens_and_dampens() {
        let optimist = Personality::new(50.0, 50.0, 50.0, 50.0, 10.0);
        let (profile, _) = analyze_event(&EmotionalEvent::Death, &optimist);
        assert!((profile.get(SADNESS) - 0.9 * 0.8).abs() < 1e-9);
    }

    #[test]
    fn gift_weight_scales_with_relative_value() {
        let p = Personality::default();
        let (_, cheap) = analyze_event(
            &EmotionalEvent::Gift {
                value: 10.0,
                wealth: 1000.0,
            },
            &p,
        );
        let (_, lavish) = analyze_event(
            &EmotionalEvent::Gift {
                value: 5000.0,
                wealth: 1000.0,
            },
            &p,
        );
        assert!((cheap - 0.307).abs() < 1e-3);
        assert_eq!(lavish, 1.0);
    }

    #[test]
    fn combat_fear_tracks_damage_fraction() {
        let p = Personality::default();
        let (profile, weight) = analyze_event(
            &EmotionalEvent::Combat {
                damage: 50.0,
                max_hp: 100.0,
            },
            &p,
        );
        assert_eq!(profile.get(FEAR), 0.75);
        assert_eq!(weight, 0.75);
    }

    #[test]
    fn complex_emotions_derive_from_components() {
        let p = Personality::default();
        let (profile, _) = analyze_event(&EmotionalEvent::FirstMeeting, &p);
        let expected = 0.5 * profile.get(JOY) + 0.5 * profile.get(SURPRISE);
        assert!((profile.get(ANTICIPATION) - expected).abs() < 1e-9);

        let (threat, _) = analyze_event(&EmotionalEvent::Threat, &p);
        assert_eq!(threat.get(ANXIETY), 0.0);
    }

    #[test]
    fn similarity_over_shared_keys_only() {
        let mut a = EmotionProfile::new();
        a.set(JOY, 0.8);
        a.set(FEAR, 0.2);
        let mut b = EmotionProfile::new();
        b.set(JOY, 0.6);
        b.set(SADNESS, 0.9);
        assert!((a.similarity(&b) - 0.8).abs() < 1e-9);

        let empty = EmotionProfile::new();
        assert_eq!(a.similarity(&empty), 0.0);
    }

    #[test]
    fn reaction_keywords_beat_punctuation() {
        let (emotion, weight) = infer_reaction("I am so happy to see you!!");
        assert_eq!(emotion, JOY);
        assert_eq!(weight, 0.5);
    }

    #[test]
    fn reaction_punctuation_signals() {
        assert_eq!(infer_reaction("Behind you!!"), ("excited".into(), 0.6));
        assert_eq!(infer_reaction("You did what??"), ("confused".into(), 0.5));
    }

    #[test]
    fn reaction_defaults_to_neutral() {
        assert_eq!(infer_reaction("The road goes ever on."), ("neutral".into(), 0.1));
    }
}
