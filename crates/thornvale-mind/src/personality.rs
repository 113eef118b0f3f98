//! OCEAN personality traits, archetypes, lifecycle shifts, decision scoring

use crate::mood::MoodState;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The five trait axes, each in [0, 100].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraitKind {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl TraitKind {
    pub const ALL: [TraitKind; 5] = [
        TraitKind::Openness,
        TraitKind::Conscientiousness,
        TraitKind::Extraversion,
        TraitKind::Agreeableness,
        TraitKind::Neuroticism,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TraitKind::Openness => "openness",
            TraitKind::Conscientiousness => "conscientiousness",
            TraitKind::Extraversion => "extraversion",
            TraitKind::Agreeableness => "agreeableness",
            TraitKind::Neuroticism => "neuroticism",
        }
    }
}

/// OCEAN vector. Mutated only by lifecycle events; immutable within a tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
}

fn clamp_trait(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

impl Personality {
    pub fn new(
        openness: f64,
        conscientiousness: f64,
        extraversion: f64,
        agreeableness: f64,
        neuroticism: f64,
    ) -> Self {
        Self {
            openness: clamp_trait(openness),
            conscientiousness: clamp_trait(conscientiousness),
            extraversion: clamp_trait(extraversion),
            agreeableness: clamp_trait(agreeableness),
            neuroticism: clamp_trait(neuroticism),
        }
    }

    pub fn get(&self, kind: TraitKind) -> f64 {
        match kind {
            TraitKind::Openness => self.openness,
            TraitKind::Conscientiousness => self.conscientiousness,
            TraitKind::Extraversion => self.extraversion,
            TraitKind::Agreeableness => self.agreeableness,
            TraitKind::Neuroticism => self.neuroticism,
        }
    }

    fn get_mut(&mut self, kind: TraitKind) -> &mut f64 {
        match kind {
            TraitKind::Openness => &mut self.openness,
            TraitKind::Conscientiousness => &mut self.conscientiousness,
            TraitKind::Extraversion => &mut self.extraversion,
            TraitKind::Agreeableness => &mut self.agreeableness,
            TraitKind::Neuroticism => &mut self.neuroticism,
        }
    }

    /// Trait scaled to [0, 1] for weighting formulas.
    pub fn normalized(&self, kind: TraitKind) -> f64 {
        self.get(kind) / 100.0
    }

    /// A trait with the active mood's modifier applied, still in [0, 100].
    pub fn effective(&self, kind: TraitKind, mood: &MoodState) -> f64 {
        clamp_trait(self.get(kind) + mood.modifier(kind.as_str()))
    }

    /// Shift a trait by a lifecycle experience. The only sanctioned mutation
    /// path outside genetics.
    pub fn apply_experience(&mut self, event: LifecycleEvent) {
        for (kind, delta) in event.trait_shifts() {
            let slot = self.get_mut(*kind);
            *slot = clamp_trait(*slot + delta);
        }
    }

    /// Per-tag decision score plus a uniform roll in [0, 20). Mood modifiers
    /// shift the effective trait before the >=70 / <=30 gates apply.
    pub fn score_decision<R: Rng>(
        &self,
        tags: &[DecisionTag],
        mood: &MoodState,
        rng: &mut R,
    ) -> f64 {
        let base: f64 = tags.iter().map(|tag| self.tag_score(*tag, mood)).sum();
        base + rng.gen_range(0.0..20.0)
    }

    fn tag_score(&self, tag: DecisionTag, mood: &MoodState) -> f64 {
        let high = |k: TraitKind| self.effective(k, mood) >= 70.0;
        let low = |k: TraitKind| self.effective(k, mood) <= 30.0;

        use TraitKind::*;
        match tag {
            DecisionTag::Novel => gate(high(Openness), 15.0) + gate(low(Openness), -10.0),
            DecisionTag::Familiar => gate(low(Openness), 10.0) + gate(high(Openness), -5.0),
            DecisionTag::Planned => {
                gate(high(Conscientiousness), 15.0) + gate(low(Conscientiousness), -10.0)
            }
            DecisionTag::Impulsive => {
                gate(low(Conscientiousness), 10.0) + gate(high(Conscientiousness), -10.0)
            }
            DecisionTag::Social => gate(high(Extraversion), 15.0) + gate(low(Extraversion), -10.0),
            DecisionTag::Solitary => gate(low(Extraversion), 10.0) + gate(high(Extraversion), -5.0),
            DecisionTag::Cooperative => {
                gate(high(Agreeableness), 10.0) + gate(low(Agreeableness), -5.0)
            }
            DecisionTag::Competitive => {
                gate(low(Agreeableness), 10.0) + gate(high(Agreeableness), -5.0)
            }
            DecisionTag::Safe => gate(high(Neuroticism), 10.0),
            DecisionTag::Risky => gate(high(Neuroticism), -15.0) + gate(low(Neuroticism), 10.0),
        }
    }
}

fn gate(condition: bool, value: f64) -> f64 {
    if condition {
        value
    } else {
        0.0
    }
}

impl Default for Personality {
    fn default() -> Self {
        Self::new(50.0, 50.0, 50.0, 50.0, 50.0)
    }
}

/// Fixed archetype presets used by character generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Adventurer,
    Scholar,
    Leader,
    Hermit,
    Merchant,
}

impl Archetype {
    pub fn preset(&self) -> Personality {
        match self {
            Archetype::Adventurer => Personality::new(85.0, 40.0, 75.0, 55.0, 30.0),
            Archetype::Scholar => Personality::new(80.0, 85.0, 30.0, 50.0, 45.0),
            Archetype::Leader => Personality::new(60.0, 75.0, 85.0, 60.0, 25.0),
            Archetype::Hermit => Personality::new(55.0, 60.0, 15.0, 40.0, 60.0),
            Archetype::Merchant => Personality::new(50.0, 70.0, 70.0, 45.0, 35.0),
        }
    }
}

/// Formative experiences that shift the OCEAN vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleEvent {
    Trauma,
    Mentorship,
    Betrayal,
    Triumph,
}

impl LifecycleEvent {
    fn trait_shifts(&self) -> &'static [(TraitKind, f64)] {
        use TraitKind::*;
        match self {
            // Trauma raises anxiety; higher neuroticism = more anxious.
            LifecycleEvent::Trauma => &[(Neuroticism, 20.0)],
            LifecycleEvent::Mentorship => &[(Conscientiousness, 10.0), (Openness, 5.0)],
            LifecycleEvent::Betrayal => &[(Agreeableness, -15.0)],
            LifecycleEvent::Triumph => &[(Extraversion, 10.0), (Neuroticism, -5.0)],
        }
    }
}

/// Tags a candidate action can carry into decision scoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionTag {
    Novel,
    Familiar,
    Planned,
    Impulsive,
    Social,
    Solitary,
    Cooperative,
    Competitive,
    Safe,
    Risky,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::MoodKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn construction_clamps_to_range() {
        let p = Personality::new(150.0, -20.0, 50.0, 50.0, 50.0);
        assert_eq!(p.openness, 100.0);
        assert_eq!(p.conscientiousness, 0.0);
    }

    #[test]
    fn trauma_raises_neuroticism_by_twenty() {
        let mut p = Personality::new(50.0, 50.0, 50.0, 50.0, 50.0);
        p.apply_experience(LifecycleEvent::Trauma);
        assert_eq!(p.neuroticism, 70.0);
        p.apply_experience(LifecycleEvent::Trauma);
        p.apply_experience(LifecycleEvent::Trauma);
        assert_eq!(p.neuroticism, 100.0);
    }

    #[test]
    fn betrayal_lowers_agreeableness() {
        let mut p = Personality::default();
        p.apply_experience(LifecycleEvent::Betrayal);
        assert_eq!(p.agreeableness, 35.0);
    }

    #[test]
    fn archetype_presets_are_distinct() {
        let presets: Vec<Personality> = [
            Archetype::Adventurer,
            Archetype::Scholar,
            Archetype::Leader,
            Archetype::Hermit,
            Archetype::Merchant,
        ]
        .iter()
        .map(|a| a.preset())
        .collect();
        for i in 0..presets.len() {
            for j in (i + 1)..presets.len() {
                assert_ne!(presets[i], presets[j]);
            }
        }
    }

    #[test]
    fn open_minds_favor_novelty() {
        let open = Personality::new(90.0, 50.0, 50.0, 50.0, 50.0);
        let closed = Personality::new(10.0, 50.0, 50.0, 50.0, 50.0);
        let calm = MoodState::calm();

        // Strip the random component by comparing many rolls in aggregate.
        let mut rng = StdRng::seed_from_u64(11);
        let open_total: f64 = (0..200)
            .map(|_| open.score_decision(&[DecisionTag::Novel], &calm, &mut rng))
            .sum();
        let closed_total: f64 = (0..200)
            .map(|_| closed.score_decision(&[DecisionTag::Novel], &calm, &mut rng))
            .sum();
        assert!(open_total > closed_total);
    }

    #[test]
    fn mood_modifier_can_flip_a_gate() {
        // Extraversion 65 misses the >=70 gate until an excited mood adds 10.
        let p = Personality::new(50.0, 50.0, 65.0, 50.0, 50.0);
        let calm = MoodState::calm();
        let excited = MoodState::trigger(MoodKind::Excited, 4.0, &p);

        assert_eq!(p.tag_score(DecisionTag::Social, &calm), 0.0);
        assert_eq!(p.tag_score(DecisionTag::Social, &excited), 15.0);
    }

    #[test]
    fn score_includes_bounded_jitter() {
        let p = Personality::default();
        let calm = MoodState::calm();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let s = p.score_decision(&[], &calm, &mut rng);
            assert!((0.0..20.0).contains(&s));
        }
    }
}
