//! Relationship engine - affinity, interaction history, behavioral baseline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thornvale_core::EntityId;

/// Recent-interaction ring and behavior-sample window share this capacity.
const WINDOW_CAPACITY: usize = 20;
/// Base affinity decay per day of inactivity (0.5 per 30 days).
const DAILY_DECAY: f64 = 0.5 / 30.0;
/// Long-term baseline EMA factor: `new = 0.9 * old + 0.1 * recent`.
const BASELINE_RETENTION: f64 = 0.9;

fn clamp_affinity(v: f64) -> f64 {
    v.clamp(-100.0, 100.0)
}

/// How one entity feels about another. Every component stays in
/// [-100, +100] after any mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Affinity {
    pub affection: f64,
    pub trust: f64,
    pub fear: f64,
}

impl Affinity {
    pub fn new(affection: f64, trust: f64, fear: f64) -> Self {
        Self {
            affection: clamp_affinity(affection),
            trust: clamp_affinity(trust),
            fear: clamp_affinity(fear),
        }
    }

    pub fn apply(&mut self, affection: f64, trust: f64, fear: f64) {
        self.affection = clamp_affinity(self.affection + affection);
        self.trust = clamp_affinity(self.trust + trust);
        self.fear = clamp_affinity(self.fear + fear);
    }
}

/// Observable behavioral expression, six dimensions in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BehavioralProfile {
    pub aggression: f64,
    pub generosity: f64,
    pub honesty: f64,
    pub sociability: f64,
    pub recklessness: f64,
    pub loyalty: f64,
}

impl BehavioralProfile {
    pub const DIMENSIONS: [&'static str; 6] = [
        "aggression",
        "generosity",
        "honesty",
        "sociability",
        "recklessness",
        "loyalty",
    ];

    pub fn get(&self, dimension: &str) -> f64 {
        match dimension {
            "aggression" => self.aggression,
            "generosity" => self.generosity,
            "honesty" => self.honesty,
            "sociability" => self.sociability,
            "recklessness" => self.recklessness,
            "loyalty" => self.loyalty,
            _ => 0.0,
        }
    }

    fn clamped(self) -> Self {
        Self {
            aggression: self.aggression.clamp(0.0, 1.0),
            generosity: self.generosity.clamp(0.0, 1.0),
            honesty: self.honesty.clamp(0.0, 1.0),
            sociability: self.sociability.clamp(0.0, 1.0),
            recklessness: self.recklessness.clamp(0.0, 1.0),
            loyalty: self.loyalty.clamp(0.0, 1.0),
        }
    }

    fn mean(samples: &VecDeque<BehavioralProfile>) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let n = samples.len() as f64;
        let mut sum = Self::default();
        for s in samples {
            sum.aggression += s.aggression;
            sum.generosity += s.generosity;
            sum.honesty += s.honesty;
            sum.sociability += s.sociability;
            sum.recklessness += s.recklessness;
            sum.loyalty += s.loyalty;
        }
        Self {
            aggression: sum.aggression / n,
            generosity: sum.generosity / n,
            honesty: sum.honesty / n,
            sociability: sum.sociability / n,
            recklessness: sum.recklessness / n,
            loyalty: sum.loyalty / n,
        }
    }

    fn blend(old: &Self, recent: &Self) -> Self {
        let keep = BASELINE_RETENTION;
        let take = 1.0 - BASELINE_RETENTION;
        Self {
            aggression: keep * old.aggression + take * recent.aggression,
            generosity: keep * old.generosity + take * recent.generosity,
            honesty: keep * old.honesty + take * recent.honesty,
            sociability: keep * old.sociability + take * recent.sociability,
            recklessness: keep * old.recklessness + take * recent.recklessness,
            loyalty: keep * old.loyalty + take * recent.loyalty,
        }
    }
}

/// Social actions with fixed affinity deltas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteractionKind {
    Gift { value: f64 },
    Compliment,
    Aid,
    Insult,
    Threat,
    Betrayal,
    Violence,
}

impl InteractionKind {
    /// (affection, trust, fear) deltas.
    fn deltas(&self) -> (f64, f64, f64) {
        match self {
            InteractionKind::Gift { value } => (value / 10.0, 5.0, 0.0),
            InteractionKind::Compliment => (5.0, 2.0, 0.0),
            InteractionKind::Aid => (5.0, 10.0, 0.0),
            InteractionKind::Insult => (-10.0, -5.0, 0.0),
            InteractionKind::Threat => (-5.0, -10.0, 15.0),
            InteractionKind::Betrayal => (-60.0, -50.0, 0.0),
            InteractionKind::Violence => (-40.0, -20.0, 30.0),
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            InteractionKind::Gift { .. } | InteractionKind::Compliment | InteractionKind::Aid
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub kind: InteractionKind,
    pub timestamp: DateTime<Utc>,
}

/// One directed relationship. At most one exists per (npc, target); the
/// repository creates them lazily on first interaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub npc: EntityId,
    pub target: EntityId,
    pub affinity: Affinity,
    pub baseline: BehavioralProfile,
    behavior_window: VecDeque<BehavioralProfile>,
    recent_interactions: VecDeque<Interaction>,
    pub last_interaction: DateTime<Utc>,
}

impl Relationship {
    pub fn new(npc: EntityId, target: EntityId, now: DateTime<Utc>) -> Self {
        Self {
            npc,
            target,
            affinity: Affinity::default(),
            baseline: BehavioralProfile::default(),
            behavior_window: VecDeque::with_capacity(WINDOW_CAPACITY),
            recent_interactions: VecDeque::with_capacity(WINDOW_CAPACITY),
            last_interaction: now,
        }
    }

    pub fn recent_interactions(&self) -> impl Iterator<Item = &Interaction> {
        self.recent_interactions.iter()
    }

    pub fn interaction_count(&self) -> usize {
        self.recent_interactions.len()
    }

    /// Apply an action's fixed deltas and record it in the bounded ring.
    pub fn apply_interaction(&mut self, kind: InteractionKind, now: DateTime<Utc>) {
        let (affection, trust, fear) = kind.deltas();
        self.affinity.apply(affection, trust, fear);

        if self.recent_interactions.len() == WINDOW_CAPACITY {
            self.recent_interactions.pop_front();
        }
        self.recent_interactions.push_back(Interaction {
            kind,
            timestamp: now,
        });
        self.last_interaction = now;
    }

    /// Decay affection and trust toward zero for `days` of inactivity.
    /// Strong bonds fade at half rate, enmity at double; fear never decays.
    pub fn decay_inactivity(&mut self, days: f64) {
        let rate = if self.affinity.affection > 75.0 {
            DAILY_DECAY * 0.5
        } else if self.affinity.affection < -50.0 {
            DAILY_DECAY * 2.0
        } else {
            DAILY_DECAY
        };
        let amount = rate * days.max(0.0);

        self.affinity.affection = toward_zero(self.affinity.affection, amount);
        self.affinity.trust = toward_zero(self.affinity.trust, amount);
    }

    /// Record a behavior sample into the rolling window.
    pub fn observe_behavior(&mut self, sample: BehavioralProfile) {
        if self.behavior_window.len() == WINDOW_CAPACITY {
            self.behavior_window.pop_front();
        }
        self.behavior_window.push_back(sample.clamped());
    }

    /// Rolling average over the last window of samples.
    pub fn current_behavior(&self) -> BehavioralProfile {
        BehavioralProfile::mean(&self.behavior_window)
    }

    /// Fold the rolling average into the long-term baseline:
    /// `new = 0.9 * old + 0.1 * recent`.
    pub fn roll_baseline(&mut self) {
        if self.behavior_window.is_empty() {
            return;
        }
        let recent = self.current_behavior();
        self.baseline = BehavioralProfile::blend(&self.baseline, &recent);
    }
}

fn toward_zero(value: f64, amount: f64) -> f64 {
    if value > 0.0 {
        (value - amount).max(0.0)
    } else if value < 0.0 {
        (value + amount).min(0.0)
    } else {
        0.0
    }
}
