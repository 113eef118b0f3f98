//! Desire engine - need accumulation, priority scoring, intent interrupts

use crate::personality::{Personality, TraitKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Need names shared with intent selection and the prompt builder.
pub const HUNGER: &str = "hunger";
pub const THIRST: &str = "thirst";
pub const SLEEP: &str = "sleep";
pub const SAFETY: &str = "safety";
pub const COMPANIONSHIP: &str = "companionship";
pub const CONVERSATION: &str = "conversation";
pub const AFFECTION: &str = "affection";
pub const TASK_COMPLETION: &str = "task_completion";
pub const SKILL_IMPROVEMENT: &str = "skill_improvement";
pub const RESOURCE_ACQUISITION: &str = "resource_acquisition";
pub const CURIOSITY: &str = "curiosity";
pub const HEDONISM: &str = "hedonism";
pub const CREATIVITY: &str = "creativity";

/// A need reaches critical urgency here; critical survival needs interrupt
/// any current intent.
const CRITICAL_VALUE: f64 = 90.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeedTier {
    Survival,
    Social,
    Achievement,
    Pleasure,
}

impl NeedTier {
    pub fn multiplier(&self) -> f64 {
        match self {
            NeedTier::Survival => 4.0,
            NeedTier::Social => 2.0,
            NeedTier::Achievement => 1.5,
            NeedTier::Pleasure => 1.0,
        }
    }

    /// The trait that weights needs of this tier: `0.5 + trait`.
    fn weighting_trait(&self) -> TraitKind {
        match self {
            NeedTier::Survival => TraitKind::Neuroticism,
            NeedTier::Social => TraitKind::Extraversion,
            NeedTier::Achievement => TraitKind::Conscientiousness,
            NeedTier::Pleasure => TraitKind::Openness,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Need {
    pub value: f64,
    pub tier: NeedTier,
    /// Per-hour growth rate, exposed for retuning against the game clock.
    pub base_decay_rate: f64,
}

impl Need {
    fn new(tier: NeedTier, base_decay_rate: f64) -> Self {
        Self {
            value: 0.0,
            tier,
            base_decay_rate,
        }
    }

    pub fn is_critical_survival(&self) -> bool {
        self.tier == NeedTier::Survival && self.value >= CRITICAL_VALUE
    }
}

/// Situational inputs to one desire tick.
#[derive(Clone, Debug, Default)]
pub struct TickContext {
    pub eating: bool,
    pub drinking: bool,
    pub asleep: bool,
    pub in_combat: bool,
    pub location_danger: f64,
    pub hostile_count: u32,
    pub alone: bool,
    pub with_friends: bool,
    pub talking: bool,
    pub active_tasks: u32,
    pub wealth_percentile: f64,
    pub near_unexplored: bool,
    pub bored_hours: f64,
    pub idle: bool,
    pub creating: bool,
}

/// Per-NPC need map. Every mutation clamps back into [0, 100].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesireProfile {
    needs: BTreeMap<String, Need>,
}

impl DesireProfile {
    pub fn new() -> Self {
        let mut needs = BTreeMap::new();
        needs.insert(HUNGER.into(), Need::new(NeedTier::Survival, 1.0));
        needs.insert(THIRST.into(), Need::new(NeedTier::Survival, 1.5));
        needs.insert(SLEEP.into(), Need::new(NeedTier::Survival, 1.0));
        needs.insert(SAFETY.into(), Need::new(NeedTier::Survival, 0.0));
        needs.insert(COMPANIONSHIP.into(), Need::new(NeedTier::Social, 0.5));
        needs.insert(CONVERSATION.into(), Need::new(NeedTier::Social, 1.0));
        needs.insert(AFFECTION.into(), Need::new(NeedTier::Social, 0.2));
        needs.insert(TASK_COMPLETION.into(), Need::new(NeedTier::Achievement, 2.0));
        needs.insert(SKILL_IMPROVEMENT.into(), Need::new(NeedTier::Achievement, 0.3));
        needs.insert(
            RESOURCE_ACQUISITION.into(),
            Need::new(NeedTier::Achievement, 0.05),
        );
        needs.insert(CURIOSITY.into(), Need::new(NeedTier::Pleasure, 5.0));
        needs.insert(HEDONISM.into(), Need::new(NeedTier::Pleasure, 2.0));
        needs.insert(CREATIVITY.into(), Need::new(NeedTier::Pleasure, 0.5));
        Self { needs }
    }

    pub fn get(&self, name: &str) -> Option<&Need> {
        self.needs.get(name)
    }

    pub fn value(&self, name: &str) -> f64 {
        self.needs.get(name).map(|n| n.value).unwrap_or(0.0)
    }

    fn adjust(&mut self, name: &str, delta: f64) {
        if let Some(need) = self.needs.get_mut(name) {
            need.value = (need.value + delta).clamp(0.0, 100.0);
        }
    }

    fn set(&mut self, name: &str, value: f64) {
        if let Some(need) = self.needs.get_mut(name) {
            need.value = value.clamp(0.0, 100.0);
        }
    }

    fn rate(&self, name: &str) -> f64 {
        self.needs.get(name).map(|n| n.base_decay_rate).unwrap_or(0.0)
    }

    /// Advance every need by `delta_hours` under the situational context.
    pub fn tick(&mut self, personality: &Personality, ctx: &TickContext, delta_hours: f64) {
        let dt = delta_hours.max(0.0);
        let e = personality.normalized(TraitKind::Extraversion);
        let c = personality.normalized(TraitKind::Conscientiousness);
        let o = personality.normalized(TraitKind::Openness);

        // Survival
        if !ctx.eating {
            self.adjust(HUNGER, self.rate(HUNGER) * dt);
        }
        if !ctx.drinking {
            self.adjust(THIRST, self.rate(THIRST) * dt);
        }
        if ctx.asleep {
            self.adjust(SLEEP, -10.0 * dt);
        } else {
            self.adjust(SLEEP, self.rate(SLEEP) * dt);
        }
        if ctx.in_combat {
            self.set(SAFETY, 100.0);
        } else {
            self.set(SAFETY, ctx.location_danger + 10.0 * f64::from(ctx.hostile_count));
        }

        // Social
        if ctx.alone {
            self.adjust(COMPANIONSHIP, self.rate(COMPANIONSHIP) * (0.5 + e) * dt);
        } else if ctx.with_friends {
            self.adjust(COMPANIONSHIP, -5.0 * dt);
        }
        if ctx.talking {
            self.adjust(CONVERSATION, -20.0 * dt);
        } else {
            self.adjust(CONVERSATION, self.rate(CONVERSATION) * (1.0 + e) * dt);
        }
        self.adjust(AFFECTION, self.rate(AFFECTION) * dt);

        // Achievement
        self.adjust(
            TASK_COMPLETION,
            self.rate(TASK_COMPLETION) * f64::from(ctx.active_tasks) * (1.0 + c) * dt,
        );
        self.adjust(SKILL_IMPROVEMENT, self.rate(SKILL_IMPROVEMENT) * o * dt);
        if ctx.wealth_percentile < 50.0 {
            self.adjust(
                RESOURCE_ACQUISITION,
                (50.0 - ctx.wealth_percentile) * self.rate(RESOURCE_ACQUISITION) * dt,
            );
        }

        // Pleasure
        if ctx.near_unexplored {
            self.adjust(CURIOSITY, self.rate(CURIOSITY) * o * dt);
        }
        if ctx.bored_hours >= 2.0 {
            self.adjust(HEDONISM, self.rate(HEDONISM) * (e + (1.0 - c)) * dt);
        }
        if ctx.creating {
            self.adjust(CREATIVITY, -10.0 * dt);
        } else if ctx.idle {
            self.adjust(CREATIVITY, self.rate(CREATIVITY) * o * dt);
        }
    }

    // Discrete satisfaction events.

    pub fn on_positive_interaction(&mut self) {
        self.adjust(AFFECTION, -10.0);
    }

    pub fn on_task_completed(&mut self) {
        self.adjust(TASK_COMPLETION, -30.0);
    }

    pub fn on_practice(&mut self) {
        self.adjust(SKILL_IMPROVEMENT, -10.0);
    }

    /// The raw highest-value need, as intent selection reads it.
    pub fn top_need(&self) -> Option<(&str, &Need)> {
        self.needs
            .iter()
            .max_by(|a, b| a.1.value.total_cmp(&b.1.value))
            .map(|(k, v)| (k.as_str(), v))
    }

    /// `value * (0.5 + tier trait) * tier multiplier`.
    pub fn score(&self, name: &str, personality: &Personality) -> f64 {
        match self.needs.get(name) {
            Some(need) => {
                let weight = 0.5 + personality.normalized(need.tier.weighting_trait());
                need.value * weight * need.tier.multiplier()
            }
            None => 0.0,
        }
    }

    /// All needs, highest score first.
    pub fn sorted_by_priority(&self, personality: &Personality) -> Vec<(String, f64)> {
        let mut scored: Vec<(String, f64)> = self
            .needs
            .keys()
            .map(|name| (name.clone(), self.score(name, personality)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
    }

    /// A candidate replaces the current intent when its score doubles the
    /// current one, or when it is a critical survival need.
    pub fn should_interrupt(&self, current_score: f64, candidate: &str, personality: &Personality) -> bool {
        let candidate_score = self.score(candidate, personality);
        if candidate_score > 2.0 * current_score {
            return true;
        }
        self.needs
            .get(candidate)
            .map(|n| n.is_critical_survival())
            .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Need)> {
        self.needs.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Default for DesireProfile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steady() -> Personality {
        Personality::new(50.0, 50.0, 50.0, 50.0, 50.0)
    }

    #[test]
    fn hunger_grows_hourly_unless_eating() {
        let mut profile = DesireProfile::new();
        profile.tick(&steady(), &TickContext::default(), 10.0);
        assert_eq!(profile.value(HUNGER), 10.0);

        let eating = TickContext {
            eating: true,
            ..Default::default()
        };
        profile.tick(&steady(), &eating, 5.0);
        assert_eq!(profile.value(HUNGER), 10.0);
    }

    #[test]
    fn thirst_outpaces_hunger() {
        let mut profile = DesireProfile::new();
        profile.tick(&steady(), &TickContext::default(), 10.0);
        assert_eq!(profile.value(THIRST), 15.0);
    }

    #[test]
    fn sleep_recovers_fast_while_asleep() {
        let mut profile = DesireProfile::new();
        profile.tick(&steady(), &TickContext::default(), 30.0);
        assert_eq!(profile.value(SLEEP), 30.0);

        let asleep = TickContext {
            asleep: true,
            ..Default::default()
        };
        profile.tick(&steady(), &asleep, 2.0);
        assert_eq!(profile.value(SLEEP), 10.0);
    }

    #[test]
    fn safety_is_context_dominated() {
        let mut profile = DesireProfile::new();
        let combat = TickContext {
            in_combat: true,
            ..Default::default()
        };
        profile.tick(&steady(), &combat, 1.0);
        assert_eq!(profile.value(SAFETY), 100.0);

        let hostile = TickContext {
            location_danger: 20.0,
            hostile_count: 3,
            ..Default::default()
        };
        profile.tick(&steady(), &hostile, 1.0);
        assert_eq!(profile.value(SAFETY), 50.0);
    }

    #[test]
    fn extraverts_crave_company_faster() {
        let extravert = Personality::new(50.0, 50.0, 100.0, 50.0, 50.0);
        let introvert = Personality::new(50.0, 50.0, 0.0, 50.0, 50.0);
        let alone = TickContext {
            alone: true,
            ..Default::default()
        };

        let mut a = DesireProfile::new();
        let mut b = DesireProfile::new();
        a.tick(&extravert, &alone, 10.0);
        b.tick(&introvert, &alone, 10.0);
        assert_eq!(a.value(COMPANIONSHIP), 7.5);
        assert_eq!(b.value(COMPANIONSHIP), 2.5);
    }

    #[test]
    fn talking_burns_conversation_need() {
        let mut profile = DesireProfile::new();
        profile.tick(&steady(), &TickContext::default(), 20.0);
        let before = profile.value(CONVERSATION);
        assert!(before > 0.0);

        let talking = TickContext {
            talking: true,
            ..Default::default()
        };
        profile.tick(&steady(), &talking, 2.0);
        assert_eq!(profile.value(CONVERSATION), (before - 40.0).max(0.0));
    }

    #[test]
    fn values_clamp_to_band() {
        let mut profile = DesireProfile::new();
        profile.tick(&steady(), &TickContext::default(), 1000.0);
        for (_, need) in profile.iter() {
            assert!((0.0..=100.0).contains(&need.value));
        }
    }

    #[test]
    fn resource_need_only_for_the_poor() {
        let rich = TickContext {
            wealth_percentile: 80.0,
            ..Default::default()
        };
        let poor = TickContext {
            wealth_percentile: 10.0,
            ..Default::default()
        };
        let mut a = DesireProfile::new();
        let mut b = DesireProfile::new();
        a.tick(&steady(), &rich, 10.0);
        b.tick(&steady(), &poor, 10.0);
        assert_eq!(a.value(RESOURCE_ACQUISITION), 0.0);
        assert_eq!(b.value(RESOURCE_ACQUISITION), 20.0);
    }

    #[test]
    fn survival_tier_dominates_scoring() {
        let mut profile = DesireProfile::new();
        profile.set(HUNGER, 50.0);
        profile.set(CURIOSITY, 50.0);
        let p = steady();
        let order = profile.sorted_by_priority(&p);
        let hunger_pos = order.iter().position(|(n, _)| n == HUNGER).unwrap();
        let curiosity_pos = order.iter().position(|(n, _)| n == CURIOSITY).unwrap();
        assert!(hunger_pos < curiosity_pos);
    }

    #[test]
    fn interrupt_on_double_or_critical_survival() {
        let mut profile = DesireProfile::new();
        let p = steady();

        profile.set(CURIOSITY, 80.0);
        let current = profile.score(CURIOSITY, &p);

        profile.set(CONVERSATION, 30.0);
        assert!(!profile.should_interrupt(current, CONVERSATION, &p));

        profile.set(HUNGER, 95.0);
        assert!(profile.should_interrupt(current, HUNGER, &p));

        // Critical survival interrupts regardless of score ratio.
        profile.set(THIRST, 92.0);
        assert!(profile.should_interrupt(f64::MAX / 8.0, THIRST, &p));
    }

    #[test]
    fn discrete_events_relieve_needs() {
        let mut profile = DesireProfile::new();
        profile.set(AFFECTION, 30.0);
        profile.on_positive_interaction();
        assert_eq!(profile.value(AFFECTION), 20.0);

        profile.set(TASK_COMPLETION, 40.0);
        profile.on_task_completed();
        assert_eq!(profile.value(TASK_COMPLETION), 10.0);

        profile.set(SKILL_IMPROVEMENT, 5.0);
        profile.on_practice();
        assert_eq!(profile.value(SKILL_IMPROVEMENT), 0.0);
    }
}
