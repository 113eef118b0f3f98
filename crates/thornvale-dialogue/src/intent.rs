//! Intent selection from the desire profile

use thornvale_mind::desire::{
    DesireProfile, COMPANIONSHIP, HUNGER, SAFETY, TASK_COMPLETION,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntentKind {
    SeekingFood,
    SeekingConnection,
    SeekingSafety,
    FocusedOnGoal,
    Neutral,
}

impl IntentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::SeekingFood => "seeking_food",
            IntentKind::SeekingConnection => "seeking_connection",
            IntentKind::SeekingSafety => "seeking_safety",
            IntentKind::FocusedOnGoal => "focused_on_goal",
            IntentKind::Neutral => "neutral",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Intent {
    pub kind: IntentKind,
    /// Human-readable descriptor woven into the prompt's current-state line.
    pub descriptor: &'static str,
}

impl Intent {
    fn new(kind: IntentKind, descriptor: &'static str) -> Self {
        Self { kind, descriptor }
    }
}

/// Inspect the highest-value need and map it through fixed thresholds.
pub fn select_intent(profile: &DesireProfile) -> Intent {
    let Some((name, need)) = profile.top_need() else {
        return Intent::new(IntentKind::Neutral, "going about their day");
    };

    match name {
        HUNGER if need.value > 70.0 => Intent::new(
            IntentKind::SeekingFood,
            "distracted by hunger, thinking about their next meal",
        ),
        COMPANIONSHIP if need.value > 60.0 => Intent::new(
            IntentKind::SeekingConnection,
            "lonely and eager for company",
        ),
        SAFETY if need.value > 50.0 => Intent::new(
            IntentKind::SeekingSafety,
            "on edge, watching for danger",
        ),
        TASK_COMPLETION if need.value > 60.0 => Intent::new(
            IntentKind::FocusedOnGoal,
            "preoccupied with an unfinished task",
        ),
        _ => Intent::new(IntentKind::Neutral, "going about their day"),
    }
}
