//! Core types: character model, request/response wire types, priority bands

use crate::ids::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base attribute vector: fifteen signed integers bucketed into
/// physical, mental, and sensory groups of five.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    // Physical
    pub might: i32,
    pub agility: i32,
    pub endurance: i32,
    pub vitality: i32,
    pub speed: i32,
    // Mental
    pub intellect: i32,
    pub willpower: i32,
    pub cunning: i32,
    pub presence: i32,
    pub discipline: i32,
    // Sensory
    pub perception: i32,
    pub intuition: i32,
    pub attunement: i32,
    pub awareness: i32,
    pub empathy: i32,
}

impl Attributes {
    pub fn physical_sum(&self) -> i32 {
        self.might + self.agility + self.endurance + self.vitality + self.speed
    }

    pub fn mental_sum(&self) -> i32 {
        self.intellect + self.willpower + self.cunning + self.presence + self.discipline
    }

    pub fn sensory_sum(&self) -> i32 {
        self.perception + self.intuition + self.attunement + self.awareness + self.empathy
    }
}

/// Derived secondary pool maxima, computed once from the attribute vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryPools {
    pub hp_max: i32,
    pub stamina_max: i32,
    pub focus_max: i32,
    pub mana_max: i32,
    pub nerve_max: i32,
}

impl SecondaryPools {
    pub fn derive(attrs: &Attributes) -> Self {
        Self {
            hp_max: 20 + 3 * attrs.vitality + attrs.endurance,
            stamina_max: 15 + 2 * attrs.endurance + attrs.agility,
            focus_max: 15 + 2 * attrs.discipline + attrs.intellect,
            mana_max: 10 + 2 * attrs.attunement + attrs.willpower,
            nerve_max: 10 + 2 * attrs.willpower + attrs.presence,
        }
    }
}

/// Stable character identity. Created once, never destroyed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Character {
    pub id: EntityId,
    pub name: String,
    pub species: String,
    pub attributes: Attributes,
    pub pools: SecondaryPools,
}

impl Character {
    pub fn new(name: impl Into<String>, species: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            species: species.into(),
            pools: SecondaryPools::derive(&attributes),
            attributes,
        }
    }
}

/// Priority bands for generation requests. Strict ordering between bands,
/// FIFO within a band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Normal,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Normal,
        Priority::Low,
    ];

    pub fn index(&self) -> usize {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Normal => 2,
            Priority::Low => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generation request as carried on the wire: `ai.request.<id>`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AiRequest {
    #[serde(default)]
    pub id: String,
    pub prompt: String,
    #[serde(default)]
    pub model: String,
}

/// A generation response published to the reply subject.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AiResponse {
    pub id: String,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AiResponse {
    pub fn ok(id: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            response: response.into(),
            error: None,
        }
    }

    pub fn err(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            response: String::new(),
            error: Some(error.into()),
        }
    }
}

/// A request bound to its reply address and priority band, as held by the
/// queue and the worker pool.
#[derive(Clone, Debug)]
pub struct AiJob {
    pub request: AiRequest,
    pub reply: String,
    pub priority: Priority,
    pub enqueued_at: DateTime<Utc>,
}

impl AiJob {
    pub fn new(request: AiRequest, reply: impl Into<String>, priority: Priority) -> Self {
        Self {
            request,
            reply: reply.into(),
            priority,
            enqueued_at: Utc::now(),
        }
    }
}

/// The public result of the per-utterance dialogue pipeline. Never an error
/// for LLM or parse failures - those surface as `used_fallback`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DialogueResponse {
    pub text: String,
    pub emotional_reaction: String,
    pub emotional_weight: f64,
    pub used_fallback: bool,
}
