//! Memory engine - decay, corruption, consolidation, retrieval
//!
//! Memories decay daily toward a clarity floor, consolidate when recent and
//! emotionally heavy, and corrupt probabilistically when accessed at low
//! clarity. The daily schedulers live outside the core; these are the pure
//! functions they invoke.

use crate::emotion::EmotionProfile;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thornvale_core::EntityId;

/// Base clarity loss per day before emotional weighting.
const BASE_DECAY_RATE: f64 = 0.001;
/// Clarity never decays below this floor.
const CLARITY_FLOOR: f64 = 0.1;
/// Corruption probability per access is this factor times (1 - clarity).
const CORRUPTION_FACTOR: f64 = 0.05;
/// Consolidation considers memories from the last day.
const CONSOLIDATION_WINDOW_HOURS: i64 = 24;
/// Only emotionally heavy memories consolidate.
const CONSOLIDATION_WEIGHT_GATE: f64 = 0.6;
/// Retention score below which a memory may be evicted.
const RETENTION_FLOOR: f64 = 0.15;
/// Emotion-congruent recall threshold.
const SIMILARITY_GATE: f64 = 0.6;
/// Congruent recall returns at most this many memories.
const RECALL_LIMIT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryKind {
    Observation,
    Conversation,
    Event,
    Relationship,
}

impl MemoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryKind::Observation => "observation",
            MemoryKind::Conversation => "conversation",
            MemoryKind::Event => "event",
            MemoryKind::Relationship => "relationship",
        }
    }
}

/// What a memory is about. The serde tag is the persisted discriminator and
/// must round-trip through the document store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MemoryContent {
    Observation {
        x: f64,
        y: f64,
        description: String,
    },
    Conversation {
        participant: EntityId,
        heard: String,
        spoken: String,
        outcome: String,
        topic: String,
    },
    Event {
        description: String,
    },
    Relationship {
        target: EntityId,
        affinity_shift: f64,
    },
}

impl MemoryContent {
    pub fn kind(&self) -> MemoryKind {
        match self {
            MemoryContent::Observation { .. } => MemoryKind::Observation,
            MemoryContent::Conversation { .. } => MemoryKind::Conversation,
            MemoryContent::Event { .. } => MemoryKind::Event,
            MemoryContent::Relationship { .. } => MemoryKind::Relationship,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub id: EntityId,
    pub owner: EntityId,
    pub timestamp: DateTime<Utc>,
    pub clarity: f64,
    pub emotional_weight: f64,
    pub dominant_emotion: String,
    pub emotions: EmotionProfile,
    pub access_count: u32,
    pub last_accessed: DateTime<Utc>,
    pub content: MemoryContent,
    /// Set exactly once, on first corruption.
    pub original_content: Option<MemoryContent>,
    pub corrupted: bool,
    pub tags: BTreeSet<String>,
    pub related: BTreeSet<EntityId>,
}

impl Memory {
    pub fn new(
        owner: EntityId,
        content: MemoryContent,
        emotions: EmotionProfile,
        emotional_weight: f64,
        now: DateTime<Utc>,
    ) -> Self {
        let dominant_emotion = emotions
            .dominant()
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| "neutral".to_string());
        Self {
            id: EntityId::new(),
            owner,
            timestamp: now,
            clarity: 1.0,
            emotional_weight: emotional_weight.clamp(0.0, 1.0),
            dominant_emotion,
            emotions,
            access_count: 0,
            last_accessed: now,
            content,
            original_content: None,
            corrupted: false,
            tags: BTreeSet::new(),
            related: BTreeSet::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn kind(&self) -> MemoryKind {
        self.content.kind()
    }

    fn age_days(&self, now: DateTime<Utc>) -> f64 {
        ((now - self.timestamp).num_seconds().max(0) as f64) / 86_400.0
    }

    fn recency(&self, now: DateTime<Utc>) -> f64 {
        (1.0 - self.age_days(now) / 365.0).max(0.0)
    }

    fn access_norm(&self) -> f64 {
        (f64::from(self.access_count) / 10.0).min(1.0)
    }

    /// Clarity after decay to `now`. Emotional weight slows decay, rehearsal
    /// (access count) slows it further, and the floor holds at 0.1.
    pub fn calculate_current_clarity(&self, now: DateTime<Utc>) -> f64 {
        let effective_rate = BASE_DECAY_RATE * (1.0 - 0.5 * self.emotional_weight);
        let rehearsal_bonus = (f64::from(self.access_count) / 20.0).min(0.5);
        let total_decay = effective_rate * self.age_days(now) * (1.0 - rehearsal_bonus);
        (self.clarity * (1.0 - total_decay)).max(CLARITY_FLOOR)
    }

    /// The daily decay pass: fold accumulated decay into stored clarity.
    pub fn apply_decay(&mut self, now: DateTime<Utc>) {
        self.clarity = self.calculate_current_clarity(now);
    }

    pub fn record_access(&mut self, now: DateTime<Utc>) {
        self.access_count = self.access_count.saturating_add(1);
        self.last_accessed = now;
    }

    /// Roll for corruption on access. Returns whether the memory corrupted
    /// this call. Already-corrupted memories never re-roll.
    pub fn check_and_corrupt<R: Rng>(&mut self, rng: &mut R) -> bool {
        if self.corrupted || self.clarity >= 1.0 {
            return false;
        }
        if rng.gen::<f64>() >= CORRUPTION_FACTOR * (1.0 - self.clarity) {
            return false;
        }

        self.original_content = Some(self.content.clone());
        match &mut self.content {
            MemoryContent::Observation { x, y, description } => {
                if rng.gen_bool(0.5) {
                    *x += rng.gen_range(-5.0..=5.0);
                    *y += rng.gen_range(-5.0..=5.0);
                } else {
                    *description =
                        "Something happened there, though the details have gone soft.".to_string();
                }
            }
            MemoryContent::Conversation { outcome, .. } => {
                if rng.gen_bool(0.5) {
                    *outcome = "uncertain".to_string();
                } else {
                    let shift = if rng.gen_bool(0.5) { 0.1 } else { -0.1 };
                    self.emotional_weight = (self.emotional_weight + shift).clamp(0.0, 1.0);
                }
            }
            MemoryContent::Event { description } => {
                *description = "The day blurred together with others like it.".to_string();
            }
            MemoryContent::Relationship { affinity_shift, .. } => {
                *affinity_shift += rng.gen_range(-10.0..=10.0);
            }
        }
        self.corrupted = true;
        true
    }

    /// Retrieval relevance against a tag query.
    pub fn relevance_score(&self, now: DateTime<Utc>, query_tags: &BTreeSet<String>) -> f64 {
        let context_match = if query_tags.is_empty() {
            0.0
        } else {
            let hits = self.tags.intersection(query_tags).count() as f64;
            hits / query_tags.len() as f64
        };
        0.3 * self.recency(now)
            + 0.4 * self.emotional_weight
            + 0.1 * self.access_norm()
            + 0.2 * context_match
    }

    /// Retention score; below the floor the memory is eligible for eviction.
    pub fn importance(&self, now: DateTime<Utc>) -> f64 {
        self.clarity * self.emotional_weight * (1.0 + self.recency(now) + self.access_norm())
    }

    pub fn is_evictable(&self, now: DateTime<Utc>) -> bool {
        self.importance(now) < RETENTION_FLOOR
    }
}

/// Boost clarity of recent, emotionally heavy memories. Runs after the daily
/// decay pass on the same schedule.
pub fn consolidate_memories(memories: &mut [Memory], now: DateTime<Utc>) {
    let window = chrono::Duration::hours(CONSOLIDATION_WINDOW_HOURS);
    for memory in memories.iter_mut() {
        if now - memory.timestamp <= window && memory.emotional_weight > CONSOLIDATION_WEIGHT_GATE {
            memory.clarity = (memory.clarity + 0.1 * memory.emotional_weight).min(1.0);
        }
    }
}

/// Tag-based retrieval: highest relevance first, up to `limit`.
pub fn recall_relevant<'a>(
    memories: &'a [Memory],
    now: DateTime<Utc>,
    query_tags: &BTreeSet<String>,
    limit: usize,
) -> Vec<&'a Memory> {
    let mut scored: Vec<(&Memory, f64)> = memories
        .iter()
        .map(|m| (m, m.relevance_score(now, query_tags)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.into_iter().take(limit).map(|(m, _)| m).collect()
}

/// Emotion-congruent recall: memories whose emotional shape matches the
/// current profile, ranked by similarity, importance, and recency.
pub fn recall_congruent<'a>(
    memories: &'a [Memory],
    current: &EmotionProfile,
    now: DateTime<Utc>,
) -> Vec<&'a Memory> {
    let mut scored: Vec<(&Memory, f64)> = memories
        .iter()
        .filter_map(|m| {
            let similarity = m.emotions.similarity(current);
            if similarity < SIMILARITY_GATE {
                return None;
            }
            let rank = 0.5 * similarity + 0.3 * m.importance(now) + 0.2 * m.recency(now);
            Some((m, rank))
        })
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.into_iter().take(RECALL_LIMIT).map(|(m, _)| m).collect()
}
