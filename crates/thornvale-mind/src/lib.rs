//! Thornvale Mind - the NPC cognitive state the request pipeline feeds
//!
//! Personality and genetics sit at the leaves; desire, emotion, memory, and
//! relationship state build on them; the dialogue layer reads all of it to
//! assemble prompts and writes back what the generated prose implies.

pub mod desire;
pub mod drift;
pub mod emotion;
pub mod genetics;
pub mod memory;
pub mod mood;
pub mod personality;
pub mod relationship;

pub use desire::{DesireProfile, Need, NeedTier, TickContext};
pub use drift::{compute_drift, react_to_drift, DriftLevel, DriftMetrics, DriftReaction};
pub use emotion::{analyze_event, infer_reaction, EmotionProfile, EmotionalEvent};
pub use genetics::{
    express, inherit, inherit_with_rate, maybe_mutate, Allele, Genome, TraitGenes,
    DEFAULT_MUTATION_RATE,
};
pub use memory::{
    consolidate_memories, recall_congruent, recall_relevant, Memory, MemoryContent, MemoryKind,
};
pub use mood::{MoodKind, MoodState};
pub use personality::{Archetype, DecisionTag, LifecycleEvent, Personality, TraitKind};
pub use relationship::{Affinity, BehavioralProfile, InteractionKind, Relationship};
