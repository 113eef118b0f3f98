//! Repository contracts the dialogue pipeline requires
//!
//! Implementations live outside the core (document store, relational store).
//! Relationships are created lazily on first interaction; direct fetches of
//! missing rows return `NotFound`.

use async_trait::async_trait;
use thornvale_core::{Character, EntityId};
use thornvale_mind::{
    BehavioralProfile, DesireProfile, DriftMetrics, Memory, MoodState, Personality, Relationship,
};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: EntityId },

    #[error("backend error: {0}")]
    Backend(String),
}

impl RepositoryError {
    pub fn not_found(kind: &'static str, id: EntityId) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn backend(reason: impl Into<String>) -> Self {
        Self::Backend(reason.into())
    }
}

/// Drift state alongside the profiles it was computed from, as the prompt
/// builder wants them.
#[derive(Clone, Debug)]
pub struct DriftSnapshot {
    pub metrics: DriftMetrics,
    pub baseline: BehavioralProfile,
    pub current: BehavioralProfile,
}

#[async_trait]
pub trait CharacterStore: Send + Sync {
    async fn character(&self, id: EntityId) -> Result<Character, RepositoryError>;
    async fn personality(&self, id: EntityId) -> Result<Personality, RepositoryError>;
    async fn mood(&self, id: EntityId) -> Result<MoodState, RepositoryError>;
    async fn desires(&self, id: EntityId) -> Result<DesireProfile, RepositoryError>;
}

#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Most recent memories first.
    async fn recent(&self, owner: EntityId, limit: usize) -> Result<Vec<Memory>, RepositoryError>;
    async fn store(&self, memory: Memory) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait RelationshipStore: Send + Sync {
    /// The (npc, target) row, created lazily on first sight.
    async fn get_or_create(
        &self,
        npc: EntityId,
        target: EntityId,
    ) -> Result<Relationship, RepositoryError>;

    async fn save(&self, relationship: Relationship) -> Result<(), RepositoryError>;

    /// Current drift state for the NPC, if any observer has computed one.
    async fn drift(&self, npc: EntityId) -> Result<Option<DriftSnapshot>, RepositoryError>;
}
