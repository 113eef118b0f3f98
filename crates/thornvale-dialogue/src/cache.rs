//! Fingerprint caches - TTL caches keyed by bucketed context hashes
//!
//! Two single-tier caches share one structure: the dialogue cache (10 min
//! TTL) keyed by npc/speaker/topic plus a context hash over the NPC's
//! mutable state, and the area cache (60 min TTL) keyed by position, weather,
//! time, season, and a perception bucket. Expiry is lazy on read.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use thornvale_core::EntityId;

pub const DIALOGUE_CACHE_TTL: Duration = Duration::from_secs(10 * 60);
pub const AREA_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// Fingerprint of the mutable NPC state a dialogue line depends on.
/// Affinity components are rounded to integers so sub-point drift does not
/// fragment the cache.
pub fn context_hash(
    mood: &str,
    desire: &str,
    affection: f64,
    trust: f64,
    fear: f64,
    drift_level: &str,
) -> String {
    sha256_hex(&format!(
        "{mood}:{desire}:{}:{}:{}:{drift_level}",
        affection.round() as i64,
        trust.round() as i64,
        fear.round() as i64,
    ))
}

pub fn dialogue_key(npc: EntityId, speaker: EntityId, topic: &str, context_hash: &str) -> String {
    sha256_hex(&format!("{npc}:{speaker}:{topic}:{context_hash}"))
}

/// Perception collapses to four bands: [0,25], (25,50], (50,75], (75,100].
pub fn perception_bucket(perception: f64) -> u8 {
    if perception <= 25.0 {
        0
    } else if perception <= 50.0 {
        1
    } else if perception <= 75.0 {
        2
    } else {
        3
    }
}

#[allow(clippy::too_many_arguments)]
pub fn area_key(
    area: &str,
    world_id: &str,
    x: i64,
    y: i64,
    z: i64,
    weather: &str,
    time_of_day: &str,
    season: &str,
    perception: f64,
) -> String {
    sha256_hex(&format!(
        "{area}:{world_id}:{x}:{y}:{z}:{weather}:{time_of_day}:{season}:{}",
        perception_bucket(perception)
    ))
}

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// Single-tier TTL cache. Readers share the lock; writers exclude each
/// other. No background eviction - expired entries die on read.
pub struct FingerprintCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl FingerprintCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn dialogue() -> Self {
        Self::new(DIALOGUE_CACHE_TTL)
    }

    pub fn area() -> Self {
        Self::new(AREA_CACHE_TTL)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(key)?;
        if Instant::now() <= entry.expires_at {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Insert unconditionally with a fresh TTL.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                key.into(),
                CacheEntry {
                    value: value.into(),
                    expires_at: Instant::now() + self.ttl,
                },
            );
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
