//! Tick scheduler - shards per-entity AI work across frames
//!
//! N registered entities are spread over B buckets; tick `t` processes
//! bucket `t mod B`. Registration fills the least-loaded bucket, while
//! `rebuild_from_entities` sorts ids and deals them round-robin so bucket
//! assignment is reproducible across restarts.

use std::collections::HashMap;
use std::sync::RwLock;
use thornvale_core::EntityId;

pub const DEFAULT_BUCKETS: usize = 4;

struct Buckets {
    buckets: Vec<Vec<EntityId>>,
    index: HashMap<EntityId, usize>,
}

impl Buckets {
    fn new(count: usize) -> Self {
        Self {
            buckets: vec![Vec::new(); count.max(1)],
            index: HashMap::new(),
        }
    }

    fn redistribute(&mut self, mut entities: Vec<EntityId>, count: usize) {
        entities.sort();
        let mut fresh = Buckets::new(count);
        for (i, id) in entities.into_iter().enumerate() {
            let bucket = i % fresh.buckets.len();
            fresh.index.insert(id, bucket);
            fresh.buckets[bucket].push(id);
        }
        *self = fresh;
    }
}

pub struct TickScheduler {
    inner: RwLock<Buckets>,
}

impl TickScheduler {
    pub fn new(bucket_count: usize) -> Self {
        Self {
            inner: RwLock::new(Buckets::new(bucket_count)),
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.inner.read().map(|b| b.buckets.len()).unwrap_or(1)
    }

    pub fn entity_count(&self) -> usize {
        self.inner.read().map(|b| b.index.len()).unwrap_or(0)
    }

    /// Register an entity into the least-loaded bucket. Re-registering an
    /// already known id is a no-op.
    pub fn register(&self, id: EntityId) {
        let Ok(mut inner) = self.inner.write() else {
            return;
        };
        if inner.index.contains_key(&id) {
            return;
        }
        let bucket = inner
            .buckets
            .iter()
            .enumerate()
            .min_by_key(|(_, b)| b.len())
            .map(|(i, _)| i)
            .unwrap_or(0);
        inner.index.insert(id, bucket);
        inner.buckets[bucket].push(id);
    }

    /// Remove an entity: swap with the last element of its bucket, truncate.
    pub fn unregister(&self, id: EntityId) {
        let Ok(mut inner) = self.inner.write() else {
            return;
        };
        let Some(bucket) = inner.index.remove(&id) else {
            return;
        };
        if let Some(pos) = inner.buckets[bucket].iter().position(|e| *e == id) {
            inner.buckets[bucket].swap_remove(pos);
        }
    }

    /// Copy of the bucket eligible at tick `t`.
    pub fn entities_for_tick(&self, tick: u64) -> Vec<EntityId> {
        let Ok(inner) = self.inner.read() else {
            return Vec::new();
        };
        let bucket = (tick % inner.buckets.len() as u64) as usize;
        inner.buckets[bucket].clone()
    }

    /// O(1) check for a single entity at tick `t`.
    pub fn should_process(&self, tick: u64, id: EntityId) -> bool {
        let Ok(inner) = self.inner.read() else {
            return false;
        };
        match inner.index.get(&id) {
            Some(bucket) => *bucket as u64 == tick % inner.buckets.len() as u64,
            None => false,
        }
    }

    /// Deterministic rebuild: sort ids, deal round-robin.
    pub fn rebuild_from_entities(&self, ids: Vec<EntityId>) {
        let Ok(mut inner) = self.inner.write() else {
            return;
        };
        let count = inner.buckets.len();
        inner.redistribute(ids, count);
    }

    /// Change the bucket count and re-deal every registered entity.
    pub fn set_buckets(&self, count: usize) {
        let Ok(mut inner) = self.inner.write() else {
            return;
        };
        let entities: Vec<EntityId> = inner.buckets.iter().flatten().copied().collect();
        inner.redistribute(entities, count.max(1));
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKETS)
    }
}
