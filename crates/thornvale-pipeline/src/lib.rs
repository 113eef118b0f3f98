//! Thornvale Pipeline - throughput control between the world and the LLM
//!
//! Four bounded priority bands feed a semaphore-bounded worker pool; a tick
//! scheduler shards per-entity AI work across frames; a degradation
//! controller downgrades to template fallbacks when the backend sours.

pub mod degrade;
pub mod queue;
pub mod scheduler;
pub mod worker;

pub use degrade::{
    fallback_template, run_monitor, DegradationConfig, DegradationController, FallbackDomain,
    ServiceTier,
};
pub use queue::{QueueError, RequestQueue};
pub use scheduler::TickScheduler;
pub use worker::{JobHandler, WorkerPool};
