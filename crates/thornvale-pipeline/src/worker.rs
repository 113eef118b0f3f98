//! Semaphore-bounded worker pool
//!
//! A worker loop acquires a concurrency slot, fetches the highest-priority
//! job, and spawns the generation task; the slot is released when the task
//! finishes. Shutdown is cooperative: the quit token stops intake, then the
//! semaphore is drained so in-flight generations complete.

use crate::queue::RequestQueue;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thornvale_core::AiJob;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const FETCH_BACKOFF: Duration = Duration::from_millis(50);

/// Runs one job to completion. Implementations publish their own replies;
/// the pool only cares that the future resolves.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, job: AiJob);
}

pub struct WorkerPool {
    queue: Arc<RequestQueue>,
    handler: Arc<dyn JobHandler>,
    semaphore: Arc<Semaphore>,
    quit: CancellationToken,
    max_concurrent: usize,
}

impl WorkerPool {
    pub fn new(
        queue: Arc<RequestQueue>,
        handler: Arc<dyn JobHandler>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            queue,
            handler,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            quit: CancellationToken::new(),
            max_concurrent,
        }
    }

    pub fn quit_token(&self) -> CancellationToken {
        self.quit.clone()
    }

    /// In-flight generations right now.
    pub fn in_flight(&self) -> usize {
        self.max_concurrent - self.semaphore.available_permits()
    }

    /// The worker loop. Run on its own task; returns after shutdown.
    pub async fn run(&self) {
        info!(max_concurrent = self.max_concurrent, "worker pool started");
        loop {
            let permit = tokio::select! {
                _ = self.quit.cancelled() => break,
                permit = self.semaphore.clone().acquire_owned() => match permit {
                    Ok(p) => p,
                    Err(_) => break,
                },
            };

            match self.queue.fetch() {
                Some(job) => {
                    let handler = self.handler.clone();
                    tokio::spawn(async move {
                        debug!(id = %job.request.id, priority = %job.priority, "job started");
                        handler.handle(job).await;
                        drop(permit);
                    });
                }
                None => {
                    drop(permit);
                    tokio::select! {
                        _ = self.quit.cancelled() => break,
                        _ = tokio::time::sleep(FETCH_BACKOFF) => {}
                    }
                }
            }
        }
        info!("worker pool stopped intake");
    }

    /// Signal shutdown and wait for every in-flight generation to finish.
    pub async fn shutdown(&self) {
        self.quit.cancel();
        let _ = self
            .semaphore
            .acquire_many(self.max_concurrent as u32)
            .await;
        info!("worker pool drained");
    }
}
