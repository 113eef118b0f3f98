//! Bounded four-band priority queue
//!
//! One bounded FIFO channel per priority band, identical capacity. Enqueue
//! never blocks: a saturated band returns `QueueError::Full` and the request
//! is the caller's to drop. Fetch drains strictly Critical -> High -> Normal
//! -> Low with non-blocking trylocks, so a fetch returns a lower band only
//! when every higher band was empty at that instant.

use thornvale_core::{AiJob, Priority};
use tokio::sync::mpsc;
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("queue full for priority {0}")]
    Full(Priority),

    #[error("queue closed")]
    Closed,
}

pub struct RequestQueue {
    capacity: usize,
    senders: Vec<mpsc::Sender<AiJob>>,
    receivers: Vec<Mutex<mpsc::Receiver<AiJob>>>,
}

impl RequestQueue {
    /// Create a queue with `capacity` slots per band.
    pub fn new(capacity: usize) -> Self {
        let mut senders = Vec::with_capacity(Priority::ALL.len());
        let mut receivers = Vec::with_capacity(Priority::ALL.len());
        for _ in Priority::ALL {
            let (tx, rx) = mpsc::channel(capacity);
            senders.push(tx);
            receivers.push(Mutex::new(rx));
        }
        Self {
            capacity,
            senders,
            receivers,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Non-blocking enqueue onto the job's band.
    pub fn enqueue(&self, job: AiJob) -> Result<(), QueueError> {
        let band = job.priority;
        match self.senders[band.index()].try_send(job) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(QueueError::Full(band)),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(QueueError::Closed),
        }
    }

    /// Fetch the highest-priority job available right now, if any.
    pub fn fetch(&self) -> Option<AiJob> {
        for receiver in &self.receivers {
            if let Ok(mut rx) = receiver.try_lock() {
                if let Ok(job) = rx.try_recv() {
                    return Some(job);
                }
            }
        }
        None
    }

    /// Jobs currently waiting across all bands.
    pub fn depth(&self) -> usize {
        self.senders
            .iter()
            .map(|tx| tx.max_capacity() - tx.capacity())
            .sum()
    }

    /// Waiting jobs in one band.
    pub fn band_depth(&self, priority: Priority) -> usize {
        let tx = &self.senders[priority.index()];
        tx.max_capacity() - tx.capacity()
    }
}
