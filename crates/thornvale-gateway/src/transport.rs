//! Transport seam - Subscriber/Publisher traits and the NATS implementation

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use thornvale_core::{Error, Result};
use tracing::info;

/// A delivered message, decoupled from the transport's own types.
#[derive(Clone, Debug)]
pub struct TransportMessage {
    pub subject: String,
    pub payload: Vec<u8>,
    /// Transport-provided reply address, if the sender set one.
    pub reply: Option<String>,
}

pub type MessageStream = Pin<Box<dyn Stream<Item = TransportMessage> + Send>>;

/// Register a handler stream on a subject pattern.
#[async_trait]
pub trait Subscriber: Send + Sync {
    async fn subscribe(&self, pattern: &str) -> Result<MessageStream>;
}

/// Publish bytes to a subject.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<()>;
}

/// NATS-backed transport. One client serves both directions.
#[derive(Clone)]
pub struct NatsTransport {
    client: async_nats::Client,
}

impl NatsTransport {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = async_nats::connect(url)
            .await
            .map_err(|e| Error::transport(format!("connect {url}: {e}")))?;
        info!(url, "connected to nats");
        Ok(Self { client })
    }

    pub fn from_client(client: async_nats::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Subscriber for NatsTransport {
    async fn subscribe(&self, pattern: &str) -> Result<MessageStream> {
        let subscription = self
            .client
            .subscribe(pattern.to_string())
            .await
            .map_err(|e| Error::transport(format!("subscribe {pattern}: {e}")))?;
        info!(pattern, "subscribed");

        let stream = subscription.map(|message| TransportMessage {
            subject: message.subject.as_str().to_string(),
            payload: message.payload.to_vec(),
            reply: message.reply.map(|r| r.as_str().to_string()),
        });
        Ok(Box::pin(stream))
    }
}

#[async_trait]
impl Publisher for NatsTransport {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<()> {
        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| Error::transport(format!("publish {subject}: {e}")))
    }
}
