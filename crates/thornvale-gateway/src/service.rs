//! Gateway service - decode, route, and enqueue generation requests
//!
//! Ingestion is at-most-once: malformed payloads are logged and discarded,
//! and a full ingress channel drops the request with a warning. The reply
//! address is chosen in priority order: transport reply, `ai.response.<id>`
//! from the payload id, else the subject's last dot-segment as the id.

use crate::transport::{Publisher, Subscriber};
use std::sync::Arc;
use std::time::Instant;
use thornvale_core::{AiJob, AiRequest, AiResponse, Priority, Result};
use thornvale_llm::{parse_response, TextGenerator, ValidationConfig};
use thornvale_pipeline::{
    fallback_template, DegradationController, FallbackDomain, JobHandler, RequestQueue,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const REQUEST_SUBJECT_PATTERN: &str = "ai.request.>";
pub const INGRESS_CAPACITY: usize = 100;

pub struct Gateway {
    transport: Arc<dyn Subscriber>,
    ingress: mpsc::Sender<AiJob>,
}

impl Gateway {
    pub fn new(transport: Arc<dyn Subscriber>, ingress: mpsc::Sender<AiJob>) -> Self {
        Self { transport, ingress }
    }

    /// Consume the request subscription until shutdown.
    pub async fn run(&self, quit: CancellationToken) -> Result<()> {
        let mut messages = self.transport.subscribe(REQUEST_SUBJECT_PATTERN).await?;
        info!(pattern = REQUEST_SUBJECT_PATTERN, "gateway listening");

        loop {
            let message = tokio::select! {
                _ = quit.cancelled() => break,
                message = futures::StreamExt::next(&mut messages) => match message {
                    Some(m) => m,
                    None => {
                        warn!("request subscription closed");
                        break;
                    }
                },
            };

            let mut request: AiRequest = match serde_json::from_slice(&message.payload) {
                Ok(r) => r,
                Err(e) => {
                    warn!(subject = %message.subject, error = %e, "malformed request discarded");
                    continue;
                }
            };

            if request.id.is_empty() {
                request.id = last_segment(&message.subject).to_string();
            }
            let reply = match message.reply {
                Some(reply) => reply,
                None => format!("ai.response.{}", request.id),
            };

            let job = AiJob::new(request, reply, Priority::Normal);
            if let Err(e) = self.ingress.try_send(job) {
                match e {
                    mpsc::error::TrySendError::Full(job) => {
                        warn!(id = %job.request.id, "ingress full, request dropped");
                    }
                    mpsc::error::TrySendError::Closed(_) => {
                        warn!("ingress closed, stopping gateway");
                        break;
                    }
                }
            }
        }

        info!("gateway stopped");
        Ok(())
    }
}

fn last_segment(subject: &str) -> &str {
    subject.rsplit('.').next().unwrap_or(subject)
}

/// Move accepted requests from the ingress channel onto the priority queue.
/// Queue saturation drops the request, same as ingress saturation.
pub async fn run_ingress_forwarder(
    mut ingress: mpsc::Receiver<AiJob>,
    queue: Arc<RequestQueue>,
    quit: CancellationToken,
) {
    loop {
        let job = tokio::select! {
            _ = quit.cancelled() => break,
            job = ingress.recv() => match job {
                Some(j) => j,
                None => break,
            },
        };
        if let Err(e) = queue.enqueue(job) {
            warn!(error = %e, "request dropped at priority queue");
        }
    }
}

/// Runs one generation and publishes the reply. Degraded tiers answer from
/// the template table without touching the LLM.
pub struct GenerationHandler {
    generator: Arc<dyn TextGenerator>,
    publisher: Arc<dyn Publisher>,
    degradation: Arc<DegradationController>,
    validation: ValidationConfig,
    default_model: String,
}

impl GenerationHandler {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        publisher: Arc<dyn Publisher>,
        degradation: Arc<DegradationController>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            publisher,
            degradation,
            validation: ValidationConfig::default(),
            default_model: default_model.into(),
        }
    }

    async fn publish_response(&self, reply: &str, response: &AiResponse) {
        match serde_json::to_vec(response) {
            Ok(payload) => {
                if let Err(e) = self.publisher.publish(reply, payload).await {
                    warn!(id = %response.id, error = %e, "response publish failed");
                }
            }
            Err(e) => warn!(id = %response.id, error = %e, "response encode failed"),
        }
    }
}

#[async_trait::async_trait]
impl JobHandler for GenerationHandler {
    async fn handle(&self, job: AiJob) {
        let id = job.request.id.clone();

        if self.degradation.should_bypass(job.priority) {
            debug!(%id, tier = self.degradation.tier().as_str(), "degraded, serving template");
            let response = AiResponse::ok(id, fallback_template(FallbackDomain::Default));
            self.publish_response(&job.reply, &response).await;
            return;
        }

        let model = if job.request.model.is_empty() {
            self.default_model.as_str()
        } else {
            job.request.model.as_str()
        };

        let started = Instant::now();
        let response = match self.generator.generate(model, &job.request.prompt).await {
            Ok(raw) => {
                self.degradation.record_success(started.elapsed());
                match parse_response(&raw, &self.validation) {
                    Ok(text) => AiResponse::ok(id, text),
                    Err(e) => {
                        warn!(id = %job.request.id, error = %e, "response rejected");
                        AiResponse {
                            id: job.request.id.clone(),
                            response: fallback_template(FallbackDomain::Default).to_string(),
                            error: Some(e.to_string()),
                        }
                    }
                }
            }
            Err(e) => {
                if e.is_upstream() {
                    self.degradation.record_failure();
                }
                warn!(id = %job.request.id, error = %e, "generation failed");
                AiResponse {
                    id: job.request.id.clone(),
                    response: fallback_template(FallbackDomain::Default).to_string(),
                    error: Some(e.to_string()),
                }
            }
        };

        self.publish_response(&job.reply, &response).await;
    }
}
