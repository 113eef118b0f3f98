//! Tests for thornvale-gateway: ingestion, reply routing, generation handler

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thornvale_core::{AiJob, AiRequest, AiResponse, Priority, Result};
use thornvale_gateway::*;
use thornvale_llm::{GenerateError, GenerateResult, TextGenerator};
use thornvale_pipeline::{DegradationController, JobHandler};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

// ===========================================================================
// Mock transport
// ===========================================================================

struct ScriptedSubscriber {
    messages: Mutex<Option<Vec<TransportMessage>>>,
}

impl ScriptedSubscriber {
    fn new(messages: Vec<TransportMessage>) -> Arc<Self> {
        Arc::new(Self {
            messages: Mutex::new(Some(messages)),
        })
    }
}

#[async_trait]
impl Subscriber for ScriptedSubscriber {
    async fn subscribe(&self, _pattern: &str) -> Result<MessageStream> {
        let messages = self.messages.lock().unwrap().take().unwrap_or_default();
        Ok(Box::pin(futures::stream::iter(messages)))
    }
}

#[derive(Default)]
struct CapturingPublisher {
    published: Mutex<Vec<(String, Vec<u8>)>>,
}

#[async_trait]
impl Publisher for CapturingPublisher {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<()> {
        self.published
            .lock()
            .unwrap()
            .push((subject.to_string(), payload));
        Ok(())
    }
}

fn request_message(subject: &str, payload: &str, reply: Option<&str>) -> TransportMessage {
    TransportMessage {
        subject: subject.to_string(),
        payload: payload.as_bytes().to_vec(),
        reply: reply.map(String::from),
    }
}

async fn drain_gateway(
    messages: Vec<TransportMessage>,
    capacity: usize,
) -> Vec<AiJob> {
    let subscriber = ScriptedSubscriber::new(messages);
    let (tx, mut rx) = mpsc::channel(capacity);
    let gateway = Gateway::new(subscriber, tx);
    gateway.run(CancellationToken::new()).await.unwrap();

    let mut jobs = Vec::new();
    while let Ok(job) = rx.try_recv() {
        jobs.push(job);
    }
    jobs
}

// ===========================================================================
// Reply routing
// ===========================================================================

#[tokio::test]
async fn transport_reply_wins_over_payload_id() {
    let jobs = drain_gateway(
        vec![request_message(
            "ai.request.npc-7",
            r#"{"id":"npc-7","prompt":"say hi","model":"mistral"}"#,
            Some("custom.reply.subject"),
        )],
        8,
    )
    .await;

    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].reply, "custom.reply.subject");
    assert_eq!(jobs[0].priority, Priority::Normal);
}

#[tokio::test]
async fn payload_id_builds_the_reply_subject() {
    let jobs = drain_gateway(
        vec![request_message(
            "ai.request.npc-7",
            r#"{"id":"npc-7","prompt":"say hi","model":"mistral"}"#,
            None,
        )],
        8,
    )
    .await;

    assert_eq!(jobs[0].reply, "ai.response.npc-7");
}

#[tokio::test]
async fn missing_id_falls_back_to_subject_segment() {
    let jobs = drain_gateway(
        vec![request_message(
            "ai.request.guard-42",
            r#"{"prompt":"halt"}"#,
            None,
        )],
        8,
    )
    .await;

    assert_eq!(jobs[0].request.id, "guard-42");
    assert_eq!(jobs[0].reply, "ai.response.guard-42");
}

// ===========================================================================
// Malformed and overflow handling
// ===========================================================================

#[tokio::test]
async fn malformed_json_is_discarded() {
    let jobs = drain_gateway(
        vec![
            request_message("ai.request.a", "not json at all", None),
            request_message("ai.request.b", r#"{"prompt":"ok"}"#, None),
        ],
        8,
    )
    .await;

    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].request.id, "b");
}

#[tokio::test]
async fn ingress_overflow_drops_newest() {
    let messages: Vec<TransportMessage> = (0..5)
        .map(|i| {
            request_message(
                &format!("ai.request.{i}"),
                &format!(r#"{{"prompt":"p{i}"}}"#),
                None,
            )
        })
        .collect();

    let jobs = drain_gateway(messages, 2).await;
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].request.id, "0");
    assert_eq!(jobs[1].request.id, "1");
}

// ===========================================================================
// Generation handler
// ===========================================================================

struct StaticGenerator {
    reply: GenerateResult<String>,
}

#[async_trait]
impl TextGenerator for StaticGenerator {
    fn name(&self) -> &str {
        "static"
    }

    async fn generate(&self, _model: &str, _prompt: &str) -> GenerateResult<String> {
        match &self.reply {
            Ok(s) => Ok(s.clone()),
            Err(_) => Err(GenerateError::Upstream {
                status: 502,
                body: "bad gateway".into(),
            }),
        }
    }
}

fn job(id: &str) -> AiJob {
    AiJob::new(
        AiRequest {
            id: id.into(),
            prompt: "describe the gate".into(),
            model: String::new(),
        },
        format!("ai.response.{id}"),
        Priority::Normal,
    )
}

#[tokio::test]
async fn handler_publishes_sanitized_success() {
    let publisher = Arc::new(CapturingPublisher::default());
    let handler = GenerationHandler::new(
        Arc::new(StaticGenerator {
            reply: Ok("\"The gate stands open.\"".into()),
        }),
        publisher.clone(),
        Arc::new(DegradationController::default()),
        "mistral",
    );

    handler.handle(job("r1")).await;

    let published = publisher.published.lock().unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, "ai.response.r1");
    let response: AiResponse = serde_json::from_slice(&published[0].1).unwrap();
    assert_eq!(response.response, "The gate stands open.");
    assert!(response.error.is_none());
}

#[tokio::test]
async fn handler_answers_with_template_and_error_on_upstream_failure() {
    let publisher = Arc::new(CapturingPublisher::default());
    let degradation = Arc::new(DegradationController::default());
    let handler = GenerationHandler::new(
        Arc::new(StaticGenerator {
            reply: Err(GenerateError::Decode(String::new())),
        }),
        publisher.clone(),
        degradation.clone(),
        "mistral",
    );

    handler.handle(job("r2")).await;

    let published = publisher.published.lock().unwrap();
    let response: AiResponse = serde_json::from_slice(&published[0].1).unwrap();
    assert!(response.error.is_some());
    assert!(!response.response.is_empty());
}

#[tokio::test]
async fn degraded_handler_skips_the_llm() {
    let publisher = Arc::new(CapturingPublisher::default());
    let degradation = Arc::new(DegradationController::default());
    for _ in 0..5 {
        degradation.record_failure();
    }
    degradation.reevaluate();

    let handler = GenerationHandler::new(
        Arc::new(StaticGenerator {
            reply: Ok("should never be generated".into()),
        }),
        publisher.clone(),
        degradation,
        "mistral",
    );

    handler.handle(job("r3")).await;

    let published = publisher.published.lock().unwrap();
    let response: AiResponse = serde_json::from_slice(&published[0].1).unwrap();
    assert!(response.error.is_none());
    assert_ne!(response.response, "should never be generated");
}

// ===========================================================================
// End-to-end: gateway -> forwarder -> queue
// ===========================================================================

#[tokio::test]
async fn accepted_requests_reach_the_priority_queue() {
    let subscriber = ScriptedSubscriber::new(vec![request_message(
        "ai.request.x",
        r#"{"prompt":"hello"}"#,
        None,
    )]);
    let (tx, rx) = mpsc::channel(INGRESS_CAPACITY);
    let gateway = Gateway::new(subscriber, tx);
    gateway.run(CancellationToken::new()).await.unwrap();

    let queue = Arc::new(thornvale_pipeline::RequestQueue::new(8));
    let quit = CancellationToken::new();
    let forwarder = tokio::spawn({
        let queue = queue.clone();
        let quit = quit.clone();
        async move { run_ingress_forwarder(rx, queue, quit).await }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    let fetched = queue.fetch().expect("job should have been forwarded");
    assert_eq!(fetched.request.id, "x");

    quit.cancel();
    forwarder.await.unwrap();
}
