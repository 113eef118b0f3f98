//! ai-gateway - the AI request pipeline daemon
//!
//! Flagless binary: everything is environment-driven. Runs until SIGINT or
//! SIGTERM; SIGHUP reloads the combat config atomically.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thornvale_core::ConfigHandle;
use thornvale_gateway::{
    run_ingress_forwarder, Gateway, GenerationHandler, NatsTransport, INGRESS_CAPACITY,
};
use thornvale_llm::OllamaClient;
use thornvale_pipeline::{run_monitor, DegradationConfig, DegradationController, RequestQueue, WorkerPool};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_NATS_URL: &str = "nats://localhost:4222";
const DEFAULT_OLLAMA_URL: &str = "http://ollama:11434";
const DEFAULT_OLLAMA_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_MODEL: &str = "mistral";
const DEFAULT_MAX_CONCURRENT: usize = 4;
const DEFAULT_QUEUE_CAPACITY: usize = 100;
const MONITOR_INTERVAL: Duration = Duration::from_secs(5);

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse durations like "30s", "2m", or bare seconds.
fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    if let Some(minutes) = raw.strip_suffix('m') {
        return minutes.parse::<u64>().ok().map(|m| Duration::from_secs(m * 60));
    }
    let seconds = raw.strip_suffix('s').unwrap_or(raw);
    seconds.parse::<u64>().ok().map(Duration::from_secs)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thornvale=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let nats_url = env_or("NATS_URL", DEFAULT_NATS_URL);
    let ollama_url = env_or("OLLAMA_URL", DEFAULT_OLLAMA_URL);
    let ollama_timeout = std::env::var("OLLAMA_TIMEOUT")
        .ok()
        .and_then(|raw| parse_duration(&raw))
        .unwrap_or(DEFAULT_OLLAMA_TIMEOUT);
    let max_concurrent = std::env::var("LLM_MAX_CONCURRENT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_MAX_CONCURRENT);
    let config_path = PathBuf::from(env_or("COMBAT_CONFIG", "combat.json"));

    // Startup failure here is the non-zero exit path.
    let transport = Arc::new(NatsTransport::connect(&nats_url).await?);

    let combat_config = ConfigHandle::load(&config_path);
    let queue = Arc::new(RequestQueue::new(DEFAULT_QUEUE_CAPACITY));
    let degradation = Arc::new(DegradationController::new(DegradationConfig::default()));
    let generator = Arc::new(OllamaClient::with_timeout(&ollama_url, ollama_timeout));
    let handler = Arc::new(GenerationHandler::new(
        generator,
        transport.clone(),
        degradation.clone(),
        env_or("OLLAMA_MODEL", DEFAULT_MODEL),
    ));
    let pool = Arc::new(WorkerPool::new(queue.clone(), handler, max_concurrent));

    let quit = CancellationToken::new();
    let (ingress_tx, ingress_rx) = mpsc::channel(INGRESS_CAPACITY);
    let gateway = Gateway::new(transport.clone(), ingress_tx);

    let mut tasks = Vec::new();
    tasks.push(tokio::spawn({
        let queue = queue.clone();
        let quit = quit.clone();
        async move { run_ingress_forwarder(ingress_rx, queue, quit).await }
    }));
    tasks.push(tokio::spawn({
        let pool = pool.clone();
        async move { pool.run().await }
    }));
    tasks.push(tokio::spawn({
        let degradation = degradation.clone();
        let queue = queue.clone();
        let quit = quit.clone();
        async move { run_monitor(degradation, queue, MONITOR_INTERVAL, quit).await }
    }));
    tasks.push(tokio::spawn({
        let quit = quit.clone();
        let combat_config = combat_config.clone();
        async move {
            let Ok(mut hangup) = signal(SignalKind::hangup()) else {
                warn!("sighup handler unavailable, reload disabled");
                return;
            };
            loop {
                tokio::select! {
                    _ = quit.cancelled() => break,
                    _ = hangup.recv() => combat_config.reload(&config_path),
                }
            }
        }
    }));

    let gateway_task = tokio::spawn({
        let quit = quit.clone();
        async move { gateway.run(quit).await }
    });

    info!(ollama = %ollama_url, workers = max_concurrent, "ai-gateway running");

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = interrupt.recv() => info!("sigint received"),
        _ = terminate.recv() => info!("sigterm received"),
    }

    quit.cancel();
    pool.shutdown().await;
    let _ = gateway_task.await;
    for task in tasks {
        let _ = task.await;
    }
    info!("ai-gateway stopped cleanly");
    Ok(())
}
