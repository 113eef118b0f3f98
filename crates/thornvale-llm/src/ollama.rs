//! Ollama HTTP client with NDJSON streaming

use crate::generator::{GenerateError, GenerateResult, TextGenerator};
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

pub struct OllamaClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

#[async_trait::async_trait]
impl TextGenerator for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, model: &str, prompt: &str) -> GenerateResult<String> {
        let body = GenerateRequest {
            model,
            prompt,
            stream: true,
        };

        debug!("Ollama request: model={}", model);

        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerateError::Timeout(self.timeout)
                } else {
                    GenerateError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Ollama error {}: {}", status, body);
            return Err(GenerateError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        // The body is one JSON object per line: {"response": "...", "done": bool}.
        // Concatenate response fields in order until done or EOF.
        let mut stream = response.bytes_stream();
        let mut buffer = String::new();
        let mut output = String::new();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| {
                if e.is_timeout() {
                    GenerateError::Timeout(self.timeout)
                } else {
                    GenerateError::Network(e)
                }
            })?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(line_end) = buffer.find('\n') {
                let line = buffer[..line_end].trim().to_string();
                buffer = buffer[line_end + 1..].to_string();
                if line.is_empty() {
                    continue;
                }

                let record: GenerateChunk = serde_json::from_str(&line)
                    .map_err(|e| GenerateError::Decode(format!("{e}: {line}")))?;
                output.push_str(&record.response);
                if record.done {
                    return Ok(output);
                }
            }
        }

        // EOF without a done marker still yields whatever arrived; a trailing
        // unterminated line is a decode failure.
        let tail = buffer.trim();
        if !tail.is_empty() {
            let record: GenerateChunk = serde_json::from_str(tail)
                .map_err(|e| GenerateError::Decode(format!("{e}: {tail}")))?;
            output.push_str(&record.response);
        }
        Ok(output)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client = OllamaClient::new("http://ollama:11434/");
        assert_eq!(client.endpoint(), "http://ollama:11434/api/generate");
    }

    #[test]
    fn chunk_decodes_with_defaults() {
        let c: GenerateChunk = serde_json::from_str(r#"{"response":"hi"}"#).unwrap();
        assert_eq!(c.response, "hi");
        assert!(!c.done);
        let c: GenerateChunk = serde_json::from_str(r#"{"done":true}"#).unwrap();
        assert!(c.done);
    }
}
