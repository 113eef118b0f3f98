//! Text generator trait

use async_trait::async_trait;

/// Result type for generation operations
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Generation error kinds. `Upstream` and `Timeout` raise the degradation
/// tier; `Rejected` comes from the response validator.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("upstream error: status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("upstream timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("response rejected: {0}")]
    Rejected(String),
}

impl GenerateError {
    /// Whether this failure should count against upstream health.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            GenerateError::Upstream { .. } | GenerateError::Timeout(_) | GenerateError::Network(_)
        )
    }
}

/// The seam between the pipeline and the language backend. The backend is
/// stateless; all context travels in the prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// Generate a completion for `prompt` using `model`. Streaming is an
    /// implementation detail; the fully concatenated text is returned.
    async fn generate(&self, model: &str, prompt: &str) -> GenerateResult<String>;
}
