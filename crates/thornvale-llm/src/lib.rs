//! Thornvale LLM - streaming text generation client and response validation

pub mod generator;
pub mod ollama;
pub mod parser;

pub use generator::{GenerateError, GenerateResult, TextGenerator};
pub use ollama::OllamaClient;
pub use parser::{parse_response, sanitize, validate, ValidationConfig};
