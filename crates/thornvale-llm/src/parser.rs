//! Response sanitation and validation
//!
//! The raw model output is cleaned of quoting artifacts before validation
//! rejects empty, oversized, or meta-phrase responses.

use crate::generator::{GenerateError, GenerateResult};

/// Validation limits and the phrases that betray a model talking about
/// itself instead of staying in character.
#[derive(Clone, Debug)]
pub struct ValidationConfig {
    pub max_code_points: usize,
    pub meta_phrases: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_code_points: 500,
            meta_phrases: vec![
                "as an ai".to_string(),
                "i cannot".to_string(),
                "i'm sorry, but".to_string(),
                "language model".to_string(),
            ],
        }
    }
}

/// Strip surrounding whitespace, one pair of unescaped wrapping quotes, and
/// fenced-code-block markers.
pub fn sanitize(raw: &str) -> String {
    let mut text = raw.trim().to_string();

    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') && !text.ends_with("\\\"") {
        text = text[1..text.len() - 1].to_string();
    }

    if text.contains("```") {
        text = text
            .lines()
            .filter(|line| !line.trim_start().starts_with("```"))
            .collect::<Vec<_>>()
            .join("\n");
    }

    text.trim().to_string()
}

/// Reject empty output, output over the configured code-point budget, and
/// any configured meta-phrase (case-insensitive).
pub fn validate(text: &str, config: &ValidationConfig) -> GenerateResult<()> {
    if text.is_empty() {
        return Err(GenerateError::Rejected("empty response".into()));
    }

    let code_points = text.chars().count();
    if code_points > config.max_code_points {
        return Err(GenerateError::Rejected(format!(
            "response too long: {} code points (max {})",
            code_points, config.max_code_points
        )));
    }

    let lowered = text.to_lowercase();
    for phrase in &config.meta_phrases {
        if lowered.contains(phrase.as_str()) {
            return Err(GenerateError::Rejected(format!(
                "meta phrase detected: {phrase}"
            )));
        }
    }

    Ok(())
}

/// Sanitize then validate, returning the cleaned text.
pub fn parse_response(raw: &str, config: &ValidationConfig) -> GenerateResult<String> {
    let text = sanitize(raw);
    validate(&text, config)?;
    Ok(text)
}
