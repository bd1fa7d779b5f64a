//! Oracle collaborators: the two advisory calls the selector makes.
//!
//! Free-text reasoning and structured extraction have different contracts and
//! failure modes, so they are separate traits even though the default backends
//! share one `LlmClient`.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::llm_client::prompts::{EXTRACTION_PROMPT_TEMPLATE, JSON_ONLY_SYSTEM};
use crate::llm_client::{strip_json_fences, LlmClient, LlmError};

/// Low temperature keeps the reasoning output stable between runs.
const REASONING_TEMPERATURE: f32 = 0.2;
const EXTRACTION_TEMPERATURE: f32 = 0.0;

/// Oracle #1: free-form reasoning that ends in a recommendation.
#[async_trait]
pub trait ReasoningOracle: Send + Sync {
    async fn reason(&self, system: &str, prompt: &str) -> Result<String, LlmError>;
}

/// Oracle #2: pulls exactly `n` move names out of the reasoning text.
#[async_trait]
pub trait ExtractionOracle: Send + Sync {
    async fn extract_moves(&self, raw_text: &str, n: usize) -> Result<Vec<String>, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Chat-completions backends
// ────────────────────────────────────────────────────────────────────────────

pub struct ChatReasoner {
    llm: LlmClient,
    model: String,
}

impl ChatReasoner {
    pub fn new(llm: LlmClient, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }
}

#[async_trait]
impl ReasoningOracle for ChatReasoner {
    async fn reason(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        self.llm
            .call_text(&self.model, prompt, Some(system), REASONING_TEMPERATURE)
            .await
    }
}

pub struct ChatExtractor {
    llm: LlmClient,
    model: String,
}

impl ChatExtractor {
    pub fn new(llm: LlmClient, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }
}

#[async_trait]
impl ExtractionOracle for ChatExtractor {
    async fn extract_moves(&self, raw_text: &str, n: usize) -> Result<Vec<String>, LlmError> {
        let prompt = EXTRACTION_PROMPT_TEMPLATE
            .replace("{n}", &n.to_string())
            .replace("{raw_text}", raw_text);

        let text = self
            .llm
            .call_text(
                &self.model,
                &prompt,
                Some(JSON_ONLY_SYSTEM),
                EXTRACTION_TEMPERATURE,
            )
            .await?;

        parse_extracted_moves(&text, n)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Offline backend
// ────────────────────────────────────────────────────────────────────────────

/// Stands in for both oracles when the curator runs without a provider.
/// Every call fails, so every entity takes the deterministic fallback.
pub struct OfflineOracle;

#[async_trait]
impl ReasoningOracle for OfflineOracle {
    async fn reason(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Disabled)
    }
}

#[async_trait]
impl ExtractionOracle for OfflineOracle {
    async fn extract_moves(&self, _raw_text: &str, _n: usize) -> Result<Vec<String>, LlmError> {
        Err(LlmError::Disabled)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Structured output parsing
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ExtractedMoves {
    moves: Vec<String>,
}

/// Parses `{"moves": [...]}` from extraction output.
///
/// Falls back to the first bracketed JSON string array in the text when the
/// object form does not parse. The array must hold exactly `n` entries.
pub fn parse_extracted_moves(text: &str, n: usize) -> Result<Vec<String>, LlmError> {
    let text = strip_json_fences(text);

    let moves = match serde_json::from_str::<ExtractedMoves>(text) {
        Ok(parsed) => parsed.moves,
        Err(object_err) => {
            debug!("Extraction output is not a moves object ({object_err}); scanning for an array");
            let array = first_json_array(text)
                .ok_or_else(|| LlmError::Schema("no JSON moves array found".to_string()))?;
            serde_json::from_str::<Vec<String>>(array)?
        }
    };

    if moves.len() != n {
        return Err(LlmError::Schema(format!(
            "expected exactly {n} moves, got {}",
            moves.len()
        )));
    }

    Ok(moves)
}

/// Returns the first `[...]` span that contains no nested closing bracket.
fn first_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = start + text[start..].find(']')?;
    Some(&text[start..=end])
}
