use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[async_trait]
pub trait MetricCalculator {
    type Input;
    type Output;

    async fn calculate(&self, input: Self::Input) -> Result<Self::Output>;
}

/// A chat-capable model used for in-context learning.
///
/// Implementations receive the fully rendered prompt as a single user turn
/// and return the model's text response.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn generate(&self, model_id: &str, prompt: &str) -> Result<String>;
}

/// Task-specific fine-tuned baselines, one entry point per task family.
#[async_trait]
pub trait FineTunedModel: Send + Sync {
    /// Method label used in result rows (e.g. "Fine-Tuned BERT").
    fn method_name(&self) -> &str;

    async fn answer_question(&self, question: &str, context: &str) -> Result<String>;

    /// Returns a normalized label name (lowercase, trimmed).
    async fn classify(&self, text: &str) -> Result<String>;

    async fn translate(&self, text: &str) -> Result<String>;
}

/// Per-pair scores produced by a semantic similarity model, in `[0, 1]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SemanticScores {
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    pub f1: Vec<f64>,
}

#[async_trait]
pub trait SemanticScorer: Send + Sync {
    async fn score(
        &self,
        predictions: &[String],
        references: &[String],
        lang: &str,
    ) -> Result<SemanticScores>;
}
