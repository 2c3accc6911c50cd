use async_trait::async_trait;
use icl_eval_core::{CoreError, MetricCalculator, Result, SemanticScorer};
use serde_json::json;
use std::sync::Arc;

use super::{MetricInput, MetricOutput};

/// Language tag passed to the semantic scorer for translation outputs.
pub const TRANSLATION_TARGET_LANG: &str = "fr";

/// Adapts an external semantic similarity model to the calculator
/// interface. The score is the F1 component of the single scored pair.
#[derive(Clone)]
pub struct SemanticSimilarityCalculator {
    scorer: Arc<dyn SemanticScorer>,
    lang: String,
}

impl SemanticSimilarityCalculator {
    pub fn new(scorer: Arc<dyn SemanticScorer>, lang: impl Into<String>) -> Self {
        Self {
            scorer,
            lang: lang.into(),
        }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }
}

#[async_trait]
impl MetricCalculator for SemanticSimilarityCalculator {
    type Input = MetricInput;
    type Output = MetricOutput;

    async fn calculate(&self, input: Self::Input) -> Result<Self::Output> {
        let predictions = vec![input.predicted];
        let references = vec![input.reference.unwrap_or_default()];

        let scores = self.scorer.score(&predictions, &references, &self.lang).await?;

        let f1 = scores.f1.first().copied().ok_or_else(|| {
            CoreError::Metric("Semantic scorer returned no scores".to_string())
        })?;

        Ok(MetricOutput {
            score: f1,
            metadata: json!({
                "metric": "semantic_similarity",
                "lang": self.lang,
                "precision": scores.precision.first(),
                "recall": scores.recall.first(),
                "f1": f1,
            }),
        })
    }
}
