use approx::assert_relative_eq;
use async_trait::async_trait;
use icl_eval_core::{
    CoreError, MetricCalculator, Result, SemanticScorer, SemanticScores, Task,
};
use icl_eval_metrics::calculators::{MetricInput, MetricOutput};
use icl_eval_metrics::engine::{metric_names, task_metrics, MetricsEngine};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;

/// Returns the same similarity for every pair.
struct FixedScorer(f64);

#[async_trait]
impl SemanticScorer for FixedScorer {
    async fn score(
        &self,
        predictions: &[String],
        _references: &[String],
        _lang: &str,
    ) -> Result<SemanticScores> {
        let scores = vec![self.0; predictions.len()];
        Ok(SemanticScores {
            precision: scores.clone(),
            recall: scores.clone(),
            f1: scores,
        })
    }
}

struct EmptyScorer;

#[async_trait]
impl SemanticScorer for EmptyScorer {
    async fn score(&self, _p: &[String], _r: &[String], _lang: &str) -> Result<SemanticScores> {
        Ok(SemanticScores::default())
    }
}

struct ConstantCalculator(f64);

#[async_trait]
impl MetricCalculator for ConstantCalculator {
    type Input = MetricInput;
    type Output = MetricOutput;

    async fn calculate(&self, _input: Self::Input) -> Result<Self::Output> {
        Ok(MetricOutput {
            score: self.0,
            metadata: serde_json::Value::Null,
        })
    }
}

fn engine() -> MetricsEngine {
    MetricsEngine::new(Arc::new(FixedScorer(0.9)))
}

// ===== Scaling =====

#[tokio::test]
async fn test_fractional_calculators_are_scaled_to_percent() {
    let engine = engine()
        .with_rouge(Arc::new(ConstantCalculator(0.25)))
        .with_bleu(Arc::new(ConstantCalculator(0.5)));

    assert_relative_eq!(engine.compute_rouge("x", "y").await.unwrap(), 25.0, epsilon = 1e-9);
    assert_relative_eq!(engine.compute_bleu("x", "y").await.unwrap(), 50.0, epsilon = 1e-9);
    assert_relative_eq!(engine.compute_bertscore("x", "y").await.unwrap(), 90.0, epsilon = 1e-9);
}

#[tokio::test]
async fn test_percent_calculators_are_passed_through() {
    let engine = engine()
        .with_f1(Arc::new(ConstantCalculator(42.0)))
        .with_exact_match(Arc::new(ConstantCalculator(100.0)))
        .with_chrf(Arc::new(ConstantCalculator(61.5)));

    assert_eq!(engine.compute_f1("x", "y").await.unwrap(), 42.0);
    assert_eq!(engine.compute_em("x", "y").await.unwrap(), 100.0);
    assert_eq!(engine.compute_chrf("x", "y").await.unwrap(), 61.5);
}

#[tokio::test]
async fn test_non_finite_score_is_rejected() {
    let engine = engine().with_bleu(Arc::new(ConstantCalculator(f64::NAN)));
    let err = engine.compute_bleu("x", "y").await.unwrap_err();
    assert!(matches!(err, CoreError::Metric(_)));
}

#[tokio::test]
async fn test_empty_semantic_scores_fail() {
    let engine = MetricsEngine::new(Arc::new(EmptyScorer));
    let err = engine.compute_bertscore("x", "y").await.unwrap_err();
    assert!(matches!(err, CoreError::Metric(_)));
}

// ===== Task dispatch =====

#[tokio::test]
async fn test_qa_end_to_end() {
    let results = engine()
        .score(
            Task::QuestionAnswering,
            "ICL-llama3",
            "a programming language",
            "a programming language",
        )
        .await
        .unwrap();

    let metrics: Vec<&str> = results.iter().map(|r| r.metric.as_str()).collect();
    assert_eq!(metrics, task_metrics(Task::QuestionAnswering));
    for result in &results {
        assert_eq!(result.method, "ICL-llama3");
        assert_relative_eq!(result.score, 100.0, epsilon = 1e-6);
    }
}

#[tokio::test]
async fn test_classification_single_correct_pair() {
    let scores = engine()
        .compute_classification_metrics("I would say Business.", "business")
        .await
        .unwrap();

    assert_relative_eq!(scores.accuracy, 100.0, epsilon = 1e-9);
    assert_relative_eq!(scores.precision, 20.0, epsilon = 1e-9);
    assert_relative_eq!(scores.recall, 20.0, epsilon = 1e-9);
    assert_relative_eq!(scores.f1, 20.0, epsilon = 1e-9);
}

#[tokio::test]
async fn test_classification_unknown_prediction_does_not_fail() {
    let results = engine()
        .score(Task::Classification, "Fine-Tuned BERT", "politics", "world")
        .await
        .unwrap();

    assert_eq!(results.len(), 4);
    assert_eq!(results[0].metric, metric_names::ACCURACY);
    assert!(results.iter().all(|r| r.score == 0.0));
}

#[tokio::test]
async fn test_classification_batch() {
    let pairs = vec![
        ("world".to_string(), "world".to_string()),
        ("sports".to_string(), "business".to_string()),
    ];
    let scores = engine().compute_classification_batch(&pairs).await.unwrap();
    assert_relative_eq!(scores.accuracy, 50.0, epsilon = 1e-9);
}

#[tokio::test]
async fn test_translation_metric_order() {
    let results = engine()
        .score(
            Task::Translation,
            "ICL-deepseek-r1",
            "Le chat est assis sur le tapis.",
            "Le chat est assis sur le tapis.",
        )
        .await
        .unwrap();

    let metrics: Vec<&str> = results.iter().map(|r| r.metric.as_str()).collect();
    assert_eq!(metrics, vec!["BLEU", "BERTScore", "ChrF"]);
    assert_relative_eq!(results[0].score, 100.0, epsilon = 1e-6);
    assert_relative_eq!(results[1].score, 90.0, epsilon = 1e-6);
    assert_relative_eq!(results[2].score, 100.0, epsilon = 1e-6);
}

#[tokio::test]
async fn test_freeform_is_unsupported() {
    let err = engine()
        .score(Task::Freeform, "ICL-llama3", "anything", "anything")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::UnsupportedTask(Task::Freeform)));
}

// ===== Scale invariants =====

fn sentence() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{2,8}", 4..10).prop_map(|words| words.join(" "))
}

proptest! {
    #[test]
    fn identical_sentences_score_near_100(text in sentence()) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let engine = engine();
        let (f1, rouge, bleu, chrf) = runtime.block_on(async {
            (
                engine.compute_f1(&text, &text).await.unwrap(),
                engine.compute_rouge(&text, &text).await.unwrap(),
                engine.compute_bleu(&text, &text).await.unwrap(),
                engine.compute_chrf(&text, &text).await.unwrap(),
            )
        });

        // Articles are stripped by SQuAD normalization; a sentence made only of
        // articles normalizes to nothing and scores zero.
        let only_articles = text.split_whitespace().all(|w| matches!(w, "an" | "the"));
        if !only_articles {
            prop_assert!((f1 - 100.0).abs() <= 0.5);
        }
        prop_assert!((rouge - 100.0).abs() <= 0.5);
        prop_assert!((bleu - 100.0).abs() <= 0.5);
        prop_assert!((chrf - 100.0).abs() <= 0.5);
    }

    #[test]
    fn scores_stay_in_range(pred in sentence(), reference in sentence()) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let engine = engine();
        let scores = runtime.block_on(async {
            vec![
                engine.compute_f1(&pred, &reference).await.unwrap(),
                engine.compute_em(&pred, &reference).await.unwrap(),
                engine.compute_rouge(&pred, &reference).await.unwrap(),
                engine.compute_bleu(&pred, &reference).await.unwrap(),
                engine.compute_chrf(&pred, &reference).await.unwrap(),
            ]
        });
        for score in scores {
            prop_assert!((0.0..=100.0 + 1e-9).contains(&score));
        }
    }
}
