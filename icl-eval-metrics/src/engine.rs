//! Task-aware scoring on top of the individual calculators.
//!
//! The engine shapes `(prediction, reference)` pairs into calculator inputs,
//! extracts the relevant score and normalizes it to the reporting scale.
//! Every calculator is injected, so the shaping and scaling logic can be
//! exercised with deterministic stubs.

use icl_eval_core::{CoreError, MetricCalculator, MetricResult, Result, SemanticScorer, Task};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::calculators::{
    BleuCalculator, ChrfCalculator, ClassificationCalculator, ClassificationReport, LabelPair,
    MetricInput, MetricOutput, RougeCalculator, SemanticSimilarityCalculator, SquadCalculator,
    TRANSLATION_TARGET_LANG,
};

pub type TextCalculator =
    Arc<dyn MetricCalculator<Input = MetricInput, Output = MetricOutput> + Send + Sync>;

pub type LabelCalculator =
    Arc<dyn MetricCalculator<Input = Vec<LabelPair>, Output = ClassificationReport> + Send + Sync>;

/// Metric names as they appear in result rows.
pub mod metric_names {
    pub const F1: &str = "F1";
    pub const EXACT_MATCH: &str = "Exact Match";
    pub const ROUGE_L: &str = "ROUGE-L";
    pub const ACCURACY: &str = "Accuracy";
    pub const PRECISION: &str = "Precision";
    pub const RECALL: &str = "Recall";
    pub const BLEU: &str = "BLEU";
    pub const BERTSCORE: &str = "BERTScore";
    pub const CHRF: &str = "ChrF";
}

/// The ordered metric set reported for a task. `Freeform` has none.
pub fn task_metrics(task: Task) -> &'static [&'static str] {
    use metric_names::*;
    match task {
        Task::QuestionAnswering => &[F1, EXACT_MATCH, ROUGE_L],
        Task::Classification => &[ACCURACY, PRECISION, RECALL, F1],
        Task::Translation => &[BLEU, BERTSCORE, CHRF],
        Task::Freeform => &[],
    }
}

/// Classification metrics on the 0-100 scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClassificationScores {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl ClassificationScores {
    fn from_report(report: ClassificationReport) -> Self {
        Self {
            accuracy: report.accuracy * 100.0,
            precision: report.precision * 100.0,
            recall: report.recall * 100.0,
            f1: report.f1 * 100.0,
        }
    }

    pub fn to_results(&self, method: &str) -> Vec<MetricResult> {
        vec![
            MetricResult::new(method, metric_names::ACCURACY, self.accuracy),
            MetricResult::new(method, metric_names::PRECISION, self.precision),
            MetricResult::new(method, metric_names::RECALL, self.recall),
            MetricResult::new(method, metric_names::F1, self.f1),
        ]
    }
}

#[derive(Clone)]
pub struct MetricsEngine {
    f1: TextCalculator,
    exact_match: TextCalculator,
    rouge: TextCalculator,
    bleu: TextCalculator,
    chrf: TextCalculator,
    semantic: TextCalculator,
    classification: LabelCalculator,
}

impl MetricsEngine {
    /// Engine with the built-in calculators and the given semantic scorer
    /// (queried with the French language tag).
    pub fn new(semantic_scorer: Arc<dyn SemanticScorer>) -> Self {
        Self {
            f1: Arc::new(SquadCalculator::f1()),
            exact_match: Arc::new(SquadCalculator::exact_match()),
            rouge: Arc::new(RougeCalculator::rouge_l()),
            bleu: Arc::new(BleuCalculator::default()),
            chrf: Arc::new(ChrfCalculator::default()),
            semantic: Arc::new(SemanticSimilarityCalculator::new(
                semantic_scorer,
                TRANSLATION_TARGET_LANG,
            )),
            classification: Arc::new(ClassificationCalculator::new()),
        }
    }

    pub fn with_f1(mut self, calculator: TextCalculator) -> Self {
        self.f1 = calculator;
        self
    }

    pub fn with_exact_match(mut self, calculator: TextCalculator) -> Self {
        self.exact_match = calculator;
        self
    }

    pub fn with_rouge(mut self, calculator: TextCalculator) -> Self {
        self.rouge = calculator;
        self
    }

    pub fn with_bleu(mut self, calculator: TextCalculator) -> Self {
        self.bleu = calculator;
        self
    }

    pub fn with_chrf(mut self, calculator: TextCalculator) -> Self {
        self.chrf = calculator;
        self
    }

    pub fn with_semantic(mut self, calculator: TextCalculator) -> Self {
        self.semantic = calculator;
        self
    }

    pub fn with_classification(mut self, calculator: LabelCalculator) -> Self {
        self.classification = calculator;
        self
    }

    async fn run(calculator: &TextCalculator, prediction: &str, reference: &str) -> Result<f64> {
        let output = calculator
            .calculate(MetricInput::new(prediction, reference))
            .await?;

        if output.score.is_finite() {
            Ok(output.score)
        } else {
            Err(CoreError::Metric(format!(
                "Calculator produced a non-finite score: {}",
                output.score
            )))
        }
    }

    // ===== Question Answering =====

    /// SQuAD token F1, already on the 0-100 scale.
    pub async fn compute_f1(&self, prediction: &str, reference: &str) -> Result<f64> {
        Self::run(&self.f1, prediction, reference).await
    }

    /// SQuAD exact match: 0 or 100.
    pub async fn compute_em(&self, prediction: &str, reference: &str) -> Result<f64> {
        Self::run(&self.exact_match, prediction, reference).await
    }

    pub async fn compute_rouge(&self, prediction: &str, reference: &str) -> Result<f64> {
        Ok(Self::run(&self.rouge, prediction, reference).await? * 100.0)
    }

    // ===== Translation =====

    pub async fn compute_bleu(&self, prediction: &str, reference: &str) -> Result<f64> {
        Ok(Self::run(&self.bleu, prediction, reference).await? * 100.0)
    }

    /// chrF is reported as-is; it is conventionally 0-100 already.
    pub async fn compute_chrf(&self, prediction: &str, reference: &str) -> Result<f64> {
        Self::run(&self.chrf, prediction, reference).await
    }

    pub async fn compute_bertscore(&self, prediction: &str, reference: &str) -> Result<f64> {
        Ok(Self::run(&self.semantic, prediction, reference).await? * 100.0)
    }

    // ===== Classification =====

    pub async fn compute_classification_metrics(
        &self,
        prediction: &str,
        reference: &str,
    ) -> Result<ClassificationScores> {
        let pair = LabelPair::from_texts(prediction, reference);
        tracing::debug!(
            reference = %pair.reference,
            predicted = %pair.predicted,
            "Normalized classification labels"
        );

        let report = self.classification.calculate(vec![pair]).await?;
        Ok(ClassificationScores::from_report(report))
    }

    /// Macro-averaged scores over a batch of `(prediction, reference)` texts.
    pub async fn compute_classification_batch(
        &self,
        pairs: &[(String, String)],
    ) -> Result<ClassificationScores> {
        let pairs: Vec<LabelPair> = pairs
            .iter()
            .map(|(prediction, reference)| LabelPair::from_texts(prediction, reference))
            .collect();

        let report = self.classification.calculate(pairs).await?;
        Ok(ClassificationScores::from_report(report))
    }

    // ===== Task dispatch =====

    /// Scores one answer with the task's full metric set, in the order given
    /// by [`task_metrics`].
    pub async fn score(
        &self,
        task: Task,
        method: &str,
        prediction: &str,
        reference: &str,
    ) -> Result<Vec<MetricResult>> {
        use metric_names::*;

        let results = match task {
            Task::QuestionAnswering => vec![
                MetricResult::new(method, F1, self.compute_f1(prediction, reference).await?),
                MetricResult::new(method, EXACT_MATCH, self.compute_em(prediction, reference).await?),
                MetricResult::new(method, ROUGE_L, self.compute_rouge(prediction, reference).await?),
            ],
            Task::Classification => self
                .compute_classification_metrics(prediction, reference)
                .await?
                .to_results(method),
            Task::Translation => vec![
                MetricResult::new(method, BLEU, self.compute_bleu(prediction, reference).await?),
                MetricResult::new(method, BERTSCORE, self.compute_bertscore(prediction, reference).await?),
                MetricResult::new(method, CHRF, self.compute_chrf(prediction, reference).await?),
            ],
            Task::Freeform => return Err(CoreError::UnsupportedTask(task)),
        };

        tracing::debug!(%task, method, rows = results.len(), "Scored prediction");
        Ok(results)
    }
}
