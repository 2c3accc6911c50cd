use async_trait::async_trait;
use icl_eval_core::{Label, MetricCalculator, Result};
use serde::{Deserialize, Serialize};

/// A normalized (reference, prediction) label pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelPair {
    pub reference: Label,
    pub predicted: Label,
}

impl LabelPair {
    /// Applies the label normalization policy to raw texts: the reference must
    /// name a category exactly, the prediction may mention it anywhere.
    pub fn from_texts(predicted: &str, reference: &str) -> Self {
        Self {
            reference: Label::from_reference(reference),
            predicted: Label::from_prediction(predicted),
        }
    }
}

/// Accuracy and macro-averaged precision/recall/F1 over [`Label::ALL`],
/// each in [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl ClassificationReport {
    /// Macro averages are taken over all five labels, including labels that
    /// never occur; a ratio with a zero denominator counts as 0.
    pub fn from_pairs(pairs: &[LabelPair]) -> Self {
        if pairs.is_empty() {
            return Self::default();
        }

        let correct = pairs.iter().filter(|p| p.reference == p.predicted).count();
        let accuracy = correct as f64 / pairs.len() as f64;

        let mut precision_sum = 0.0;
        let mut recall_sum = 0.0;
        let mut f1_sum = 0.0;

        for label in Label::ALL {
            let tp = pairs
                .iter()
                .filter(|p| p.reference == label && p.predicted == label)
                .count();
            let fp = pairs
                .iter()
                .filter(|p| p.reference != label && p.predicted == label)
                .count();
            let fn_ = pairs
                .iter()
                .filter(|p| p.reference == label && p.predicted != label)
                .count();

            precision_sum += safe_ratio(tp, tp + fp);
            recall_sum += safe_ratio(tp, tp + fn_);
            f1_sum += safe_ratio(2 * tp, 2 * tp + fp + fn_);
        }

        let n_labels = Label::ALL.len() as f64;
        Self {
            accuracy,
            precision: precision_sum / n_labels,
            recall: recall_sum / n_labels,
            f1: f1_sum / n_labels,
        }
    }
}

fn safe_ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClassificationCalculator;

impl ClassificationCalculator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MetricCalculator for ClassificationCalculator {
    type Input = Vec<LabelPair>;
    type Output = ClassificationReport;

    async fn calculate(&self, input: Self::Input) -> Result<Self::Output> {
        let report = ClassificationReport::from_pairs(&input);
        tracing::debug!(pairs = input.len(), ?report, "Computed classification report");
        Ok(report)
    }
}
