use async_trait::async_trait;
use icl_eval_core::{MetricCalculator, Result};
use serde_json::json;
use std::collections::HashMap;

use super::{MetricInput, MetricOutput};

/// Character n-gram F-score (chrF) as computed by sacreBLEU.
///
/// Whitespace is removed before n-gram extraction. Orders for which either
/// side has no n-grams are left out of the precision/recall averages. The
/// score is reported on the conventional 0-100 scale.
#[derive(Debug, Clone)]
pub struct ChrfCalculator {
    pub char_order: usize,
    pub beta: f64,
    pub lowercase: bool,
}

/// Per-order statistics: (hypothesis n-grams, reference n-grams, matches).
type OrderStats = (usize, usize, usize);

impl ChrfCalculator {
    pub fn new(char_order: usize, beta: f64) -> Self {
        Self {
            char_order,
            beta,
            lowercase: false,
        }
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    fn prepare(&self, text: &str) -> Vec<char> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        text.chars().filter(|c| !c.is_whitespace()).collect()
    }

    fn char_ngrams(chars: &[char], n: usize) -> HashMap<&[char], usize> {
        let mut counts = HashMap::new();
        if chars.len() < n {
            return counts;
        }
        for window in chars.windows(n) {
            *counts.entry(window).or_insert(0) += 1;
        }
        counts
    }

    fn statistics(&self, hypothesis: &[char], reference: &[char]) -> Vec<OrderStats> {
        (1..=self.char_order)
            .map(|n| {
                let hyp = Self::char_ngrams(hypothesis, n);
                let refs = Self::char_ngrams(reference, n);
                let matches: usize = hyp
                    .iter()
                    .filter_map(|(ngram, count)| refs.get(ngram).map(|r| (*count).min(*r)))
                    .sum();
                (hyp.values().sum::<usize>(), refs.values().sum::<usize>(), matches)
            })
            .collect()
    }

    fn f_score(&self, stats: &[OrderStats]) -> f64 {
        let factor = self.beta.powi(2);
        let mut avg_precision = 0.0;
        let mut avg_recall = 0.0;
        let mut effective_order = 0usize;

        for &(n_hyp, n_ref, n_match) in stats {
            if n_hyp > 0 && n_ref > 0 {
                avg_precision += n_match as f64 / n_hyp as f64;
                avg_recall += n_match as f64 / n_ref as f64;
                effective_order += 1;
            }
        }

        if effective_order == 0 {
            return 0.0;
        }

        avg_precision /= effective_order as f64;
        avg_recall /= effective_order as f64;

        if avg_precision + avg_recall == 0.0 {
            return 0.0;
        }

        let score = (1.0 + factor) * avg_precision * avg_recall / (factor * avg_precision + avg_recall);
        100.0 * score
    }

    pub fn calculate_chrf(&self, predicted: &str, reference: &str) -> f64 {
        let hypothesis = self.prepare(predicted);
        let reference = self.prepare(reference);
        let stats = self.statistics(&hypothesis, &reference);
        self.f_score(&stats)
    }
}

impl Default for ChrfCalculator {
    fn default() -> Self {
        Self::new(6, 2.0)
    }
}

#[async_trait]
impl MetricCalculator for ChrfCalculator {
    type Input = MetricInput;
    type Output = MetricOutput;

    async fn calculate(&self, input: Self::Input) -> Result<Self::Output> {
        let reference = input.reference.unwrap_or_default();
        let score = self.calculate_chrf(&input.predicted, &reference);

        Ok(MetricOutput {
            score,
            metadata: json!({
                "metric": "chrf",
                "char_order": self.char_order,
                "beta": self.beta,
                "lowercase": self.lowercase,
            }),
        })
    }
}
