use async_trait::async_trait;
use icl_eval_core::{MetricCalculator, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::OnceLock;

use super::{MetricInput, MetricOutput};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SquadMetric {
    F1,
    ExactMatch,
}

/// SQuAD v1 answer scoring. Scores are on the 0-100 scale the SQuAD
/// evaluation script reports.
#[derive(Debug, Clone)]
pub struct SquadCalculator {
    pub metric: SquadMetric,
}

fn articles() -> &'static Regex {
    static ARTICLES: OnceLock<Regex> = OnceLock::new();
    ARTICLES.get_or_init(|| Regex::new(r"\b(a|an|the)\b").expect("valid article pattern"))
}

/// Lowercase, drop ASCII punctuation, drop articles, collapse whitespace.
pub fn normalize_answer(text: &str) -> String {
    let lower = text.to_lowercase();
    let no_punc: String = lower.chars().filter(|c| !c.is_ascii_punctuation()).collect();
    let no_articles = articles().replace_all(&no_punc, " ");
    no_articles.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl SquadCalculator {
    pub fn new(metric: SquadMetric) -> Self {
        Self { metric }
    }

    pub fn f1() -> Self {
        Self::new(SquadMetric::F1)
    }

    pub fn exact_match() -> Self {
        Self::new(SquadMetric::ExactMatch)
    }

    /// Exact match after normalization, as 0.0 or 1.0.
    fn exact_match_score(&self, predicted: &str, reference: &str) -> f64 {
        if normalize_answer(predicted) == normalize_answer(reference) {
            1.0
        } else {
            0.0
        }
    }

    /// Token-overlap F1 after normalization, returns (precision, recall, f1).
    fn f1_score(&self, predicted: &str, reference: &str) -> (f64, f64, f64) {
        let pred_normalized = normalize_answer(predicted);
        let ref_normalized = normalize_answer(reference);

        let pred_tokens: Vec<&str> = pred_normalized.split_whitespace().collect();
        let ref_tokens: Vec<&str> = ref_normalized.split_whitespace().collect();

        let num_same = count_overlap(&pred_tokens, &ref_tokens);
        if num_same == 0 {
            return (0.0, 0.0, 0.0);
        }

        let precision = num_same as f64 / pred_tokens.len() as f64;
        let recall = num_same as f64 / ref_tokens.len() as f64;
        let f1 = 2.0 * precision * recall / (precision + recall);

        (precision, recall, f1)
    }
}

/// Size of the multiset intersection of two token lists.
fn count_overlap(tokens1: &[&str], tokens2: &[&str]) -> usize {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &token in tokens2 {
        *counts.entry(token).or_insert(0) += 1;
    }

    let mut overlap = 0;
    for &token in tokens1 {
        if let Some(count) = counts.get_mut(token) {
            if *count > 0 {
                *count -= 1;
                overlap += 1;
            }
        }
    }
    overlap
}

impl Default for SquadCalculator {
    fn default() -> Self {
        Self::f1()
    }
}

#[async_trait]
impl MetricCalculator for SquadCalculator {
    type Input = MetricInput;
    type Output = MetricOutput;

    async fn calculate(&self, input: Self::Input) -> Result<Self::Output> {
        let reference = input.reference.unwrap_or_default();

        let (score, metadata) = match self.metric {
            SquadMetric::ExactMatch => {
                let em = self.exact_match_score(&input.predicted, &reference);
                (em * 100.0, json!({ "metric": "exact_match" }))
            }
            SquadMetric::F1 => {
                let (precision, recall, f1) = self.f1_score(&input.predicted, &reference);
                (
                    f1 * 100.0,
                    json!({
                        "metric": "f1",
                        "precision": precision,
                        "recall": recall,
                    }),
                )
            }
        };

        Ok(MetricOutput { score, metadata })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("The Eiffel Tower!", "eiffel tower")]
    #[case("  a   programming language ", "programming language")]
    #[case("An apple, the pear", "apple pear")]
    #[case("another theory", "another theory")]
    #[case("", "")]
    fn test_normalize_answer(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_answer(input), expected);
    }

    #[test]
    fn test_count_overlap_respects_multiplicity() {
        assert_eq!(count_overlap(&["a", "a", "b"], &["a", "b", "b"]), 2);
        assert_eq!(count_overlap(&[], &["a"]), 0);
    }

    #[test]
    fn test_f1_partial_overlap() {
        let calc = SquadCalculator::f1();
        let (precision, recall, f1) = calc.f1_score("programming language for AI", "a programming language");
        assert!((precision - 0.5).abs() < 1e-9);
        assert!((recall - 1.0).abs() < 1e-9);
        assert!((f1 - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_f1_empty_strings_score_zero() {
        let calc = SquadCalculator::f1();
        assert_eq!(calc.f1_score("", "").2, 0.0);
        assert_eq!(calc.f1_score("answer", "").2, 0.0);
        assert_eq!(calc.f1_score("", "answer").2, 0.0);
    }
}
