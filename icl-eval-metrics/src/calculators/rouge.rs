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
pub enum RougeVariant {
    RougeN { n: usize },
    RougeL,
}

/// Precision, recall and F-measure of one ROUGE comparison, each in [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct RougeScore {
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

impl RougeScore {
    fn from_counts(matched: usize, predicted: usize, reference: usize) -> Self {
        let precision = matched as f64 / predicted.max(1) as f64;
        let recall = matched as f64 / reference.max(1) as f64;
        let fmeasure = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            precision,
            recall,
            fmeasure,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RougeCalculator {
    pub variant: RougeVariant,
}

fn non_alphanumeric() -> &'static Regex {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid token pattern"))
}

/// Lowercases and splits on anything that is not an ASCII letter or digit.
pub fn rouge_tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    non_alphanumeric()
        .replace_all(&lower, " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

impl RougeCalculator {
    pub fn new(variant: RougeVariant) -> Self {
        Self { variant }
    }

    pub fn rouge_1() -> Self {
        Self::new(RougeVariant::RougeN { n: 1 })
    }

    pub fn rouge_2() -> Self {
        Self::new(RougeVariant::RougeN { n: 2 })
    }

    pub fn rouge_l() -> Self {
        Self::new(RougeVariant::RougeL)
    }

    /// Count n-grams
    fn count_ngrams(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
        let mut counts = HashMap::new();
        if n == 0 || tokens.len() < n {
            return counts;
        }
        for window in tokens.windows(n) {
            *counts.entry(window).or_insert(0) += 1;
        }
        counts
    }

    /// Calculate ROUGE-N score
    fn rouge_n(&self, predicted: &[String], reference: &[String], n: usize) -> RougeScore {
        let pred_counts = Self::count_ngrams(predicted, n);
        let ref_counts = Self::count_ngrams(reference, n);

        let overlap: usize = ref_counts
            .iter()
            .filter_map(|(ngram, ref_count)| pred_counts.get(ngram).map(|p| (*p).min(*ref_count)))
            .sum();

        RougeScore::from_counts(
            overlap,
            pred_counts.values().sum(),
            ref_counts.values().sum(),
        )
    }

    /// Calculate longest common subsequence length
    fn lcs_length(text1: &[String], text2: &[String]) -> usize {
        let m = text1.len();
        let n = text2.len();

        if m == 0 || n == 0 {
            return 0;
        }

        let mut dp = vec![vec![0; n + 1]; m + 1];

        for i in 1..=m {
            for j in 1..=n {
                if text1[i - 1] == text2[j - 1] {
                    dp[i][j] = dp[i - 1][j - 1] + 1;
                } else {
                    dp[i][j] = dp[i - 1][j].max(dp[i][j - 1]);
                }
            }
        }

        dp[m][n]
    }

    /// Calculate ROUGE-L score (based on longest common subsequence)
    fn rouge_l_score(&self, predicted: &[String], reference: &[String]) -> RougeScore {
        if predicted.is_empty() || reference.is_empty() {
            return RougeScore::default();
        }

        let lcs_len = Self::lcs_length(predicted, reference);
        RougeScore::from_counts(lcs_len, predicted.len(), reference.len())
    }

    pub fn score(&self, predicted: &str, reference: &str) -> RougeScore {
        let pred_tokens = rouge_tokenize(predicted);
        let ref_tokens = rouge_tokenize(reference);

        match self.variant {
            RougeVariant::RougeN { n } => self.rouge_n(&pred_tokens, &ref_tokens, n),
            RougeVariant::RougeL => self.rouge_l_score(&pred_tokens, &ref_tokens),
        }
    }
}

impl Default for RougeCalculator {
    fn default() -> Self {
        Self::rouge_l()
    }
}

#[async_trait]
impl MetricCalculator for RougeCalculator {
    type Input = MetricInput;
    type Output = MetricOutput;

    async fn calculate(&self, input: Self::Input) -> Result<Self::Output> {
        let rouge = match input.reference {
            Some(reference) => self.score(&input.predicted, &reference),
            None => RougeScore::default(),
        };

        Ok(MetricOutput {
            score: rouge.fmeasure,
            metadata: json!({
                "metric": "rouge",
                "variant": self.variant,
                "precision": rouge.precision,
                "recall": rouge.recall,
                "f1": rouge.fmeasure,
            }),
        })
    }
}
