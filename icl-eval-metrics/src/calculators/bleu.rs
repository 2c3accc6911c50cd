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
pub enum SmoothingMethod {
    None,
    /// Add one to matches and candidates of every order (Lin & Och, 2004).
    AddOne,
}

/// Detailed BLEU breakdown, all ratios in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BleuScore {
    pub bleu: f64,
    pub precisions: Vec<f64>,
    pub brevity_penalty: f64,
    pub length_ratio: f64,
    pub translation_length: usize,
    pub reference_length: usize,
}

#[derive(Debug, Clone)]
pub struct BleuCalculator {
    pub max_n: usize,
    pub smoothing: SmoothingMethod,
}

struct Tokenizer13a {
    rules: Vec<(Regex, &'static str)>,
}

impl Tokenizer13a {
    fn new() -> Self {
        let rules = [
            // Isolate symbols: { | } ~ [ \ ] ^ _ ` space ! " # $ % & ( ) * + : ; < = > ? @ /
            (r"([\x7B-\x7E\x5B-\x60\x20-\x26\x28-\x2B\x3A-\x40/])", " ${1} "),
            // Split periods and commas unless preceded by a digit
            (r"([^0-9])([\.,])", "${1} ${2} "),
            // Split periods and commas unless followed by a digit
            (r"([\.,])([^0-9])", " ${1} ${2}"),
            // Split dashes that follow a digit
            (r"([0-9])(-)", "${1} ${2} "),
        ];

        Self {
            rules: rules
                .into_iter()
                .map(|(pattern, replacement)| {
                    (Regex::new(pattern).expect("valid 13a pattern"), replacement)
                })
                .collect(),
        }
    }

    fn tokenize(&self, line: &str) -> Vec<String> {
        let mut line = line.replace("<skipped>", "").replace("-\n", "").replace('\n', " ");
        if line.contains('&') {
            line = line
                .replace("&quot;", "\"")
                .replace("&amp;", "&")
                .replace("&lt;", "<")
                .replace("&gt;", ">");
        }

        let mut padded = format!(" {} ", line);
        for (regex, replacement) in &self.rules {
            padded = regex.replace_all(&padded, *replacement).into_owned();
        }

        padded.split_whitespace().map(str::to_string).collect()
    }
}

fn tokenizer() -> &'static Tokenizer13a {
    static TOKENIZER: OnceLock<Tokenizer13a> = OnceLock::new();
    TOKENIZER.get_or_init(Tokenizer13a::new)
}

/// Tokenizes a sentence with the WMT `13a` rules (case preserved).
pub fn tokenize_13a(text: &str) -> Vec<String> {
    tokenizer().tokenize(text)
}

impl BleuCalculator {
    pub fn new(max_n: usize) -> Self {
        Self {
            max_n,
            smoothing: SmoothingMethod::None,
        }
    }

    pub fn with_smoothing(mut self, smoothing: SmoothingMethod) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Count all n-grams of order 1 through max_n
    fn count_ngrams<'a>(&self, tokens: &'a [String]) -> HashMap<&'a [String], usize> {
        let mut counts = HashMap::new();
        for n in 1..=self.max_n {
            if tokens.len() < n {
                break;
            }
            for window in tokens.windows(n) {
                *counts.entry(window).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Brevity penalty for a candidate/reference length ratio
    fn brevity_penalty(ratio: f64) -> f64 {
        if ratio > 1.0 {
            1.0
        } else if ratio == 0.0 {
            0.0
        } else {
            (1.0 - 1.0 / ratio).exp()
        }
    }

    /// Calculate BLEU between one candidate and one reference.
    ///
    /// An empty candidate or reference scores zero instead of failing.
    pub fn calculate_bleu(&self, predicted: &str, reference: &str) -> BleuScore {
        let translation = tokenize_13a(predicted);
        let reference_tokens = tokenize_13a(reference);

        let translation_counts = self.count_ngrams(&translation);
        let reference_counts = self.count_ngrams(&reference_tokens);

        let mut matches_by_order = vec![0usize; self.max_n];
        for (ngram, count) in &translation_counts {
            if let Some(ref_count) = reference_counts.get(ngram) {
                matches_by_order[ngram.len() - 1] += (*count).min(*ref_count);
            }
        }

        let precisions: Vec<f64> = (1..=self.max_n)
            .map(|order| {
                let possible = translation.len().saturating_sub(order - 1);
                let matches = matches_by_order[order - 1];
                match self.smoothing {
                    SmoothingMethod::AddOne => (matches as f64 + 1.0) / (possible as f64 + 1.0),
                    SmoothingMethod::None if possible > 0 => matches as f64 / possible as f64,
                    SmoothingMethod::None => 0.0,
                }
            })
            .collect();

        let geometric_mean = if !precisions.is_empty() && precisions.iter().all(|p| *p > 0.0) {
            let log_sum: f64 = precisions.iter().map(|p| p.ln()).sum();
            (log_sum / self.max_n as f64).exp()
        } else {
            0.0
        };

        let length_ratio = if reference_tokens.is_empty() {
            if translation.is_empty() { 0.0 } else { f64::INFINITY }
        } else {
            translation.len() as f64 / reference_tokens.len() as f64
        };
        let brevity_penalty = Self::brevity_penalty(length_ratio);

        let bleu = if translation.is_empty() || reference_tokens.is_empty() {
            0.0
        } else {
            geometric_mean * brevity_penalty
        };

        BleuScore {
            bleu,
            precisions,
            brevity_penalty,
            length_ratio,
            translation_length: translation.len(),
            reference_length: reference_tokens.len(),
        }
    }
}

impl Default for BleuCalculator {
    fn default() -> Self {
        Self::new(4)
    }
}

#[async_trait]
impl MetricCalculator for BleuCalculator {
    type Input = MetricInput;
    type Output = MetricOutput;

    async fn calculate(&self, input: Self::Input) -> Result<Self::Output> {
        let reference = input.reference.unwrap_or_default();
        let result = self.calculate_bleu(&input.predicted, &reference);

        Ok(MetricOutput {
            score: result.bleu,
            metadata: json!({
                "metric": "bleu",
                "max_n": self.max_n,
                "smoothing": self.smoothing,
                "precisions": result.precisions,
                "brevity_penalty": result.brevity_penalty,
                "translation_length": result.translation_length,
                "reference_length": result.reference_length,
            }),
        })
    }
}
