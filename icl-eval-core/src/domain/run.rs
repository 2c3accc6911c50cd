use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::evaluation::{MetricResult, ResultRow};
use super::ids::RunId;
use super::task::Task;

// ===== Model Answers =====

/// Raw output of one method for one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelAnswer {
    pub method: String,
    pub answer: String,
    pub latency_ms: u64,
}

// ===== Evaluation Run =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRun {
    pub id: RunId,
    pub task: Task,
    pub answers: Vec<ModelAnswer>,
    pub results: Vec<MetricResult>,
    pub created_at: DateTime<Utc>,
}

impl EvaluationRun {
    pub fn new(task: Task) -> Self {
        Self {
            id: RunId::new(),
            task,
            answers: Vec::new(),
            results: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn record_answer(&mut self, method: impl Into<String>, answer: impl Into<String>, latency_ms: u64) {
        self.answers.push(ModelAnswer {
            method: method.into(),
            answer: answer.into(),
            latency_ms,
        });
    }

    pub fn extend_results(&mut self, results: impl IntoIterator<Item = MetricResult>) {
        self.results.extend(results);
    }

    /// Results tagged with this run's task.
    pub fn rows(&self) -> Vec<ResultRow> {
        self.results
            .iter()
            .cloned()
            .map(|result| result.with_task(self.task))
            .collect()
    }

    /// Score of a single method/metric pair, if it was recorded.
    pub fn score(&self, method: &str, metric: &str) -> Option<f64> {
        self.results
            .iter()
            .find(|r| r.method == method && r.metric == metric)
            .map(|r| r.score)
    }
}

// ===== Run History =====

/// Append-only, caller-owned record of the runs performed in one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunHistory {
    runs: Vec<EvaluationRun>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, run: EvaluationRun) {
        tracing::debug!(run_id = %run.id, task = %run.task, rows = run.results.len(), "Appended run to history");
        self.runs.push(run);
    }

    pub fn clear(&mut self) {
        self.runs.clear();
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn runs(&self) -> &[EvaluationRun] {
        &self.runs
    }

    /// All rows of all runs, in the order they were appended.
    pub fn rows(&self) -> Vec<ResultRow> {
        self.runs.iter().flat_map(EvaluationRun::rows).collect()
    }
}
