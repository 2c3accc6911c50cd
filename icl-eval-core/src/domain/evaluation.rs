use serde::{Deserialize, Serialize};

use super::task::Task;

/// One scored metric for one method.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct MetricResult {
    pub method: String,
    pub metric: String,
    pub score: f64,
}

impl MetricResult {
    pub fn new(method: impl Into<String>, metric: impl Into<String>, score: f64) -> Self {
        Self {
            method: method.into(),
            metric: metric.into(),
            score,
        }
    }

    pub fn with_task(self, task: Task) -> ResultRow {
        ResultRow {
            method: self.method,
            metric: self.metric,
            score: self.score,
            task,
        }
    }
}

/// A metric result tagged with the task it was produced for; the shape
/// accumulated across runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ResultRow {
    pub method: String,
    pub metric: String,
    pub score: f64,
    pub task: Task,
}

/// A record that can be laid out as one row of a report table.
pub trait TabularRecord {
    fn columns() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

impl TabularRecord for MetricResult {
    fn columns() -> &'static [&'static str] {
        &["Method", "Metric", "Score"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.method.clone(), self.metric.clone(), format_score(self.score)]
    }
}

impl TabularRecord for ResultRow {
    fn columns() -> &'static [&'static str] {
        &["Method", "Metric", "Score", "Task"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.method.clone(),
            self.metric.clone(),
            format_score(self.score),
            self.task.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_result_serializes_with_report_columns() {
        let result = MetricResult::new("ICL-llama3", "F1", 50.0);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["Method"], "ICL-llama3");
        assert_eq!(json["Metric"], "F1");
        assert_eq!(json["Score"], 50.0);
    }

    #[test]
    fn test_with_task_keeps_fields() {
        let row = MetricResult::new("Fine-Tuned BERT", "BLEU", 12.5).with_task(Task::Translation);
        assert_eq!(row.method, "Fine-Tuned BERT");
        assert_eq!(row.task, Task::Translation);
        assert_eq!(row.cells(), vec!["Fine-Tuned BERT", "BLEU", "12.50", "Translation (WMT)"]);
    }
}
