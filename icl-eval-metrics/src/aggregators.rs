use icl_eval_core::{ResultRow, RunHistory, TabularRecord, Task, format_score};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregatedMetrics {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

pub struct MetricAggregator;

impl MetricAggregator {
    pub fn aggregate(values: &[f64]) -> AggregatedMetrics {
        if values.is_empty() {
            return Self::empty();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64;

        AggregatedMetrics {
            mean,
            median: Self::median(&sorted),
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            count: values.len(),
        }
    }

    /// Middle value of a non-empty sorted slice; even lengths average the two middle values.
    fn median(sorted_values: &[f64]) -> f64 {
        let mid = sorted_values.len() / 2;
        if sorted_values.len() % 2 == 0 {
            (sorted_values[mid - 1] + sorted_values[mid]) / 2.0
        } else {
            sorted_values[mid]
        }
    }

    fn empty() -> AggregatedMetrics {
        AggregatedMetrics {
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
            count: 0,
        }
    }
}

/// Score summary of one method on one metric of one task, across runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct OverviewRow {
    pub task: Task,
    pub metric: String,
    pub method: String,
    pub mean_score: f64,
    pub median_score: f64,
    pub std_dev: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub runs: usize,
}

impl TabularRecord for OverviewRow {
    fn columns() -> &'static [&'static str] {
        &["Task", "Metric", "Method", "Mean Score", "Median", "Std Dev", "Min", "Max", "Runs"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.task.to_string(),
            self.metric.clone(),
            self.method.clone(),
            format_score(self.mean_score),
            format_score(self.median_score),
            format_score(self.std_dev),
            format_score(self.min_score),
            format_score(self.max_score),
            self.runs.to_string(),
        ]
    }
}

/// Groups accumulated rows by task, metric and method, sorted by those keys.
pub fn task_overview(rows: &[ResultRow]) -> Vec<OverviewRow> {
    let mut groups: BTreeMap<(Task, &str, &str), Vec<f64>> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.task, row.metric.as_str(), row.method.as_str()))
            .or_default()
            .push(row.score);
    }

    groups
        .into_iter()
        .map(|((task, metric, method), scores)| {
            let agg = MetricAggregator::aggregate(&scores);
            OverviewRow {
                task,
                metric: metric.to_string(),
                method: method.to_string(),
                mean_score: agg.mean,
                median_score: agg.median,
                std_dev: agg.std_dev,
                min_score: agg.min,
                max_score: agg.max,
                runs: agg.count,
            }
        })
        .collect()
}

/// Task-wise summary of everything a session has recorded.
pub trait HistoryOverview {
    fn overview(&self) -> Vec<OverviewRow>;
}

impl HistoryOverview for RunHistory {
    fn overview(&self) -> Vec<OverviewRow> {
        task_overview(&self.rows())
    }
}
