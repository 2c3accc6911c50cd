use approx::assert_relative_eq;
use icl_eval_core::{MetricResult, Task};
use icl_eval_metrics::aggregators::{task_overview, MetricAggregator};
use pretty_assertions::assert_eq;

#[test]
fn test_aggregate_basic_stats() {
    let aggregated = MetricAggregator::aggregate(&[10.0, 20.0, 30.0, 40.0, 50.0]);

    assert_eq!(aggregated.count, 5);
    assert_eq!(aggregated.min, 10.0);
    assert_eq!(aggregated.max, 50.0);
    assert_relative_eq!(aggregated.mean, 30.0, epsilon = 1e-9);
    assert_relative_eq!(aggregated.median, 30.0, epsilon = 1e-9);
}

#[test]
fn test_aggregate_even_length_median() {
    assert_relative_eq!(MetricAggregator::aggregate(&[40.0, 60.0]).median, 50.0, epsilon = 1e-9);
    assert_relative_eq!(
        MetricAggregator::aggregate(&[90.0, 10.0, 30.0, 20.0]).median,
        25.0,
        epsilon = 1e-9
    );
}

#[test]
fn test_aggregate_empty() {
    let aggregated = MetricAggregator::aggregate(&[]);
    assert_eq!(aggregated.count, 0);
    assert_eq!(aggregated.mean, 0.0);
}

#[test]
fn test_aggregate_std_dev() {
    let aggregated = MetricAggregator::aggregate(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
    assert_relative_eq!(aggregated.std_dev, 2.0, epsilon = 1e-9);
}

#[test]
fn test_task_overview_groups_and_sorts() {
    let rows = vec![
        MetricResult::new("ICL-llama3", "F1", 40.0).with_task(Task::QuestionAnswering),
        MetricResult::new("ICL-llama3", "F1", 60.0).with_task(Task::QuestionAnswering),
        MetricResult::new("Fine-Tuned BERT", "BLEU", 30.0).with_task(Task::Translation),
        MetricResult::new("Fine-Tuned BERT", "F1", 90.0).with_task(Task::QuestionAnswering),
    ];

    let overview = task_overview(&rows);
    assert_eq!(overview.len(), 3);

    assert_eq!(overview[0].task, Task::QuestionAnswering);
    assert_eq!(overview[0].method, "Fine-Tuned BERT");
    assert_eq!(overview[1].method, "ICL-llama3");
    assert_relative_eq!(overview[1].mean_score, 50.0, epsilon = 1e-9);
    assert_relative_eq!(overview[1].median_score, 50.0, epsilon = 1e-9);
    assert_relative_eq!(overview[1].std_dev, 10.0, epsilon = 1e-9);
    assert_eq!(overview[1].min_score, 40.0);
    assert_eq!(overview[1].max_score, 60.0);
    assert_eq!(overview[1].runs, 2);
    assert_eq!(overview[2].task, Task::Translation);
}

#[test]
fn test_task_overview_empty() {
    assert!(task_overview(&[]).is_empty());
}

#[test]
fn test_history_overview() {
    use icl_eval_core::{EvaluationRun, RunHistory};
    use icl_eval_metrics::aggregators::HistoryOverview;

    let mut history = RunHistory::new();
    for score in [20.0, 80.0] {
        let mut run = EvaluationRun::new(Task::Classification);
        run.extend_results([MetricResult::new("ICL-llama3", "Accuracy", score)]);
        history.append(run);
    }

    let overview = history.overview();
    assert_eq!(overview.len(), 1);
    assert_relative_eq!(overview[0].mean_score, 50.0, epsilon = 1e-9);
    assert_eq!(overview[0].runs, 2);

    history.clear();
    assert!(history.overview().is_empty());
}
