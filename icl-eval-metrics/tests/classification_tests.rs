use approx::assert_relative_eq;
use icl_eval_core::{Label, MetricCalculator};
use icl_eval_metrics::calculators::{ClassificationCalculator, LabelPair};
use rstest::rstest;

#[rstest]
#[case("This is about world politics and sports", Label::World)]
#[case("Sports and business news", Label::Sports)]
#[case("A sci/tech breakthrough", Label::SciTech)]
#[case("BUSINESS", Label::Business)]
#[case("politics", Label::Unknown)]
fn test_prediction_normalization_precedence(#[case] text: &str, #[case] expected: Label) {
    let pair = LabelPair::from_texts(text, "world");
    assert_eq!(pair.predicted, expected);
}

#[tokio::test]
async fn test_unknown_prediction_against_known_reference() {
    let calculator = ClassificationCalculator::new();
    let report = calculator
        .calculate(vec![LabelPair::from_texts("politics", "world")])
        .await
        .unwrap();

    assert_eq!(report.accuracy, 0.0);
    assert_eq!(report.precision, 0.0);
    assert_eq!(report.recall, 0.0);
    assert_eq!(report.f1, 0.0);
}

#[tokio::test]
async fn test_known_prediction_against_out_of_vocabulary_reference() {
    let pair = LabelPair::from_texts("world", "politics");
    assert_eq!(pair.predicted, Label::World);
    assert_eq!(pair.reference, Label::Unknown);

    let report = ClassificationCalculator::new()
        .calculate(vec![pair])
        .await
        .unwrap();

    assert_eq!(report.accuracy, 0.0);
    assert_eq!(report.precision, 0.0);
    assert_eq!(report.recall, 0.0);
    assert_eq!(report.f1, 0.0);
}

#[tokio::test]
async fn test_unknown_reference_matches_unknown_prediction() {
    let calculator = ClassificationCalculator::new();
    let report = calculator
        .calculate(vec![LabelPair::from_texts("no idea", "politics")])
        .await
        .unwrap();

    assert_eq!(report.accuracy, 1.0);
    assert_relative_eq!(report.f1, 0.2, epsilon = 1e-12);
}

#[tokio::test]
async fn test_balanced_batch() {
    let calculator = ClassificationCalculator::new();
    let pairs = vec![
        LabelPair::from_texts("world", "world"),
        LabelPair::from_texts("sports", "sports"),
        LabelPair::from_texts("business", "business"),
        LabelPair::from_texts("sci/tech", "sci/tech"),
    ];
    let report = calculator.calculate(pairs).await.unwrap();

    assert_eq!(report.accuracy, 1.0);
    // Four perfect labels plus an absent Unknown label.
    assert_relative_eq!(report.precision, 0.8, epsilon = 1e-12);
    assert_relative_eq!(report.recall, 0.8, epsilon = 1e-12);
    assert_relative_eq!(report.f1, 0.8, epsilon = 1e-12);
}
