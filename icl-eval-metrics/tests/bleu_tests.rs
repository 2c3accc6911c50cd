use approx::assert_relative_eq;
use icl_eval_core::MetricCalculator;
use icl_eval_metrics::calculators::{BleuCalculator, MetricInput, SmoothingMethod};

#[tokio::test]
async fn test_bleu_identical_sentence() {
    let calculator = BleuCalculator::default();
    let result = calculator
        .calculate(MetricInput::new(
            "Le chat est assis sur le tapis.",
            "Le chat est assis sur le tapis.",
        ))
        .await
        .unwrap();
    assert_relative_eq!(result.score, 1.0, epsilon = 1e-9);
    assert_eq!(result.metadata["brevity_penalty"].as_f64().unwrap(), 1.0);
}

#[tokio::test]
async fn test_bleu_no_overlap() {
    let calculator = BleuCalculator::default();
    let result = calculator
        .calculate(MetricInput::new("bonjour tout le monde", "il pleut beaucoup aujourd'hui"))
        .await
        .unwrap();
    assert_eq!(result.score, 0.0);
}

#[tokio::test]
async fn test_bleu_empty_candidate_scores_zero() {
    let calculator = BleuCalculator::default();
    let result = calculator
        .calculate(MetricInput::new("", "Le chat est assis."))
        .await
        .unwrap();
    assert_eq!(result.score, 0.0);
}

#[tokio::test]
async fn test_bleu_empty_reference_scores_zero() {
    let calculator = BleuCalculator::default();
    let result = calculator
        .calculate(MetricInput::new("Le chat est assis.", ""))
        .await
        .unwrap();
    assert_eq!(result.score, 0.0);
}

#[test]
fn test_bleu_brevity_penalty_for_short_candidate() {
    let calculator = BleuCalculator::new(1);
    // 4 of 8 tokens, every candidate unigram matches.
    let score = calculator.calculate_bleu("a b c d", "a b c d e f g h");
    assert_relative_eq!(score.precisions[0], 1.0, epsilon = 1e-9);
    assert_relative_eq!(score.length_ratio, 0.5, epsilon = 1e-9);
    assert_relative_eq!(score.bleu, (-1.0f64).exp(), epsilon = 1e-9);
}

#[test]
fn test_bleu_clipped_precision() {
    let calculator = BleuCalculator::new(1);
    let score = calculator.calculate_bleu("the the the the", "the cat");
    // "the" clipped to its single reference occurrence.
    assert_relative_eq!(score.precisions[0], 0.25, epsilon = 1e-9);
}

#[test]
fn test_bleu_partial_match_is_between_bounds() {
    let calculator = BleuCalculator::default().with_smoothing(SmoothingMethod::AddOne);
    let score = calculator.calculate_bleu(
        "le chat est sur le tapis rouge",
        "le chat est assis sur le tapis",
    );
    assert!(score.bleu > 0.0 && score.bleu < 1.0);
}
