//! Offline scoring of a single prediction

use anyhow::{Context as _, Result};
use clap::Args;
use icl_eval_core::{MetricResult, Task};
use icl_eval_metrics::metric_names;

use crate::context::Context;

#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Task (qa, classification, translation)
    #[arg(short, long)]
    pub task: Task,

    /// Model output to score
    #[arg(short, long)]
    pub prediction: String,

    /// Reference answer, label or translation
    #[arg(short, long)]
    pub reference: String,

    /// Method label for the result rows
    #[arg(short, long, default_value = "Prediction")]
    pub method: String,

    /// Skip semantic similarity (translation only; avoids the embedding backend)
    #[arg(long)]
    pub no_semantic: bool,
}

pub async fn execute(ctx: &Context, args: ScoreArgs) -> Result<()> {
    let engine = ctx.metrics_engine()?;

    let results = if args.task == Task::Translation && args.no_semantic {
        vec![
            MetricResult::new(
                &args.method,
                metric_names::BLEU,
                engine.compute_bleu(&args.prediction, &args.reference).await?,
            ),
            MetricResult::new(
                &args.method,
                metric_names::CHRF,
                engine.compute_chrf(&args.prediction, &args.reference).await?,
            ),
        ]
    } else {
        engine
            .score(args.task, &args.method, &args.prediction, &args.reference)
            .await
            .with_context(|| format!("Failed to score {} output", args.task))?
    };

    ctx.output.write_records(&results)
}
