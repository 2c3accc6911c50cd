//! Few-shot scaling and prompt-style sweeps

use anyhow::{Context as _, Result};
use clap::Args;
use icl_eval_core::RunHistory;
use icl_eval_workflow::DEFAULT_SHOTS;

use crate::context::Context;

#[derive(Debug, Args)]
pub struct ScalingArgs {
    /// Shot counts to evaluate (comma-separated)
    #[arg(short = 'n', long, value_delimiter = ',', default_values_t = DEFAULT_SHOTS)]
    pub shots: Vec<usize>,
}

#[derive(Debug, Args)]
pub struct StylesArgs {
    /// Shots used by the few-shot and chain-of-thought styles; with 0 every
    /// style falls back to the zero-shot prompt
    #[arg(short = 'n', long, default_value_t = 0)]
    pub shots: usize,
}

pub async fn scaling(ctx: &Context, args: ScalingArgs) -> Result<()> {
    let runner = ctx.runner()?;
    let mut history = RunHistory::new();

    let spinner = ctx.output.spinner("Running few-shot evaluations across models...");
    let result = runner.few_shot_scaling(&args.shots, &mut history).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let points = result.context("Few-shot scaling failed")?;

    ctx.output.write_section("F1 vs Few-Shot Examples", &points)
}

pub async fn styles(ctx: &Context, args: StylesArgs) -> Result<()> {
    if args.shots == 0 {
        ctx.output
            .info("With 0 shots every style renders the zero-shot prompt; pass --shots to compare styles");
    }

    let runner = ctx.runner()?;
    let mut history = RunHistory::new();

    let spinner = ctx.output.spinner("Evaluating prompt styles...");
    let result = runner.prompt_style_effect(args.shots, &mut history).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let effects = result.context("Prompt style comparison failed")?;

    ctx.output.write_section("Prompt Style Impact on F1", &effects)
}
