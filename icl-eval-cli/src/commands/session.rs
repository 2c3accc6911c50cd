//! Scripted multi-view sessions
//!
//! A session file is a JSON array of steps. Every step appends to one
//! in-memory history; a `clear` step empties it. The task-wise overview of
//! whatever the history holds at the end is printed last.

use anyhow::{Context as _, Result};
use clap::Args;
use icl_eval_core::RunHistory;
use icl_eval_metrics::HistoryOverview;
use icl_eval_workflow::{ComparisonRequest, ComparisonRunner, DEFAULT_SHOTS};
use serde::Deserialize;
use std::path::PathBuf;

use crate::context::Context;

#[derive(Debug, Args)]
pub struct SessionArgs {
    /// JSON file listing the session steps
    pub file: PathBuf,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum SessionStep {
    Compare(ComparisonRequest),
    Scaling {
        #[serde(default = "default_shots")]
        shots: Vec<usize>,
    },
    Styles {
        #[serde(default)]
        shots: usize,
    },
    Clear,
}

fn default_shots() -> Vec<usize> {
    DEFAULT_SHOTS.to_vec()
}

pub fn load_steps(path: &std::path::Path) -> Result<Vec<SessionStep>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read session file {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse session file {:?}", path))
}

async fn run_step(
    runner: &ComparisonRunner,
    step: &SessionStep,
    history: &mut RunHistory,
) -> Result<()> {
    match step {
        SessionStep::Compare(request) => {
            runner.run_comparison(request, history).await?;
        }
        SessionStep::Scaling { shots } => {
            runner.few_shot_scaling(shots, history).await?;
        }
        SessionStep::Styles { shots } => {
            runner.prompt_style_effect(*shots, history).await?;
        }
        SessionStep::Clear => history.clear(),
    }
    Ok(())
}

pub async fn execute(ctx: &Context, args: SessionArgs) -> Result<()> {
    let steps = load_steps(&args.file)?;
    let runner = ctx.runner()?;
    let mut history = RunHistory::new();

    let progress = ctx.output.progress_bar(steps.len() as u64, "Running session");
    for (index, step) in steps.iter().enumerate() {
        tracing::info!(step = index + 1, ?step, "Session step");
        let result = run_step(&runner, step, &mut history).await;
        if let Some(pb) = &progress {
            pb.inc(1);
        }
        if let Err(err) = result {
            if let Some(pb) = &progress {
                pb.abandon();
            }
            return Err(err).with_context(|| format!("Session step {} failed", index + 1));
        }
    }
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    ctx.output
        .write_section("All Results", &history.rows())?;
    ctx.output
        .write_section("Task-Wise Performance Summary", &history.overview())?;
    Ok(())
}
