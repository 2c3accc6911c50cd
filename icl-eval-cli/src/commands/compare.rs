//! Fine-tuned vs ICL comparison

use anyhow::{Context as _, Result};
use clap::Args;
use icl_eval_core::{EvaluationRun, PromptStyle, RunHistory, TabularRecord, Task};
use icl_eval_workflow::ComparisonRequest;
use serde::Serialize;

use crate::context::Context;

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Task (qa, classification, translation)
    #[arg(short, long)]
    pub task: Task,

    /// Prompt style for the ICL models
    #[arg(short, long, default_value = "zero-shot")]
    pub style: PromptStyle,

    /// Number of few-shot examples
    #[arg(short = 'n', long, default_value_t = 0)]
    pub shots: usize,

    /// Passage, headline or source sentence (defaults to a sample input)
    #[arg(long)]
    pub context: Option<String>,

    /// Question (question answering only)
    #[arg(short, long)]
    pub question: Option<String>,

    /// Expected answer, category or translation
    #[arg(short, long)]
    pub expected: Option<String>,
}

impl CompareArgs {
    fn into_request(self) -> ComparisonRequest {
        let sample = ComparisonRequest::sample(self.task);
        ComparisonRequest {
            task: self.task,
            style: self.style,
            n_shots: self.shots,
            context: self.context.unwrap_or(sample.context),
            question: self.question.unwrap_or(sample.question),
            expected: self.expected.unwrap_or(sample.expected),
        }
    }
}

/// One model's raw answer, for display.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnswerRow {
    pub method: String,
    pub answer: String,
    pub latency_ms: u64,
}

impl TabularRecord for AnswerRow {
    fn columns() -> &'static [&'static str] {
        &["Method", "Answer", "Latency (ms)"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.method.clone(),
            self.answer.clone(),
            self.latency_ms.to_string(),
        ]
    }
}

pub fn answer_rows(run: &EvaluationRun) -> Vec<AnswerRow> {
    run.answers
        .iter()
        .map(|a| AnswerRow {
            method: a.method.clone(),
            answer: a.answer.clone(),
            latency_ms: a.latency_ms,
        })
        .collect()
}

pub async fn execute(ctx: &Context, args: CompareArgs) -> Result<()> {
    let request = args.into_request();
    if request.task != Task::QuestionAnswering && request.style != PromptStyle::ZeroShot {
        ctx.output
            .warning("Prompt style only changes question answering prompts; it is ignored here");
    }
    let runner = ctx.runner()?;
    let mut history = RunHistory::new();

    let spinner = ctx.output.spinner(&format!(
        "Running {} with {} ICL model(s)...",
        request.task,
        runner.icl_models().len()
    ));
    let result = runner.run_comparison(&request, &mut history).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let run = result.with_context(|| format!("{} comparison failed", request.task))?;

    if ctx.verbose {
        ctx.output.write_section("Model Answers", &answer_rows(&run))?;
    }
    ctx.output
        .write_section(&format!("{} - Model Performance", request.task), &run.results)?;
    ctx.output.success(&format!("Run {} complete", run.id));
    Ok(())
}
