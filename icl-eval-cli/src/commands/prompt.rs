//! Prompt rendering

use anyhow::{Context as _, Result};
use clap::Args;
use icl_eval_core::{PromptStyle, Task};
use serde::Serialize;

use crate::context::Context;
use crate::output::OutputFormat;

#[derive(Debug, Args)]
pub struct PromptArgs {
    /// Task (qa, classification, translation, freeform)
    #[arg(short, long)]
    pub task: Task,

    /// Prompt style (zero-shot, few-shot, chain-of-thought)
    #[arg(short, long, default_value = "zero-shot")]
    pub style: PromptStyle,

    /// Number of few-shot examples
    #[arg(short = 'n', long, default_value_t = 0)]
    pub shots: usize,

    /// Passage, headline or source sentence
    #[arg(long)]
    pub context: String,

    /// Question (question answering only)
    #[arg(short, long, default_value = "")]
    pub question: String,
}

#[derive(Debug, Serialize)]
struct RenderedPrompt<'a> {
    task: &'a str,
    style: &'a str,
    n_shots: usize,
    prompt: &'a str,
}

pub async fn execute(ctx: &Context, args: PromptArgs) -> Result<()> {
    let prompt = ctx
        .prompt_builder()
        .build(&args.context, &args.question, args.style, args.task, args.shots)
        .with_context(|| format!("Failed to build prompt for {}", args.task))?;

    match ctx.output.format() {
        OutputFormat::Table | OutputFormat::Latex | OutputFormat::Markdown => println!("{}", prompt),
        _ => ctx.output.write_value(&RenderedPrompt {
            task: args.task.display_name(),
            style: args.style.display_name(),
            n_shots: args.shots,
            prompt: &prompt,
        })?,
    }
    Ok(())
}
