use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{
    compare::CompareArgs, prompt::PromptArgs, score::ScoreArgs, session::SessionArgs,
    sweeps::{ScalingArgs, StylesArgs},
};
use crate::output::OutputFormat;

/// Compare in-context learning against fine-tuned models on QA,
/// classification and translation.
#[derive(Debug, Parser)]
#[command(name = "icl-eval", version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Additional configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Ollama server URL
    #[arg(long, global = true)]
    pub ollama_url: Option<String>,

    /// Few-shot example bank (JSON)
    #[arg(long, global = true)]
    pub examples: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render the prompt an ICL model would receive
    Prompt(PromptArgs),

    /// Score one prediction against a reference, offline
    Score(ScoreArgs),

    /// Run the fine-tuned baseline and every ICL model on one input
    Compare(CompareArgs),

    /// Few-shot performance curve for question answering
    Scaling(ScalingArgs),

    /// F1 under each prompt style for question answering
    Styles(StylesArgs),

    /// Run a scripted session and print the task-wise overview
    Session(SessionArgs),
}
