use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// NLP task family under evaluation.
///
/// `Freeform` stands for any task without a template or metric set: the
/// prompt builder passes the context through verbatim and the metrics
/// engine refuses to score it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    QuestionAnswering,
    Classification,
    Translation,
    Freeform,
}

impl Task {
    /// The tasks that carry a prompt template and a metric set.
    pub const EVALUATED: [Task; 3] = [
        Task::QuestionAnswering,
        Task::Classification,
        Task::Translation,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Task::QuestionAnswering => "Question Answering (SQuAD)",
            Task::Classification => "Text Classification (AG News)",
            Task::Translation => "Translation (WMT)",
            Task::Freeform => "Freeform",
        }
    }

    pub fn is_evaluated(&self) -> bool {
        !matches!(self, Task::Freeform)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Task {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "qa" | "question_answering" | "question-answering" | "question answering (squad)" => {
                Ok(Task::QuestionAnswering)
            }
            "classification" | "text-classification" | "text classification (ag news)" => {
                Ok(Task::Classification)
            }
            "translation" | "translation (wmt)" => Ok(Task::Translation),
            "freeform" => Ok(Task::Freeform),
            _ => Err(CoreError::Validation(format!("Unknown task: {}", s))),
        }
    }
}

/// Prompting strategy for in-context learning. Only question answering
/// distinguishes between styles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PromptStyle {
    #[default]
    ZeroShot,
    FewShot,
    ChainOfThought,
}

impl PromptStyle {
    pub const ALL: [PromptStyle; 3] = [
        PromptStyle::ZeroShot,
        PromptStyle::FewShot,
        PromptStyle::ChainOfThought,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PromptStyle::ZeroShot => "Zero-Shot",
            PromptStyle::FewShot => "Few-Shot",
            PromptStyle::ChainOfThought => "Chain-of-Thought",
        }
    }
}

impl fmt::Display for PromptStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for PromptStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "zero-shot" | "zeroshot" => Ok(PromptStyle::ZeroShot),
            "few-shot" | "fewshot" => Ok(PromptStyle::FewShot),
            "chain-of-thought" | "cot" => Ok(PromptStyle::ChainOfThought),
            _ => Err(CoreError::Validation(format!("Unknown prompt style: {}", s))),
        }
    }
}
