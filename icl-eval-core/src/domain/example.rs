use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// A solved question-answering demonstration used in few-shot prompts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FewShotExample {
    pub context: String,
    pub question: String,
    pub answer: String,
}

impl FewShotExample {
    pub fn new(
        context: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            context: context.into(),
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// An ordered bank of few-shot examples.
pub trait ExampleSource: Send + Sync {
    /// Returns the whole bank in its stored order.
    fn examples(&self) -> Result<Vec<FewShotExample>>;

    /// Returns the first `n` examples, or all of them when the bank is
    /// smaller than `n`.
    fn first(&self, n: usize) -> Result<Vec<FewShotExample>> {
        let mut examples = self.examples()?;
        examples.truncate(n);
        Ok(examples)
    }
}

impl ExampleSource for Vec<FewShotExample> {
    fn examples(&self) -> Result<Vec<FewShotExample>> {
        Ok(self.clone())
    }
}

/// Example bank stored as a JSON array of `{context, question, answer}`
/// objects. The file is read on every call so edits take effect without a
/// restart.
#[derive(Debug, Clone)]
pub struct JsonFileExampleSource {
    path: PathBuf,
}

impl JsonFileExampleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExampleSource for JsonFileExampleSource {
    fn examples(&self) -> Result<Vec<FewShotExample>> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            CoreError::ExampleBank(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        let examples: Vec<FewShotExample> = serde_json::from_str(&content).map_err(|e| {
            CoreError::ExampleBank(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        tracing::debug!(
            path = %self.path.display(),
            count = examples.len(),
            "Loaded few-shot example bank"
        );

        Ok(examples)
    }
}
