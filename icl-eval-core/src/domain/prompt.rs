use std::sync::Arc;

use super::example::{ExampleSource, FewShotExample};
use super::task::{PromptStyle, Task};
use crate::error::Result;

/// Renders task- and style-specific prompts for in-context learning.
///
/// The builder is stateless apart from its example bank, which is only
/// consulted on the few-shot path.
#[derive(Clone)]
pub struct PromptBuilder {
    examples: Arc<dyn ExampleSource>,
}

impl PromptBuilder {
    pub fn new(examples: Arc<dyn ExampleSource>) -> Self {
        Self { examples }
    }

    pub fn build(
        &self,
        context: &str,
        question: &str,
        style: PromptStyle,
        task: Task,
        n_shots: usize,
    ) -> Result<String> {
        build_prompt(context, question, style, task, n_shots, self.examples.as_ref())
    }
}

/// Builds the prompt for one input.
///
/// Zero shots always yields the zero-shot question-answering template, even
/// when another style was requested. Translation and classification ignore
/// `style` and `n_shots`; `Freeform` returns `context` unchanged.
pub fn build_prompt(
    context: &str,
    question: &str,
    style: PromptStyle,
    task: Task,
    n_shots: usize,
    examples: &dyn ExampleSource,
) -> Result<String> {
    let prompt = match task {
        Task::QuestionAnswering => {
            if style == PromptStyle::ZeroShot || n_shots == 0 {
                zero_shot_qa(context, question)
            } else {
                match style {
                    PromptStyle::FewShot => {
                        let shots = examples.first(n_shots)?;
                        few_shot_qa(&shots, context, question)
                    }
                    PromptStyle::ChainOfThought => chain_of_thought_qa(context, question),
                    PromptStyle::ZeroShot => zero_shot_qa(context, question),
                }
            }
        }
        Task::Classification => format!(
            "Classify the news headline into one of the following categories: World, Sports, Business, Sci/Tech.\n\n\
             Headline: {context}\n\n\
             Category:"
        ),
        Task::Translation => format!(
            "Translate the following sentence from English to French.\n\n\
             English: {context}\n\
             French:"
        ),
        Task::Freeform => context.to_string(),
    };

    tracing::debug!(%task, %style, n_shots, chars = prompt.len(), "Built prompt");
    Ok(prompt)
}

fn zero_shot_qa(context: &str, question: &str) -> String {
    format!(
        "Answer the question based only on the context below.\n\n\
         Context:\n{context}\n\n\
         Question:\n{question}\n\n\
         Answer:"
    )
}

fn chain_of_thought_qa(context: &str, question: &str) -> String {
    format!(
        "You are a helpful assistant. Think step-by-step before answering.\n\n\
         Context:\n{context}\n\n\
         Question:\n{question}\n\n\
         Let's think step-by-step:"
    )
}

fn few_shot_qa(shots: &[FewShotExample], context: &str, question: &str) -> String {
    let mut prompt: String = shots.iter().map(render_shot).collect();
    prompt.push_str(&format!("Context: {context}\nQuestion: {question}\nAnswer:"));
    prompt
}

fn render_shot(example: &FewShotExample) -> String {
    format!(
        "Context: {}\nQuestion: {}\nAnswer: {}\n\n",
        example.context, example.question, example.answer
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::JsonFileExampleSource;
    use crate::error::CoreError;
    use pretty_assertions::assert_eq;

    fn bank() -> Vec<FewShotExample> {
        vec![
            FewShotExample::new("Rust is a systems language.", "What is Rust?", "a systems language"),
            FewShotExample::new("Paris is in France.", "Where is Paris?", "France"),
        ]
    }

    #[test]
    fn test_zero_shot_template() {
        let prompt = build_prompt(
            "Python is a programming language.",
            "What is Python?",
            PromptStyle::ZeroShot,
            Task::QuestionAnswering,
            3,
            &bank(),
        )
        .unwrap();

        assert_eq!(
            prompt,
            "Answer the question based only on the context below.\n\n\
             Context:\nPython is a programming language.\n\n\
             Question:\nWhat is Python?\n\n\
             Answer:"
        );
    }

    #[test]
    fn test_few_shot_template() {
        let prompt = build_prompt("ctx", "q?", PromptStyle::FewShot, Task::QuestionAnswering, 1, &bank())
            .unwrap();

        assert_eq!(
            prompt,
            "Context: Rust is a systems language.\nQuestion: What is Rust?\nAnswer: a systems language\n\n\
             Context: ctx\nQuestion: q?\nAnswer:"
        );
    }

    #[test]
    fn test_chain_of_thought_ignores_examples() {
        let prompt = build_prompt("ctx", "q?", PromptStyle::ChainOfThought, Task::QuestionAnswering, 2, &bank())
            .unwrap();

        assert!(prompt.starts_with("You are a helpful assistant. Think step-by-step before answering."));
        assert!(prompt.ends_with("Let's think step-by-step:"));
        assert!(!prompt.contains("Rust"));
    }

    #[test]
    fn test_classification_and_translation_ignore_style() {
        for style in PromptStyle::ALL {
            let clf = build_prompt("Apple releases new iPhone model", "", style, Task::Classification, 5, &bank())
                .unwrap();
            assert_eq!(
                clf,
                "Classify the news headline into one of the following categories: World, Sports, Business, Sci/Tech.\n\n\
                 Headline: Apple releases new iPhone model\n\n\
                 Category:"
            );

            let tr = build_prompt("Hello, how are you?", "", style, Task::Translation, 5, &bank()).unwrap();
            assert_eq!(
                tr,
                "Translate the following sentence from English to French.\n\n\
                 English: Hello, how are you?\n\
                 French:"
            );
        }
    }

    #[test]
    fn test_freeform_passes_context_through() {
        let prompt = build_prompt("raw text", "ignored", PromptStyle::FewShot, Task::Freeform, 3, &bank())
            .unwrap();
        assert_eq!(prompt, "raw text");
    }

    #[test]
    fn test_missing_bank_is_fatal_only_on_few_shot_path() {
        let missing = JsonFileExampleSource::new("/nonexistent/examples.json");

        let result = build_prompt("c", "q", PromptStyle::FewShot, Task::QuestionAnswering, 1, &missing);
        assert!(matches!(result, Err(CoreError::ExampleBank(_))));

        let zero = build_prompt("c", "q", PromptStyle::FewShot, Task::QuestionAnswering, 0, &missing);
        assert!(zero.is_ok());
    }

    #[test]
    fn test_builder_delegates_to_bank() {
        let builder = PromptBuilder::new(Arc::new(bank()));
        let prompt = builder
            .build("c", "q", PromptStyle::FewShot, Task::QuestionAnswering, 10)
            .unwrap();
        assert_eq!(prompt.matches("Context: ").count(), 3);
    }
}
