use icl_eval_core::Result;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Backend endpoints and model identifiers for a comparison session.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct WorkflowConfig {
    #[validate(url)]
    pub ollama_url: String,

    /// Ollama models queried as ICL methods, in order.
    #[validate(length(min = 1))]
    pub icl_models: Vec<String>,

    #[validate(url)]
    pub hf_url: String,

    pub hf_token: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub qa_model: String,

    #[validate(length(min = 1, max = 255))]
    pub classification_model: String,

    #[validate(length(min = 1, max = 255))]
    pub translation_model: String,

    #[validate(length(min = 1, max = 255))]
    pub embedding_model: String,

    pub examples_path: String,

    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            icl_models: vec!["llama3".to_string(), "deepseek-r1".to_string()],
            hf_url: "https://api-inference.huggingface.co".to_string(),
            hf_token: None,
            qa_model: "deepset/bert-base-cased-squad2".to_string(),
            classification_model: "textattack/bert-base-uncased-ag-news".to_string(),
            translation_model: "Helsinki-NLP/opus-mt-en-fr".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            examples_path: "examples.json".to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl WorkflowConfig {
    /// Runs the field validators, converting failures into `CoreError::Validation`.
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }
}
