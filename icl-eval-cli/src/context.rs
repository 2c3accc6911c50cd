//! CLI execution context

use anyhow::{Context as _, Result};
use icl_eval_core::{JsonFileExampleSource, PromptBuilder};
use icl_eval_metrics::MetricsEngine;
use icl_eval_workflow::{
    ComparisonRunner, HfInferenceModel, JsonClient, OllamaChatModel, OllamaEmbeddingScorer,
    WorkflowConfig,
};
use std::sync::Arc;
use std::time::Duration;

use crate::cli::Cli;
use crate::output::OutputWriter;

/// Execution context for CLI commands
pub struct Context {
    pub config: WorkflowConfig,
    pub output: OutputWriter,
    pub verbose: bool,
}

impl Context {
    pub fn new(cli: &Cli) -> Result<Self> {
        let mut config = crate::config::load(cli.config.as_deref())?;

        if let Some(url) = &cli.ollama_url {
            config.ollama_url = url.clone();
        }
        if let Some(path) = &cli.examples {
            config.examples_path = path.display().to_string();
        }
        let config = config.validated().context("Invalid command-line override")?;

        tracing::debug!(?config, "Configuration resolved");

        Ok(Self {
            config,
            output: OutputWriter::new(cli.output, cli.no_color),
            verbose: cli.verbose,
        })
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.request_timeout_secs)
    }

    fn ollama_client(&self) -> Result<JsonClient> {
        JsonClient::new(&self.config.ollama_url, self.timeout())
            .context("Failed to create Ollama client")
    }

    pub fn prompt_builder(&self) -> PromptBuilder {
        PromptBuilder::new(Arc::new(JsonFileExampleSource::new(&self.config.examples_path)))
    }

    /// Metrics engine whose semantic similarity comes from Ollama embeddings.
    pub fn metrics_engine(&self) -> Result<MetricsEngine> {
        let scorer = OllamaEmbeddingScorer::new(self.ollama_client()?, &self.config.embedding_model);
        Ok(MetricsEngine::new(Arc::new(scorer)))
    }

    pub fn runner(&self) -> Result<ComparisonRunner> {
        let chat = OllamaChatModel::new(self.ollama_client()?);

        let hf_client = JsonClient::new(&self.config.hf_url, self.timeout())
            .context("Failed to create inference client")?
            .with_bearer_token(self.config.hf_token.clone());
        let fine_tuned = HfInferenceModel::new(
            hf_client,
            &self.config.qa_model,
            &self.config.classification_model,
            &self.config.translation_model,
        );

        Ok(ComparisonRunner::new(
            Arc::new(chat),
            Arc::new(fine_tuned),
            self.metrics_engine()?,
            self.prompt_builder(),
            self.config.icl_models.clone(),
        ))
    }
}
