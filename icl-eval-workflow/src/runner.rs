//! Comparison orchestration: one fine-tuned baseline against every
//! configured ICL model, plus the few-shot and prompt-style sweeps.
//!
//! Backend calls are awaited one after another. Every completed run is
//! appended to the caller's [`RunHistory`].

use icl_eval_core::{
    ChatModel, CoreError, EvaluationRun, FineTunedModel, MetricResult, PromptBuilder,
    PromptStyle, Result, RunHistory, TabularRecord, Task, format_score,
};
use icl_eval_metrics::engine::{metric_names, MetricsEngine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::Instant;

/// Question used by both sweeps.
pub const SWEEP_QUESTION: &str = "What is Python?";
pub const SWEEP_CONTEXT: &str =
    "Python is a widely-used programming language for AI and web development.";
pub const SWEEP_EXPECTED: &str = "a programming language";

/// Shot counts of the default scaling sweep.
pub const DEFAULT_SHOTS: [usize; 4] = [0, 1, 3, 5];

/// Method label for an ICL model.
pub fn icl_method(model: &str) -> String {
    format!("ICL-{}", model)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Inputs of a single comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonRequest {
    pub task: Task,
    #[serde(default)]
    pub style: PromptStyle,
    #[serde(default)]
    pub n_shots: usize,
    /// Passage (QA), headline (classification) or English source (translation).
    pub context: String,
    #[serde(default)]
    pub question: String,
    pub expected: String,
}

impl ComparisonRequest {
    /// Ready-made inputs for each task.
    pub fn sample(task: Task) -> Self {
        let (context, question, expected) = match task {
            Task::QuestionAnswering => (
                "Python is a programming language used in AI and web development.",
                "What is Python?",
                "a programming language",
            ),
            Task::Classification => ("Apple releases new iPhone model", "", "World"),
            Task::Translation => ("Hello, how are you?", "", "Bonjour, comment ça va ?"),
            Task::Freeform => ("", "", ""),
        };

        Self {
            task,
            style: PromptStyle::default(),
            n_shots: 0,
            context: context.to_string(),
            question: question.to_string(),
            expected: expected.to_string(),
        }
    }

    pub fn with_style(mut self, style: PromptStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_shots(mut self, n_shots: usize) -> Self {
        self.n_shots = n_shots;
        self
    }
}

/// F1 of one ICL model at one shot count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScalingPoint {
    pub model: String,
    pub n_shots: usize,
    pub f1: f64,
}

impl TabularRecord for ScalingPoint {
    fn columns() -> &'static [&'static str] {
        &["Model", "Few-Shot Examples", "F1"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.model.clone(), self.n_shots.to_string(), format_score(self.f1)]
    }
}

/// F1 of one ICL model under one prompt style.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StyleEffect {
    pub style: PromptStyle,
    pub model: String,
    pub f1: f64,
}

impl TabularRecord for StyleEffect {
    fn columns() -> &'static [&'static str] {
        &["Prompt Style", "Model", "F1"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.style.display_name().to_string(),
            self.model.clone(),
            format_score(self.f1),
        ]
    }
}

#[derive(Clone)]
pub struct ComparisonRunner {
    chat: Arc<dyn ChatModel>,
    fine_tuned: Arc<dyn FineTunedModel>,
    engine: MetricsEngine,
    prompts: PromptBuilder,
    icl_models: Vec<String>,
}

impl ComparisonRunner {
    pub fn new(
        chat: Arc<dyn ChatModel>,
        fine_tuned: Arc<dyn FineTunedModel>,
        engine: MetricsEngine,
        prompts: PromptBuilder,
        icl_models: Vec<String>,
    ) -> Self {
        Self {
            chat,
            fine_tuned,
            engine,
            prompts,
            icl_models,
        }
    }

    pub fn icl_models(&self) -> &[String] {
        &self.icl_models
    }

    async fn fine_tuned_answer(&self, request: &ComparisonRequest) -> Result<String> {
        match request.task {
            Task::QuestionAnswering => {
                self.fine_tuned
                    .answer_question(&request.question, &request.context)
                    .await
            }
            Task::Classification => self.fine_tuned.classify(&request.context).await,
            Task::Translation => self.fine_tuned.translate(&request.context).await,
            Task::Freeform => Err(CoreError::UnsupportedTask(request.task)),
        }
    }

    async fn timed_generate(&self, model: &str, prompt: &str) -> Result<(String, u64)> {
        let start = Instant::now();
        let answer = self.chat.generate(model, prompt).await?;
        let latency_ms = start.elapsed().as_millis() as u64;
        tracing::info!(model, latency_ms, "ICL response");
        Ok((answer, latency_ms))
    }

    /// Runs the fine-tuned baseline and every ICL model on one input, scores
    /// each answer with the task's metric set and appends the run to
    /// `history`.
    pub async fn run_comparison(
        &self,
        request: &ComparisonRequest,
        history: &mut RunHistory,
    ) -> Result<EvaluationRun> {
        if !request.task.is_evaluated() {
            return Err(CoreError::UnsupportedTask(request.task));
        }

        tracing::info!(
            task = %request.task,
            style = %request.style,
            n_shots = request.n_shots,
            "Running comparison"
        );
        let mut run = EvaluationRun::new(request.task);

        let start = Instant::now();
        let ft_answer = self.fine_tuned_answer(request).await?;
        let ft_method = self.fine_tuned.method_name().to_string();
        run.record_answer(&ft_method, &ft_answer, start.elapsed().as_millis() as u64);
        run.extend_results(
            self.engine
                .score(request.task, &ft_method, &ft_answer, &request.expected)
                .await?,
        );

        let prompt = self.prompts.build(
            &request.context,
            &request.question,
            request.style,
            request.task,
            request.n_shots,
        )?;

        for model in &self.icl_models {
            let (answer, latency_ms) = self.timed_generate(model, &prompt).await?;
            let method = icl_method(model);
            run.record_answer(&method, &answer, latency_ms);
            run.extend_results(
                self.engine
                    .score(request.task, &method, &answer, &request.expected)
                    .await?,
            );
        }

        tracing::info!(run_id = %run.id, rows = run.results.len(), "Comparison finished");
        history.append(run.clone());
        Ok(run)
    }

    /// QA F1 of every ICL model with the few-shot style at each shot count.
    pub async fn few_shot_scaling(
        &self,
        shots: &[usize],
        history: &mut RunHistory,
    ) -> Result<Vec<ScalingPoint>> {
        let mut run = EvaluationRun::new(Task::QuestionAnswering);
        let mut points = Vec::with_capacity(shots.len() * self.icl_models.len());

        for &n_shots in shots {
            let prompt = self.prompts.build(
                SWEEP_CONTEXT,
                SWEEP_QUESTION,
                PromptStyle::FewShot,
                Task::QuestionAnswering,
                n_shots,
            )?;

            for model in &self.icl_models {
                let (answer, latency_ms) = self.timed_generate(model, &prompt).await?;
                let f1 = round2(self.engine.compute_f1(&answer, SWEEP_EXPECTED).await?);
                tracing::info!(model, n_shots, f1, "Few-shot point");

                let method = icl_method(model);
                run.record_answer(&method, &answer, latency_ms);
                run.extend_results([MetricResult::new(&method, metric_names::F1, f1)]);
                points.push(ScalingPoint {
                    model: model.clone(),
                    n_shots,
                    f1,
                });
            }
        }

        history.append(run);
        Ok(points)
    }

    /// QA F1 of every ICL model under each prompt style.
    ///
    /// With `n_shots == 0` every style renders the zero-shot prompt.
    pub async fn prompt_style_effect(
        &self,
        n_shots: usize,
        history: &mut RunHistory,
    ) -> Result<Vec<StyleEffect>> {
        let mut run = EvaluationRun::new(Task::QuestionAnswering);
        let mut effects = Vec::with_capacity(PromptStyle::ALL.len() * self.icl_models.len());

        for style in PromptStyle::ALL {
            let prompt = self.prompts.build(
                SWEEP_CONTEXT,
                SWEEP_QUESTION,
                style,
                Task::QuestionAnswering,
                n_shots,
            )?;

            for model in &self.icl_models {
                let (answer, latency_ms) = self.timed_generate(model, &prompt).await?;
                let f1 = round2(self.engine.compute_f1(&answer, SWEEP_EXPECTED).await?);

                let method = icl_method(model);
                run.record_answer(&method, &answer, latency_ms);
                run.extend_results([MetricResult::new(&method, metric_names::F1, f1)]);
                effects.push(StyleEffect {
                    style,
                    model: model.clone(),
                    f1,
                });
            }
        }

        history.append(run);
        Ok(effects)
    }
}
