use async_trait::async_trait;
use icl_eval_core::{CoreError, FineTunedModel, Label, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::http::JsonClient;

pub const FINE_TUNED_METHOD: &str = "Fine-Tuned BERT";

/// Resolves a raw classifier label to a category, either through the
/// `LABEL_n` map or because it already names one.
fn canonical_label(raw: &str) -> Option<Label> {
    match raw {
        "LABEL_0" | "label_0" => Some(Label::World),
        "LABEL_1" | "label_1" => Some(Label::Sports),
        "LABEL_2" | "label_2" => Some(Label::Business),
        "LABEL_3" | "label_3" => Some(Label::SciTech),
        other => match Label::from_reference(other) {
            Label::Unknown => None,
            label => Some(label),
        },
    }
}

/// Maps the AG News classifier's raw output label to a category name.
///
/// Unmapped labels are passed through lowercased and trimmed.
pub fn map_classifier_label(raw: &str) -> String {
    match canonical_label(raw) {
        Some(label) => label.as_str().to_string(),
        None => {
            tracing::warn!(label = raw, "Classifier returned a label outside the AG News map");
            raw.trim().to_lowercase()
        }
    }
}

#[derive(Debug, Serialize)]
struct QuestionInputs<'a> {
    question: &'a str,
    context: &'a str,
}

#[derive(Debug, Deserialize)]
struct QuestionAnswer {
    answer: String,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    #[serde(default)]
    score: f64,
}

/// Text classification responses come either flat or nested one level,
/// depending on the serving stack.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassificationResponse {
    fn top_label(self) -> Option<LabelScore> {
        let candidates = match self {
            ClassificationResponse::Nested(outer) => outer.into_iter().next().unwrap_or_default(),
            ClassificationResponse::Flat(flat) => flat,
        };
        candidates
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

#[derive(Debug, Deserialize)]
struct Translation {
    translation_text: String,
}

/// Fine-tuned baselines served by a Hugging Face Inference-style endpoint.
#[derive(Debug, Clone)]
pub struct HfInferenceModel {
    client: JsonClient,
    qa_model: String,
    classification_model: String,
    translation_model: String,
}

impl HfInferenceModel {
    pub fn new(
        client: JsonClient,
        qa_model: impl Into<String>,
        classification_model: impl Into<String>,
        translation_model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            qa_model: qa_model.into(),
            classification_model: classification_model.into(),
            translation_model: translation_model.into(),
        }
    }

    fn model_path(model: &str) -> String {
        format!("/models/{}", model)
    }
}

#[async_trait]
impl FineTunedModel for HfInferenceModel {
    fn method_name(&self) -> &str {
        FINE_TUNED_METHOD
    }

    async fn answer_question(&self, question: &str, context: &str) -> Result<String> {
        let inputs = QuestionInputs { question, context };
        let body = json!({ "inputs": inputs });
        let response: QuestionAnswer = self
            .client
            .post(&Self::model_path(&self.qa_model), &body)
            .await?;
        Ok(response.answer)
    }

    async fn classify(&self, text: &str) -> Result<String> {
        let body = json!({ "inputs": text });
        let response: ClassificationResponse = self
            .client
            .post(&Self::model_path(&self.classification_model), &body)
            .await?;

        let top = response.top_label().ok_or_else(|| {
            CoreError::Backend(format!("{} returned no labels", self.classification_model))
        })?;
        tracing::debug!(raw = %top.label, score = top.score, "Classifier output");
        Ok(map_classifier_label(&top.label))
    }

    async fn translate(&self, text: &str) -> Result<String> {
        let body = json!({ "inputs": text });
        let response: Vec<Translation> = self
            .client
            .post(&Self::model_path(&self.translation_model), &body)
            .await?;

        response
            .into_iter()
            .next()
            .map(|t| t.translation_text)
            .ok_or_else(|| {
                CoreError::Backend(format!("{} returned no translation", self.translation_model))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("LABEL_0", "world")]
    #[case("label_1", "sports")]
    #[case("LABEL_2", "business")]
    #[case("label_3", "sci/tech")]
    #[case(" World ", "world")]
    #[case("LABEL_9", "label_9")]
    fn test_map_classifier_label(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(map_classifier_label(raw), expected);
    }

    #[rstest]
    #[case("LABEL_2", Some(Label::Business))]
    #[case(" World ", Some(Label::World))]
    #[case("Sci/Tech", Some(Label::SciTech))]
    #[case("LABEL_9", None)]
    #[case("politics", None)]
    fn test_only_unmapped_labels_fall_outside_the_map(
        #[case] raw: &str,
        #[case] expected: Option<Label>,
    ) {
        assert_eq!(canonical_label(raw), expected);
    }

    #[test]
    fn test_classification_response_shapes() {
        let nested: ClassificationResponse = serde_json::from_str(
            r#"[[{"label":"LABEL_1","score":0.2},{"label":"LABEL_2","score":0.7}]]"#,
        )
        .unwrap();
        assert_eq!(nested.top_label().unwrap().label, "LABEL_2");

        let flat: ClassificationResponse =
            serde_json::from_str(r#"[{"label":"LABEL_3","score":0.9}]"#).unwrap();
        assert_eq!(flat.top_label().unwrap().label, "LABEL_3");

        let empty: ClassificationResponse = serde_json::from_str("[]").unwrap();
        assert!(empty.top_label().is_none());
    }

    #[test]
    fn test_question_payload() {
        let inputs = QuestionInputs {
            question: "What is Python?",
            context: "Python is a language.",
        };
        let body = json!({ "inputs": inputs });
        assert_eq!(body["inputs"]["question"], "What is Python?");
        assert_eq!(body["inputs"]["context"], "Python is a language.");
    }
}
