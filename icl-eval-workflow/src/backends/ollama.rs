use async_trait::async_trait;
use icl_eval_core::{ChatModel, CoreError, Result, SemanticScorer, SemanticScores};
use serde::{Deserialize, Serialize};

use super::http::JsonClient;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// ICL generation through an Ollama server's `/api/chat` endpoint.
#[derive(Debug, Clone)]
pub struct OllamaChatModel {
    client: JsonClient,
}

impl OllamaChatModel {
    pub fn new(client: JsonClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatModel for OllamaChatModel {
    async fn generate(&self, model_id: &str, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: model_id,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        let response: ChatResponse = self.client.post("/api/chat", &request).await?;
        Ok(response.message.content.trim().to_string())
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f64>,
}

/// Semantic similarity from Ollama sentence embeddings.
///
/// Precision, recall and F1 all carry the cosine similarity of the two
/// embeddings, clamped to [0, 1]. The language tag is not used by the
/// embedding model.
#[derive(Debug, Clone)]
pub struct OllamaEmbeddingScorer {
    client: JsonClient,
    model: String,
}

impl OllamaEmbeddingScorer {
    pub fn new(client: JsonClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        let request = EmbeddingRequest {
            model: &self.model,
            prompt: text,
        };
        let response: EmbeddingResponse = self.client.post("/api/embeddings", &request).await?;
        Ok(response.embedding)
    }
}

/// Cosine similarity; zero when either vector has no magnitude.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(CoreError::Metric(format!(
            "Embedding dimensions differ: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a * norm_b))
}

#[async_trait]
impl SemanticScorer for OllamaEmbeddingScorer {
    async fn score(
        &self,
        predictions: &[String],
        references: &[String],
        lang: &str,
    ) -> Result<SemanticScores> {
        if predictions.len() != references.len() {
            return Err(CoreError::Validation(format!(
                "{} predictions for {} references",
                predictions.len(),
                references.len()
            )));
        }
        tracing::debug!(model = %self.model, lang, pairs = predictions.len(), "Scoring semantic similarity");

        let mut similarities = Vec::with_capacity(predictions.len());
        for (prediction, reference) in predictions.iter().zip(references) {
            let left = self.embed(prediction).await?;
            let right = self.embed(reference).await?;
            similarities.push(cosine_similarity(&left, &right)?.clamp(0.0, 1.0));
        }

        Ok(SemanticScores {
            precision: similarities.clone(),
            recall: similarities.clone(),
            f1: similarities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_shape() {
        let request = ChatRequest {
            model: "llama3",
            messages: vec![ChatMessage {
                role: "user",
                content: "Hi",
            }],
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "llama3",
                "messages": [{"role": "user", "content": "Hi"}],
                "stream": false
            })
        );
    }

    #[test]
    fn test_chat_response_parsing_ignores_extra_fields() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"model":"llama3","message":{"role":"assistant","content":"  Paris \n"},"done":true}"#,
        )
        .unwrap();
        assert_eq!(response.message.content.trim(), "Paris");
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap() - 1.0).abs() < 1e-12);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-12);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
        assert!(cosine_similarity(&[1.0], &[1.0, 2.0]).is_err());
    }
}
