use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use chunkwise_core::config::OllamaConfig;

use super::traits::{Embedder, EmbeddingError};

/// Embedder backed by a local Ollama instance.
pub struct OllamaEmbedder {
    client: Client,
    url: String,
    model: String,
    dimensions: usize,
}

impl OllamaEmbedder {
    pub fn new(url: String, model: String, dimensions: usize) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "ollama client build failed, using defaults without timeout");
                    Client::new()
                }),
            url: url.trim_end_matches('/').to_string(),
            model,
            dimensions,
        }
    }

    pub fn from_config(config: &OllamaConfig, dimensions: usize) -> Self {
        Self::new(config.url.clone(), config.embedding_model.clone(), dimensions)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let request = OllamaEmbedRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(format!("{}/api/embed", self.url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api(format!("{status}: {body}")));
        }

        let parsed: OllamaEmbedResponse = response.json().await?;
        Ok(parsed.embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn provider(&self) -> &str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_shape() {
        let input = ["one", "two"];
        let body = serde_json::to_value(OllamaEmbedRequest {
            model: "nomic-embed-text",
            input: &input,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"model": "nomic-embed-text", "input": ["one", "two"]})
        );
    }

    #[test]
    fn response_parses() {
        let parsed: OllamaEmbedResponse =
            serde_json::from_str(r#"{"model":"m","embeddings":[[0.1,0.2],[0.3,0.4]]}"#).unwrap();
        assert_eq!(parsed.embeddings.len(), 2);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let e = OllamaEmbedder::new("http://localhost:11434/".into(), "m".into(), 8);
        assert_eq!(e.url, "http://localhost:11434");
        assert_eq!(e.model(), "m");
    }
}
