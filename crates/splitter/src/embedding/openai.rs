use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use chunkwise_core::config::OpenAiConfig;

use super::traits::{Embedder, EmbeddingError};

/// OpenAI-compatible embedding backend.
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    dimensions: usize,
}

impl OpenAiEmbedder {
    pub fn new(api_key: String, model: String, base_url: Option<String>, dimensions: usize) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "openai client build failed, using defaults without timeout");
                    Client::new()
                }),
            api_key,
            model,
            base_url: base_url
                .unwrap_or_else(|| "https://api.openai.com".to_string())
                .trim_end_matches('/')
                .to_string(),
            dimensions,
        }
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &OpenAiConfig, dimensions: usize) -> Option<Self> {
        let key = config.api_key.clone()?;
        Some(Self::new(
            key,
            config.embedding_model.clone(),
            Some(config.base_url.clone()),
            dimensions,
        ))
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedItem>,
}

#[derive(Deserialize)]
struct EmbedItem {
    embedding: Vec<f32>,
    index: usize,
}

/// Restore input order; the API does not promise it.
fn into_ordered(mut resp: EmbedResponse) -> Vec<Vec<f32>> {
    resp.data.sort_by_key(|item| item.index);
    resp.data.into_iter().map(|item| item.embedding).collect()
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api(format!("{status}: {body}")));
        }

        let resp: EmbedResponse = response.json().await?;
        Ok(into_ordered(resp))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn provider(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_is_reordered_by_index() {
        let resp: EmbedResponse = serde_json::from_str(
            r#"{"data":[
                {"object":"embedding","index":1,"embedding":[2.0]},
                {"object":"embedding","index":0,"embedding":[1.0]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(into_ordered(resp), vec![vec![1.0], vec![2.0]]);
    }

    #[test]
    fn from_config_requires_key() {
        let mut config = OpenAiConfig {
            api_key: None,
            base_url: "https://example.test/".into(),
            embedding_model: "text-embedding-3-small".into(),
        };
        assert!(OpenAiEmbedder::from_config(&config, 1536).is_none());

        config.api_key = Some("sk-test".into());
        let embedder = OpenAiEmbedder::from_config(&config, 1536).unwrap();
        assert_eq!(embedder.base_url, "https://example.test");
        assert_eq!(embedder.dimensions(), 1536);
    }
}
