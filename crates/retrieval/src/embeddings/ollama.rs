//! Ollama embedding provider.
//!
//! Uses the Ollama embeddings API with models like nomic-embed-text:
//! https://github.com/ollama/ollama/blob/main/docs/api.md#generate-embeddings

use crate::embeddings::EmbeddingProvider;
use serde::{Deserialize, Serialize};
use shopqa_core::{AppError, AppResult};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Ollama embeddings API request format.
#[derive(Debug, Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Ollama embeddings API response format.
#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embedding: Vec<f32>,
}

/// Ollama embedding client.
#[derive(Debug)]
pub struct OllamaEmbedder {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder with default settings.
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_base_url(model, DEFAULT_BASE_URL)
    }

    /// Create a new Ollama embedder with a custom base URL.
    pub fn with_base_url(model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn embed_one(&self, text: &str) -> AppResult<Vec<f32>> {
        let body = OllamaEmbedRequest {
            model: &self.model,
            prompt: text,
        };

        let url = format!("{}/api/embeddings", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::Retrieval(format!("Failed to send embedding request: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Retrieval(format!(
                "Ollama embeddings API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: OllamaEmbedResponse = response.json().await.map_err(|e| {
            AppError::Retrieval(format!("Failed to parse embedding response: {}", e))
        })?;

        Ok(parsed.embedding)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        // nomic-embed-text default; other models may differ but the index
        // never depends on this ahead of the first embedding call
        768
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        tracing::info!(
            "Embedding {} texts via Ollama (model: {})",
            texts.len(),
            self.model
        );

        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_one(text).await?);
        }
        Ok(embeddings)
    }
}
