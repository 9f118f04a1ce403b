//! Embedding providers.
//!
//! An `EmbeddingProvider` maps text to a fixed-dimension vector. The index
//! uses it for both document ingestion and query embedding.

pub mod ollama;
pub mod trigram;

pub use ollama::OllamaEmbedder;
pub use trigram::TrigramEmbedder;

use shopqa_core::{AppError, AppResult};
use std::sync::Arc;

/// Trait for embedding providers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "ollama", "trigram")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a batch.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Retrieval("No embedding returned".to_string()))
    }
}

/// Create an embedding provider by name.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama", "trigram")
/// * `model` - Embedding model identifier (ignored by "trigram")
/// * `endpoint` - Optional custom endpoint (Ollama only)
pub fn create_provider(
    provider: &str,
    model: &str,
    endpoint: Option<&str>,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match provider.to_lowercase().as_str() {
        "trigram" => Ok(Arc::new(TrigramEmbedder::default())),
        "ollama" => {
            let embedder = match endpoint {
                Some(url) => OllamaEmbedder::with_base_url(model, url),
                None => OllamaEmbedder::new(model),
            };
            Ok(Arc::new(embedder))
        }
        _ => Err(AppError::Retrieval(format!(
            "Unknown embedding provider: '{}'. Supported providers: ollama, trigram",
            provider
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_trigram_provider() {
        let provider = create_provider("trigram", "trigram-v1", None).unwrap();
        assert_eq!(provider.provider_name(), "trigram");
        assert!(provider.dimensions() > 0);
    }

    #[test]
    fn test_create_ollama_provider() {
        let provider = create_provider("ollama", "nomic-embed-text", None).unwrap();
        assert_eq!(provider.provider_name(), "ollama");
        assert_eq!(provider.model_name(), "nomic-embed-text");
    }

    #[test]
    fn test_create_unknown_provider() {
        let result = create_provider("unknown", "m", None);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unknown embedding provider"));
    }
}
