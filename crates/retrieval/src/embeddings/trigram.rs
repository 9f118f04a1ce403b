//! Deterministic offline embedding provider.
//!
//! Hashes character trigrams into a fixed-dimension vector. Not semantically
//! accurate like a neural model, but deterministic and content-dependent,
//! which is enough for development and tests without a model server.

use crate::embeddings::EmbeddingProvider;
use shopqa_core::AppResult;

/// Default vector dimension for trigram embeddings.
const DEFAULT_DIMENSIONS: usize = 256;

/// Offline hashed-trigram embedding provider.
#[derive(Debug)]
pub struct TrigramEmbedder {
    dimensions: usize,
}

impl TrigramEmbedder {
    /// Create a trigram embedder with a custom dimension.
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Embed one text as a unit-normalized bag of hashed trigrams.
    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        let chars: Vec<char> = text
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect();

        for window in chars.windows(3) {
            let mut hash = 0u64;
            for &c in window {
                hash = hash.wrapping_mul(131).wrapping_add(c as u64);
            }
            vector[(hash % self.dimensions as u64) as usize] += 1.0;
        }

        // Unit-normalize so cosine similarity reduces to a dot product
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }
}

impl Default for TrigramEmbedder {
    fn default() -> Self {
        Self::with_dimensions(DEFAULT_DIMENSIONS)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramEmbedder {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dimensions_and_names() {
        let embedder = TrigramEmbedder::default();
        assert_eq!(embedder.dimensions(), DEFAULT_DIMENSIONS);
        assert_eq!(embedder.provider_name(), "trigram");
        assert_eq!(embedder.model_name(), "trigram-v1");
    }

    #[tokio::test]
    async fn test_embedding_is_unit_normalized() {
        let embedder = TrigramEmbedder::default();
        let embedding = embedder.embed("great battery life").await.unwrap();

        assert_eq!(embedding.len(), DEFAULT_DIMENSIONS);
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_deterministic() {
        let embedder = TrigramEmbedder::default();
        let a = embedder.embed("same review text").await.unwrap();
        let b = embedder.embed("same review text").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_different_texts_differ() {
        let embedder = TrigramEmbedder::default();
        let a = embedder.embed("excellent sound quality").await.unwrap();
        let b = embedder.embed("poor build quality").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let embedder = TrigramEmbedder::default();
        let embedding = embedder.embed("").await.unwrap();
        assert!(embedding.iter().all(|&x| x == 0.0));
    }

    #[tokio::test]
    async fn test_batch_matches_single() {
        let embedder = TrigramEmbedder::default();
        let texts = vec!["one".to_string(), "two".to_string()];
        let batch = embedder.embed_batch(&texts).await.unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], embedder.embed("one").await.unwrap());
        assert_eq!(batch[1], embedder.embed("two").await.unwrap());
    }
}
