//! SQLite-backed vector index.
//!
//! Documents are embedded through an `EmbeddingProvider` and stored with
//! their vectors as little-endian f32 BLOBs. Queries embed the query string
//! and rank every stored vector by cosine similarity in process.

use crate::document::ReviewDocument;
use crate::embeddings::EmbeddingProvider;
use crate::vector_index::VectorIndex;
use rusqlite::{params, Connection};
use shopqa_core::{AppError, AppResult};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Embedding-backed SQLite vector index.
pub struct SqliteIndex {
    conn: Mutex<Connection>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl SqliteIndex {
    /// Open (or create) an index at the given path.
    pub fn open(path: &Path, embedder: Arc<dyn EmbeddingProvider>) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Retrieval(format!("Failed to create index directory: {}", e))
                })?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| AppError::Retrieval(format!("Failed to open SQLite index: {}", e)))?;

        Self::init_schema(&conn)?;

        tracing::debug!("Opened SQLite index at {:?}", path);
        Ok(Self {
            conn: Mutex::new(conn),
            embedder,
        })
    }

    /// Create an in-memory index (tests, throwaway sessions).
    pub fn in_memory(embedder: Arc<dyn EmbeddingProvider>) -> AppResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Retrieval(format!("Failed to open in-memory index: {}", e)))?;

        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            embedder,
        })
    }

    fn init_schema(conn: &Connection) -> AppResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                position INTEGER PRIMARY KEY,
                content TEXT NOT NULL,
                metadata TEXT NOT NULL,
                embedding BLOB NOT NULL
            );
            "#,
        )
        .map_err(|e| AppError::Retrieval(format!("Failed to create tables: {}", e)))?;

        Ok(())
    }

    fn lock_conn(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Retrieval("Index connection lock poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl VectorIndex for SqliteIndex {
    async fn index(&self, documents: &[ReviewDocument]) -> AppResult<usize> {
        if documents.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let conn = self.lock_conn()?;

        let next_position: i64 = conn
            .query_row(
                "SELECT COALESCE(MAX(position) + 1, 0) FROM documents",
                [],
                |row| row.get(0),
            )
            .map_err(|e| AppError::Retrieval(format!("Failed to read index size: {}", e)))?;

        for (offset, (document, embedding)) in documents.iter().zip(&embeddings).enumerate() {
            let metadata_json = serde_json::to_string(&document.metadata)
                .map_err(|e| AppError::Retrieval(format!("Failed to serialize metadata: {}", e)))?;

            conn.execute(
                "INSERT INTO documents (position, content, metadata, embedding)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    next_position + offset as i64,
                    document.content,
                    metadata_json,
                    embedding_to_bytes(embedding),
                ],
            )
            .map_err(|e| AppError::Retrieval(format!("Failed to insert document: {}", e)))?;
        }

        tracing::info!("Indexed {} documents", documents.len());
        Ok(documents.len())
    }

    async fn search(&self, query: &str, k: usize) -> AppResult<Vec<ReviewDocument>> {
        let query_embedding = self.embedder.embed(query).await?;

        let conn = self.lock_conn()?;

        let mut stmt = conn
            .prepare("SELECT content, metadata, embedding FROM documents ORDER BY position")
            .map_err(|e| AppError::Retrieval(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                let content: String = row.get(0)?;
                let metadata_json: String = row.get(1)?;
                let embedding_bytes: Vec<u8> = row.get(2)?;
                Ok((content, metadata_json, embedding_bytes))
            })
            .map_err(|e| AppError::Retrieval(format!("Failed to query documents: {}", e)))?;

        let mut scored: Vec<(ReviewDocument, f32)> = Vec::new();
        for row in rows {
            let (content, metadata_json, embedding_bytes) =
                row.map_err(|e| AppError::Retrieval(format!("Failed to read row: {}", e)))?;

            let metadata: HashMap<String, String> = serde_json::from_str(&metadata_json)
                .map_err(|e| {
                    AppError::Retrieval(format!("Failed to deserialize metadata: {}", e))
                })?;

            let embedding = bytes_to_embedding(&embedding_bytes)?;
            let score = cosine_similarity(&query_embedding, &embedding);
            scored.push((ReviewDocument::new(content, metadata), score));
        }

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        tracing::debug!("Retrieved {} documents (requested top-{})", scored.len(), k);

        Ok(scored.into_iter().map(|(doc, _)| doc).collect())
    }

    async fn count(&self) -> AppResult<usize> {
        let conn = self.lock_conn()?;

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))
            .map_err(|e| AppError::Retrieval(format!("Failed to count documents: {}", e)))?;

        Ok(count as usize)
    }

    async fn reset(&self) -> AppResult<()> {
        let conn = self.lock_conn()?;

        conn.execute("DELETE FROM documents", [])
            .map_err(|e| AppError::Retrieval(format!("Failed to delete documents: {}", e)))?;

        tracing::info!("Reset vector index");
        Ok(())
    }
}

/// Convert an embedding vector to little-endian bytes for storage.
fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for &value in embedding {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Convert stored bytes back to an embedding vector.
fn bytes_to_embedding(bytes: &[u8]) -> AppResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(AppError::Retrieval(
            "Invalid embedding bytes length".to_string(),
        ));
    }

    let mut embedding = Vec::with_capacity(bytes.len() / 4);
    for chunk in bytes.chunks_exact(4) {
        embedding.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    Ok(embedding)
}

/// Cosine similarity between two vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PRODUCT_NAME_KEY;
    use crate::embeddings::TrigramEmbedder;
    use tempfile::TempDir;

    fn doc(title: &str, review: &str, rating: &str) -> ReviewDocument {
        let mut metadata = HashMap::new();
        metadata.insert(PRODUCT_NAME_KEY.to_string(), title.to_string());
        ReviewDocument::new(format!("Review: {}\nRating: {}", review, rating), metadata)
    }

    fn test_index() -> SqliteIndex {
        SqliteIndex::in_memory(Arc::new(TrigramEmbedder::default())).unwrap()
    }

    #[tokio::test]
    async fn test_index_and_count() {
        let index = test_index();

        let stored = index
            .index(&[doc("Widget", "Great", "5"), doc("Gadget", "Okay", "3")])
            .await
            .unwrap();

        assert_eq!(stored, 2);
        assert_eq!(index.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_search_returns_most_similar_first() {
        let index = test_index();

        index
            .index(&[
                doc("Earbuds", "amazing battery life lasts all day", "5"),
                doc("Blender", "crushes ice quickly and quietly", "4"),
                doc("Charger", "battery charges very fast", "4"),
            ])
            .await
            .unwrap();

        let results = index.search("how is the battery life?", 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert!(results[0].content.contains("battery"));
    }

    #[tokio::test]
    async fn test_search_empty_index() {
        let index = test_index();
        let results = index.search("anything", 3).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_search_preserves_metadata() {
        let index = test_index();
        index.index(&[doc("Widget", "Great", "5")]).await.unwrap();

        let results = index.search("Great", 1).await.unwrap();
        assert_eq!(results[0].product_name(), Some("Widget"));
    }

    #[tokio::test]
    async fn test_reset() {
        let index = test_index();
        index.index(&[doc("Widget", "Great", "5")]).await.unwrap();

        index.reset().await.unwrap();
        assert_eq!(index.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_persistence_across_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.db");
        let embedder: Arc<dyn crate::embeddings::EmbeddingProvider> =
            Arc::new(TrigramEmbedder::default());

        {
            let index = SqliteIndex::open(&path, Arc::clone(&embedder)).unwrap();
            index.index(&[doc("Widget", "Great", "5")]).await.unwrap();
        }

        let reopened = SqliteIndex::open(&path, embedder).unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);
    }

    #[test]
    fn test_embedding_bytes_round_trip() {
        let embedding = vec![0.25f32, -1.5, 3.75];
        let bytes = embedding_to_bytes(&embedding);
        assert_eq!(bytes_to_embedding(&bytes).unwrap(), embedding);

        assert!(bytes_to_embedding(&[0u8, 1, 2]).is_err());
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &[1.0, 0.0, 0.0]) - 1.0).abs() < 0.001);
        assert!((cosine_similarity(&a, &[0.0, 1.0, 0.0])).abs() < 0.001);
        assert_eq!(cosine_similarity(&a, &[]), 0.0);
    }
}
