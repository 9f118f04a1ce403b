//! Vector index capability trait.
//!
//! The chat pipeline depends only on this seam: index a sequence of
//! documents, then answer top-k similarity queries over them.

use crate::document::ReviewDocument;
use shopqa_core::AppResult;

/// Trait for vector index backends.
#[async_trait::async_trait]
pub trait VectorIndex: Send + Sync {
    /// Embed and store a sequence of documents, preserving their order.
    ///
    /// Returns the number of documents stored.
    async fn index(&self, documents: &[ReviewDocument]) -> AppResult<usize>;

    /// Return the `k` most relevant documents for a query string,
    /// most relevant first.
    async fn search(&self, query: &str, k: usize) -> AppResult<Vec<ReviewDocument>>;

    /// Number of documents currently stored.
    async fn count(&self) -> AppResult<usize>;

    /// Remove all stored documents.
    async fn reset(&self) -> AppResult<()>;
}
