//! Retrieval crate for shopqa.
//!
//! Turns tabular product reviews into retrievable documents and serves them
//! back by semantic similarity:
//! - `ReviewConverter`: CSV rows → `ReviewDocument`s
//! - `EmbeddingProvider`: text → vector, with Ollama and offline backends
//! - `VectorIndex`: the two-operation capability the chat pipeline depends on
//! - `SqliteIndex`: embedding-backed implementation with cosine ranking

pub mod converter;
pub mod document;
pub mod embeddings;
pub mod index;
pub mod vector_index;

// Re-export main types
pub use converter::ReviewConverter;
pub use document::{ReviewDocument, PRODUCT_NAME_KEY};
pub use embeddings::{create_provider, EmbeddingProvider};
pub use index::SqliteIndex;
pub use vector_index::VectorIndex;
