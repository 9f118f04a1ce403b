//! Retrievable document type.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata key carrying the source product title.
pub const PRODUCT_NAME_KEY: &str = "product_name";

/// A retrievable text unit: formatted review content plus metadata.
///
/// This is the atomic item stored in and returned by the vector index, and
/// the grounding context handed to the answer-generation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDocument {
    /// Formatted review text (review body plus rating)
    pub content: String,

    /// Attached metadata (`product_name` → source product title)
    pub metadata: HashMap<String, String>,
}

impl ReviewDocument {
    /// Create a document from content and metadata.
    pub fn new(content: impl Into<String>, metadata: HashMap<String, String>) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }

    /// Get the product name from metadata, if present.
    pub fn product_name(&self) -> Option<&str> {
        self.metadata.get(PRODUCT_NAME_KEY).map(String::as_str)
    }
}
