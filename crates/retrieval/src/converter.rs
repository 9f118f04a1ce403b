//! Tabular review conversion.
//!
//! Reads a delimited review file and emits one retrievable document per row.
//! The read is one-shot: the file is opened, fully parsed, and closed within
//! `convert`.

use crate::document::{ReviewDocument, PRODUCT_NAME_KEY};
use shopqa_core::{AppError, AppResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Required columns in the source table.
const REQUIRED_COLUMNS: [&str; 3] = ["product_title", "rating", "review"];

/// Converts a tabular review source into retrievable documents.
///
/// The source must carry `product_title`, `rating`, and `review` columns;
/// any other columns are ignored. Values are interpolated verbatim — empty
/// fields render as empty strings, with no filtering or sanitization.
pub struct ReviewConverter {
    path: PathBuf,
}

impl ReviewConverter {
    /// Create a converter for a review file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Convert every row into a document, preserving row order.
    ///
    /// # Errors
    /// Fails before emitting any document when the file is unreadable, the
    /// table cannot be parsed, or a required column is missing.
    pub fn convert(&self) -> AppResult<Vec<ReviewDocument>> {
        tracing::info!("Converting reviews from {:?}", self.path);

        let mut reader = csv::Reader::from_path(&self.path)
            .map_err(|e| AppError::Ingest(format!("Failed to open {:?}: {}", self.path, e)))?;

        let headers = reader
            .headers()
            .map_err(|e| AppError::Ingest(format!("Failed to read header row: {}", e)))?
            .clone();

        let columns = Self::resolve_columns(&headers)?;

        let mut documents = Vec::new();
        for record in reader.records() {
            let record =
                record.map_err(|e| AppError::Ingest(format!("Failed to parse row: {}", e)))?;

            let title = record.get(columns.product_title).unwrap_or_default();
            let rating = record.get(columns.rating).unwrap_or_default();
            let review = record.get(columns.review).unwrap_or_default();

            let mut metadata = HashMap::new();
            metadata.insert(PRODUCT_NAME_KEY.to_string(), title.to_string());

            documents.push(ReviewDocument::new(
                format!("Review: {}\nRating: {}", review, rating),
                metadata,
            ));
        }

        tracing::info!("Converted {} review rows", documents.len());
        Ok(documents)
    }

    /// Locate the required columns in the header record.
    fn resolve_columns(headers: &csv::StringRecord) -> AppResult<ColumnIndices> {
        let resolve = |name: &str| {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                AppError::Ingest(format!(
                    "Missing required column '{}' (need {})",
                    name,
                    REQUIRED_COLUMNS.join(", ")
                ))
            })
        };

        Ok(ColumnIndices {
            product_title: resolve("product_title")?,
            rating: resolve("rating")?,
            review: resolve("review")?,
        })
    }
}

struct ColumnIndices {
    product_title: usize,
    rating: usize,
    review: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_convert_sample_row() {
        let file = write_csv("product_title,rating,review\nWidget,5,Great\n");

        let docs = ReviewConverter::new(file.path()).convert().unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "Review: Great\nRating: 5");
        assert_eq!(docs[0].product_name(), Some("Widget"));
        assert_eq!(docs[0].metadata.len(), 1);
    }

    #[test]
    fn test_convert_preserves_row_order() {
        let file = write_csv(
            "product_title,rating,review\n\
             A,1,first\n\
             B,2,second\n\
             C,3,third\n",
        );

        let docs = ReviewConverter::new(file.path()).convert().unwrap();

        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].content, "Review: first\nRating: 1");
        assert_eq!(docs[1].content, "Review: second\nRating: 2");
        assert_eq!(docs[2].content, "Review: third\nRating: 3");
    }

    #[test]
    fn test_extra_columns_ignored() {
        let file = write_csv(
            "sku,product_title,price,rating,review\n\
             X1,Widget,9.99,4,Decent\n",
        );

        let docs = ReviewConverter::new(file.path()).convert().unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "Review: Decent\nRating: 4");
        assert_eq!(docs[0].product_name(), Some("Widget"));
    }

    #[test]
    fn test_empty_values_rendered_verbatim() {
        let file = write_csv("product_title,rating,review\nWidget,,\n");

        let docs = ReviewConverter::new(file.path()).convert().unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "Review: \nRating: ");
    }

    #[test]
    fn test_empty_table_yields_empty_vec() {
        let file = write_csv("product_title,rating,review\n");

        let docs = ReviewConverter::new(file.path()).convert().unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let file = write_csv("product_title,review\nWidget,Great\n");

        let result = ReviewConverter::new(file.path()).convert();
        match result {
            Err(AppError::Ingest(msg)) => assert!(msg.contains("rating")),
            other => panic!("Expected ingest error, got {:?}", other.map(|d| d.len())),
        }
    }

    #[test]
    fn test_unreadable_path_is_fatal() {
        let result = ReviewConverter::new("/nonexistent/reviews.csv").convert();
        assert!(matches!(result, Err(AppError::Ingest(_))));
    }
}
