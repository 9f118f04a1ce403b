//! Ingest command handler.
//!
//! Converts a review CSV into documents and indexes them for retrieval.

use clap::Args;
use shopqa_core::{config::AppConfig, AppResult};
use shopqa_retrieval::{create_provider, ReviewConverter, SqliteIndex, VectorIndex};
use std::path::PathBuf;

/// Convert a review CSV and index it for retrieval
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Path to the review CSV (columns: product_title, rating, review)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Reset the index before ingesting
    #[arg(long)]
    pub reset: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestCommand {
    /// Execute the ingest command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ingest command for {:?}", self.data);

        let documents = ReviewConverter::new(&self.data).convert()?;

        let embedder = create_provider(
            &config.embedding_provider,
            &config.embedding_model,
            None,
        )?;
        let index = SqliteIndex::open(&config.index_path, embedder)?;

        if self.reset {
            index.reset().await?;
        }

        let indexed = index.index(&documents).await?;
        let total = index.count().await?;

        if self.json {
            let output = serde_json::json!({
                "data": self.data,
                "indexed": indexed,
                "total": total,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!(
                "Indexed {} review(s) from {:?} ({} total in {:?})",
                indexed, self.data, total, config.index_path
            );
        }

        Ok(())
    }
}
