//! Command handlers for the shopqa CLI.

pub mod chat;
pub mod ingest;

// Re-export command types for convenience
pub use chat::ChatCommand;
pub use ingest::IngestCommand;
