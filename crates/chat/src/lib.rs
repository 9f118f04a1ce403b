//! Chat pipeline crate for shopqa.
//!
//! Assembles the review-grounded question-answering pipeline: a session
//! store for conversational memory, the fixed prompts, and the
//! rewrite → retrieve → generate chain.

pub mod chain;
pub mod history;
pub mod prompts;

// Re-export main types
pub use chain::{ChatInput, ChatOutput, RagChain, RagChainBuilder};
pub use history::SessionStore;
pub use prompts::FALLBACK_ANSWER;
