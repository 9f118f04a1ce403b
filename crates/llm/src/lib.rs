//! LLM integration crate for shopqa.
//!
//! Provides a provider-agnostic abstraction for chat models: a sequence of
//! role-tagged messages in, a generated message out. Providers are selected
//! by name through a small factory.
//!
//! # Providers
//! - **Groq**: hosted OpenAI-compatible chat completions (default)
//! - **Ollama**: local LLM runtime
//!
//! # Example
//! ```no_run
//! use shopqa_llm::{ChatMessage, ChatRequest, ChatModel, providers::GroqClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GroqClient::new("sk-key");
//! let request = ChatRequest::new("llama-3.1-8b-instant")
//!     .with_message(ChatMessage::human("Hello!"));
//! let response = client.chat(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{ChatMessage, ChatModel, ChatRequest, ChatResponse, ChatUsage, Role};
pub use factory::create_model;
pub use providers::{GroqClient, OllamaClient};
