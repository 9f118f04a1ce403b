//! Chat model provider factory.
//!
//! Maps a provider name to a concrete `ChatModel` implementation, resolving
//! endpoints and API keys along the way.

use crate::client::ChatModel;
use crate::providers::{GroqClient, OllamaClient};
use shopqa_core::{AppError, AppResult};
use std::sync::Arc;

/// Create a chat model client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("groq", "ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (required by Groq)
///
/// # Errors
/// Returns `AppError::Config` for unknown providers or missing credentials.
pub fn create_model(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn ChatModel>> {
    match provider.to_lowercase().as_str() {
        "groq" => {
            let api_key = api_key
                .ok_or_else(|| AppError::Config("Groq provider requires API key".to_string()))?;
            let client = match endpoint {
                Some(url) => GroqClient::with_base_url(api_key, url),
                None => GroqClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        "ollama" => {
            let client = match endpoint {
                Some(url) => OllamaClient::with_base_url(url),
                None => OllamaClient::new(),
            };
            Ok(Arc::new(client))
        }
        _ => Err(AppError::Config(format!("Unknown provider: {}", provider))),
    }
}
