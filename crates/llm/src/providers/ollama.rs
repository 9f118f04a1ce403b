//! Ollama chat provider implementation.
//!
//! Uses the Ollama chat API: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::client::{ChatMessage, ChatModel, ChatRequest, ChatResponse, ChatUsage};
use serde::{Deserialize, Serialize};
use shopqa_core::{AppError, AppResult};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Ollama chat API request format.
#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Ollama chat API response format.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    model: String,
    message: OllamaMessage,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}

/// Ollama chat client.
pub struct OllamaClient {
    /// Base URL for the Ollama API
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a new Ollama client with default settings.
    ///
    /// Default URL: http://localhost:11434
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a new Ollama client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ChatModel for OllamaClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn chat(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        tracing::info!("Sending chat request to Ollama");
        tracing::debug!("Request: {:?}", request);

        let options = if request.temperature.is_some() || request.max_tokens.is_some() {
            Some(OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            })
        } else {
            None
        };

        let body = OllamaChatRequest {
            model: &request.model,
            messages: &request.messages,
            options,
            stream: false,
        };

        let url = format!("{}/api/chat", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        let ollama_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Ollama response: {}", e)))?;

        let usage = ChatUsage::new(
            ollama_response.prompt_eval_count.unwrap_or(0),
            ollama_response.eval_count.unwrap_or(0),
        );

        tracing::info!("Received chat completion from Ollama");

        Ok(ChatResponse {
            content: ollama_response.message.content,
            model: ollama_response.model,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_client_creation() {
        let client = OllamaClient::new();
        assert_eq!(client.provider_name(), "ollama");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_options_omitted_without_sampling_params() {
        let request = ChatRequest::new("llama3.2").with_message(ChatMessage::human("hi"));

        let body = OllamaChatRequest {
            model: &request.model,
            messages: &request.messages,
            options: None,
            stream: false,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("options").is_none());
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_response_parsing() {
        let payload = r#"{
            "model": "llama3.2",
            "message": {"role": "assistant", "content": "1. Sturdy build"},
            "done": true,
            "prompt_eval_count": 20,
            "eval_count": 8
        }"#;

        let parsed: OllamaChatResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.message.content, "1. Sturdy build");
        assert_eq!(parsed.prompt_eval_count, Some(20));
    }
}
