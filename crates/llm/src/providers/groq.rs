//! Groq chat provider implementation.
//!
//! Groq exposes an OpenAI-compatible chat completions API:
//! https://console.groq.com/docs/api-reference#chat

use crate::client::{ChatMessage, ChatModel, ChatRequest, ChatResponse, ChatUsage};
use serde::{Deserialize, Serialize};
use shopqa_core::{AppError, AppResult};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// OpenAI-compatible chat completions request body.
#[derive(Debug, Serialize)]
struct GroqRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// OpenAI-compatible chat completions response body.
#[derive(Debug, Deserialize)]
struct GroqResponse {
    model: String,
    choices: Vec<GroqChoice>,
    #[serde(default)]
    usage: Option<GroqUsage>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqMessage,
}

#[derive(Debug, Deserialize)]
struct GroqMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct GroqUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Groq chat client.
pub struct GroqClient {
    /// Base URL for the OpenAI-compatible API
    base_url: String,

    /// Bearer token
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl GroqClient {
    /// Create a new Groq client against the hosted endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a new Groq client with a custom base URL.
    ///
    /// Useful for tests and for any other OpenAI-compatible server.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl ChatModel for GroqClient {
    fn provider_name(&self) -> &str {
        "groq"
    }

    async fn chat(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        tracing::info!("Sending chat request to Groq");
        tracing::debug!("Request: {:?}", request);

        let body = GroqRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to Groq: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Groq API error ({}): {}",
                status, error_text
            )));
        }

        let groq_response: GroqResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Groq response: {}", e)))?;

        let choice = groq_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Llm("Groq response contained no choices".to_string()))?;

        let usage = groq_response
            .usage
            .map(|u| ChatUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        tracing::info!("Received chat completion from Groq");

        Ok(ChatResponse {
            content: choice.message.content,
            model: groq_response.model,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groq_client_creation() {
        let client = GroqClient::new("sk-test");
        assert_eq!(client.provider_name(), "groq");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_request_body_wire_format() {
        let request = ChatRequest::new("llama-3.1-8b-instant")
            .with_message(ChatMessage::system("rewrite"))
            .with_message(ChatMessage::human("what about battery life?"))
            .with_temperature(0.5);

        let body = GroqRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "llama-3.1-8b-instant");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["temperature"], 0.5);
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn test_response_parsing() {
        let payload = r#"{
            "model": "llama-3.1-8b-instant",
            "choices": [{"message": {"role": "assistant", "content": "- Good battery"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }"#;

        let parsed: GroqResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.choices[0].message.content, "- Good battery");
        assert_eq!(parsed.usage.as_ref().unwrap().prompt_tokens, 10);
    }
}
