//! Review-grounded question-answering pipeline.
//!
//! A fixed three-stage sequential flow: rewrite the question as standalone
//! given the session's history, retrieve the top-k review documents, then
//! generate a grounded answer. History is read before the first stage and
//! appended only after the whole invocation succeeds.

use crate::history::SessionStore;
use crate::prompts::{answer_system_prompt, build_context, FALLBACK_ANSWER, REWRITE_SYSTEM_PROMPT};
use serde::{Deserialize, Serialize};
use shopqa_core::config::{DEFAULT_TEMPERATURE, DEFAULT_TOP_K};
use shopqa_core::AppResult;
use shopqa_llm::{ChatMessage, ChatModel, ChatRequest};
use shopqa_retrieval::{ReviewDocument, VectorIndex};
use std::sync::Arc;

/// One pipeline invocation: the user input plus the session it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatInput {
    pub input: String,
    pub session_id: String,
}

/// Pipeline result: the generated answer and the retrieved grounding
/// context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOutput {
    pub answer: String,
    pub context: Vec<ReviewDocument>,
}

/// Builder for the question-answering pipeline.
///
/// Holds the externally constructed vector index, the chat model and its
/// sampling configuration, and the process-lifetime session store shared by
/// every chain it builds.
pub struct RagChainBuilder {
    index: Arc<dyn VectorIndex>,
    model: Arc<dyn ChatModel>,
    model_id: String,
    temperature: f32,
    top_k: usize,
    sessions: Arc<SessionStore>,
}

impl RagChainBuilder {
    /// Create a builder with the default temperature (0.5) and retrieval
    /// depth (3).
    pub fn new(
        index: Arc<dyn VectorIndex>,
        model: Arc<dyn ChatModel>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            index,
            model,
            model_id: model_id.into(),
            temperature: DEFAULT_TEMPERATURE,
            top_k: DEFAULT_TOP_K,
            sessions: Arc::new(SessionStore::new()),
        }
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Override the retrieval depth.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Assemble the pipeline. Chains built from the same builder share the
    /// session store.
    pub fn build_chain(&self) -> RagChain {
        RagChain {
            index: Arc::clone(&self.index),
            model: Arc::clone(&self.model),
            model_id: self.model_id.clone(),
            temperature: self.temperature,
            top_k: self.top_k,
            sessions: Arc::clone(&self.sessions),
        }
    }
}

/// The composed pipeline. Stateless per invocation; all mutable state lives
/// in the session store.
pub struct RagChain {
    index: Arc<dyn VectorIndex>,
    model: Arc<dyn ChatModel>,
    model_id: String,
    temperature: f32,
    top_k: usize,
    sessions: Arc<SessionStore>,
}

impl RagChain {
    /// Run rewrite → retrieve → generate for one input, scoped to a session.
    ///
    /// On success the session gains one human and one assistant turn, in
    /// that order. Any stage failure propagates and leaves the history
    /// untouched.
    pub async fn invoke(&self, request: ChatInput) -> AppResult<ChatOutput> {
        tracing::info!(session = %request.session_id, "Pipeline invocation");

        let history = self.sessions.history(&request.session_id)?;

        let standalone = self.rewrite(&history, &request.input).await?;
        tracing::debug!(query = %standalone, "Standalone question");

        let context = self.index.search(&standalone, self.top_k).await?;
        tracing::debug!("Retrieved {} documents", context.len());

        let answer = if context.is_empty() {
            // Nothing to ground on: the documented fallback is the answer,
            // no generation call
            FALLBACK_ANSWER.to_string()
        } else {
            self.generate(&history, &context, &request.input).await?
        };

        self.sessions
            .append_exchange(&request.session_id, &request.input, &answer)?;

        Ok(ChatOutput { answer, context })
    }

    /// Access the shared session store (inspection, eviction).
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Rewrite the input as a standalone question given prior turns.
    ///
    /// With no prior history the raw input already stands alone, so it is
    /// returned unchanged without a model call.
    async fn rewrite(&self, history: &[ChatMessage], input: &str) -> AppResult<String> {
        if history.is_empty() {
            return Ok(input.to_string());
        }

        let request = ChatRequest::new(&self.model_id)
            .with_message(ChatMessage::system(REWRITE_SYSTEM_PROMPT))
            .with_messages(history.iter().cloned())
            .with_message(ChatMessage::human(input))
            .with_temperature(self.temperature);

        let response = self.model.chat(&request).await?;
        Ok(response.content.trim().to_string())
    }

    /// Generate a grounded answer from the retrieved context.
    async fn generate(
        &self,
        history: &[ChatMessage],
        context: &[ReviewDocument],
        input: &str,
    ) -> AppResult<String> {
        let system = answer_system_prompt(&build_context(context));

        let request = ChatRequest::new(&self.model_id)
            .with_message(ChatMessage::system(system))
            .with_messages(history.iter().cloned())
            .with_message(ChatMessage::human(input))
            .with_temperature(self.temperature);

        let response = self.model.chat(&request).await?;
        Ok(response.content)
    }
}
