//! Chat-completion provider boundary
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation with OpenAI-backed client

use async_trait::async_trait;
use openai::chat::{ChatCompletion, ChatCompletionMessage, ChatCompletionMessageRole};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

use crate::features::chat::{Role, Turn, TurnContent};

/// Outbound request timeout; past this the user has given up anyway.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

#[derive(Debug, Error)]
pub enum CompletionError {
    /// The completion endpoint reported an error.
    #[error("completion provider error: {0}")]
    Provider(String),
    #[error("completion request timed out after {}s", REQUEST_TIMEOUT.as_secs())]
    Timeout,
    /// The endpoint answered but returned no usable choice.
    #[error("completion response contained no content")]
    NoContent,
}

/// One outbound chat-completion request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u64,
    pub turns: Vec<Turn>,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<String, CompletionError>;
}

/// [`CompletionClient`] backed by the OpenAI chat-completions API.
///
/// The underlying crate reads its API key from the `OPENAI_KEY` environment
/// variable; the binary bridges that from config at startup.
pub struct OpenAiCompletion;

// Image turns travel as the bare URL in user content.
fn to_wire(turn: &Turn) -> ChatCompletionMessage {
    let role = match turn.role {
        Role::System => ChatCompletionMessageRole::System,
        Role::User => ChatCompletionMessageRole::User,
        Role::Assistant => ChatCompletionMessageRole::Assistant,
    };
    let content = match &turn.content {
        TurnContent::Text(text) => text.clone(),
        TurnContent::ImageUrl(url) => url.clone(),
    };
    ChatCompletionMessage {
        role,
        content: Some(content),
        name: None,
        function_call: None,
        tool_call_id: None,
        tool_calls: None,
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletion {
    async fn complete(&self, request: ChatRequest) -> Result<String, CompletionError> {
        let messages: Vec<ChatCompletionMessage> = request.turns.iter().map(to_wire).collect();

        let completion = timeout(
            REQUEST_TIMEOUT,
            ChatCompletion::builder(&request.model, messages)
                .temperature(request.temperature)
                .max_tokens(request.max_tokens)
                .create(),
        )
        .await
        .map_err(|_| CompletionError::Timeout)?
        .map_err(|e| CompletionError::Provider(e.to_string()))?;

        completion
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .map(|text| text.trim().to_string())
            .ok_or(CompletionError::NoContent)
    }
}
