//! Base provider trait and common types
//!
//! This module defines the Provider trait that text-generation backends
//! implement, along with the message and response types they exchange.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message sent to or received from a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (user, assistant, system)
    pub role: String,
    /// Content of the message
    #[serde(default)]
    pub content: String,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use chat_summarizer::providers::Message;
    ///
    /// let msg = Message::user("Summarize this");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// Token usage information from a completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use chat_summarizer::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Options for a single generation call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Override of the response length in tokens; `None` keeps the
    /// provider's default
    pub response_length: Option<u32>,
}

/// Completion response with message and optional token usage
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// The response message
    pub message: Message,
    /// Optional token usage information
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Create a new CompletionResponse
    pub fn new(message: Message) -> Self {
        Self {
            message,
            usage: None,
        }
    }

    /// Create a new CompletionResponse with token usage
    pub fn with_usage(message: Message, usage: TokenUsage) -> Self {
        Self {
            message,
            usage: Some(usage),
        }
    }

    /// Text of the response message
    pub fn text(&self) -> &str {
        &self.message.content
    }
}

/// Provider trait for text generation
///
/// The summarizer treats providers as black boxes: it sends a prompt and
/// reads back text.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use chat_summarizer::error::Result;
/// use chat_summarizer::providers::{
///     CompletionResponse, GenerationOptions, Message, Provider,
/// };
///
/// struct Echo;
///
/// #[async_trait]
/// impl Provider for Echo {
///     async fn complete(
///         &self,
///         messages: &[Message],
///         _options: GenerationOptions,
///     ) -> Result<CompletionResponse> {
///         let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
///         Ok(CompletionResponse::new(Message::assistant(last)))
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Complete a conversation
    ///
    /// # Errors
    ///
    /// Returns error if the provider call fails
    async fn complete(
        &self,
        messages: &[Message],
        options: GenerationOptions,
    ) -> Result<CompletionResponse>;

    /// Name of the model currently in use
    ///
    /// The default implementation returns an error indicating that the
    /// provider does not report its model.
    fn get_current_model(&self) -> Result<String> {
        Err(crate::error::SummarizerError::Provider(
            "Provider does not report its current model".to_string(),
        )
        .into())
    }

    /// Generate text for a single prompt
    ///
    /// Sends `prompt` as one user message and returns the response text.
    async fn generate(&self, prompt: &str, options: GenerationOptions) -> Result<String> {
        let response = self.complete(&[Message::user(prompt)], options).await?;
        if let Some(usage) = response.usage {
            tracing::debug!(
                "Generation used {} prompt and {} completion tokens",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }
        Ok(response.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LastMessageProvider;

    #[async_trait]
    impl Provider for LastMessageProvider {
        async fn complete(
            &self,
            messages: &[Message],
            options: GenerationOptions,
        ) -> Result<CompletionResponse> {
            let content = messages
                .last()
                .map(|m| format!("{}|{:?}", m.content, options.response_length))
                .unwrap_or_default();
            Ok(CompletionResponse::with_usage(
                Message::assistant(content),
                TokenUsage::new(3, 4),
            ))
        }
    }

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::user("a").role, "user");
        assert_eq!(Message::assistant("b").role, "assistant");
        assert_eq!(Message::system("c").role, "system");
        assert_eq!(Message::user("a").content, "a");
    }

    #[test]
    fn test_message_serialization() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }

    #[test]
    fn test_token_usage_new() {
        let usage = TokenUsage::new(100, 50);
        assert_eq!(usage.prompt_tokens, 100);
        assert_eq!(usage.completion_tokens, 50);
        assert_eq!(usage.total_tokens, 150);
    }

    #[test]
    fn test_completion_response_text() {
        let response = CompletionResponse::new(Message::assistant("done"));
        assert_eq!(response.text(), "done");
        assert!(response.usage.is_none());
    }

    #[tokio::test]
    async fn test_generate_sends_single_user_message() {
        let provider = LastMessageProvider;
        let text = provider
            .generate(
                "prompt",
                GenerationOptions {
                    response_length: Some(64),
                },
            )
            .await
            .unwrap();
        assert_eq!(text, "prompt|Some(64)");
    }

    #[test]
    fn test_default_get_current_model_error() {
        assert!(LastMessageProvider.get_current_model().is_err());
    }
}
