//! Chat context accessor
//!
//! The host owns the conversation; the plugin only reads message text in
//! order. `JsonlChatContext` reads a host chat export so the plugin can run
//! outside the host.

use crate::error::{Result, SummarizerError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One message of the host conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Display name of the speaker
    #[serde(default)]
    pub name: String,
    /// Whether the user wrote this message
    #[serde(default)]
    pub is_user: bool,
    /// Whether this is a system/narrator message
    #[serde(default)]
    pub is_system: bool,
    /// Message text
    #[serde(rename = "mes", default)]
    pub text: String,
}

impl ChatMessage {
    /// Create a message with only text set
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            is_user: false,
            is_system: false,
            text: text.into(),
        }
    }

    /// Create a message with a speaker name
    pub fn from_speaker(name: impl Into<String>, is_user: bool, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_user,
            is_system: false,
            text: text.into(),
        }
    }
}

/// Accessor for the active conversation
pub trait ChatContext: Send + Sync {
    /// Messages of the active chat, in conversation order
    fn chat(&self) -> Vec<ChatMessage>;

    /// Whether a chat is currently selected in the host
    fn is_chat_selected(&self) -> bool;

    /// Last message of the active chat, if any
    fn last_message(&self) -> Option<ChatMessage> {
        self.chat().pop()
    }
}

/// Chat held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticChatContext {
    messages: Vec<ChatMessage>,
    selected: bool,
}

impl StaticChatContext {
    /// Selected chat with the given messages
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            selected: true,
        }
    }

    /// No chat selected
    pub fn unselected() -> Self {
        Self::default()
    }
}

impl ChatContext for StaticChatContext {
    fn chat(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }

    fn is_chat_selected(&self) -> bool {
        self.selected
    }
}

/// Chat read from a JSON Lines export
///
/// Each line is one JSON object. Lines carrying a `mes` field are messages;
/// other lines (the export header with chat metadata) are skipped.
#[derive(Debug, Clone)]
pub struct JsonlChatContext {
    inner: StaticChatContext,
}

impl JsonlChatContext {
    /// Read and parse a chat export
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or a line is not valid JSON
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            SummarizerError::ChatLoad(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let context = Self::parse(&contents)?;
        tracing::info!(
            "Loaded {} chat messages from {}",
            context.inner.messages.len(),
            path.display()
        );
        Ok(context)
    }

    /// Parse export contents
    ///
    /// # Examples
    ///
    /// ```
    /// use chat_summarizer::host::{ChatContext, JsonlChatContext};
    ///
    /// let export = r#"{"user_name":"You","character_name":"Ava"}
    /// {"name":"You","is_user":true,"mes":"Hi"}
    /// {"name":"Ava","is_user":false,"mes":"Hello!"}"#;
    /// let context = JsonlChatContext::parse(export).unwrap();
    /// assert_eq!(context.chat().len(), 2);
    /// ```
    pub fn parse(contents: &str) -> Result<Self> {
        let mut messages = Vec::new();

        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let value: serde_json::Value = serde_json::from_str(line).map_err(|e| {
                SummarizerError::ChatLoad(format!("line {}: invalid JSON: {}", index + 1, e))
            })?;

            if value.get("mes").is_none() {
                tracing::debug!("Skipping chat line {} without message text", index + 1);
                continue;
            }

            let message: ChatMessage = serde_json::from_value(value).map_err(|e| {
                SummarizerError::ChatLoad(format!("line {}: invalid message: {}", index + 1, e))
            })?;
            messages.push(message);
        }

        Ok(Self {
            inner: StaticChatContext::new(messages),
        })
    }
}

impl ChatContext for JsonlChatContext {
    fn chat(&self) -> Vec<ChatMessage> {
        self.inner.chat()
    }

    fn is_chat_selected(&self) -> bool {
        self.inner.is_chat_selected()
    }
}
