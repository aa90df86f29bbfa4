//! chat-summarizer - chat extension plugin library
//!
//! This library provides a plugin that attaches to a chat application's
//! extension settings panel, persists a few settings, and summarizes the
//! active conversation in fixed-size chunks through a text-generation
//! provider.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `settings`: Settings record, persistence backends and the store adapter
//! - `ui`: Settings fragment, host panel model and event binding
//! - `summarizer`: Chunking and the sequential summarize run
//! - `host`: Chat accessor and notification seams
//! - `providers`: Text-generation provider abstraction (Ollama)
//! - `plugin`: The plugin instance tying everything together
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use chat_summarizer::{ChatSummarizer, Config};
//! use chat_summarizer::host::{ChatMessage, LogNotifier};
//! use chat_summarizer::providers::create_provider;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml")?;
//!     config.validate()?;
//!
//!     let provider = Arc::from(create_provider(&config.provider)?);
//!     let summarizer = ChatSummarizer::new(provider, Arc::new(LogNotifier));
//!     let chat = vec![ChatMessage::new("Hi"), ChatMessage::new("Hello!")];
//!     let report = summarizer.summarize(&chat, 20, "Summarize:").await?;
//!     println!("{}", report.summary.unwrap_or_default());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod plugin;
pub mod providers;
pub mod settings;
pub mod summarizer;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, SummarizerError};
pub use plugin::SummarizerPlugin;
pub use settings::{SettingsField, SettingsRecord, SettingsStore};
pub use summarizer::{ChatSummarizer, ChunkOutcome, SummaryReport};
