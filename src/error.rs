//! Error types for the chat summarizer
//!
//! This module defines all error types used throughout the plugin,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for chat summarizer operations
///
/// Covers configuration loading, settings persistence, panel activation,
/// provider calls and summarize runs.
#[derive(Error, Debug)]
pub enum SummarizerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (generation calls, HTTP status, parsing)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Settings slot could not be read or written
    #[error("Settings error: {0}")]
    Settings(String),

    /// The settings fragment could not be loaded or inserted
    #[error("Fragment error: {0}")]
    Fragment(String),

    /// A control id the plugin binds to is absent from the fragment
    #[error("Missing control in settings fragment: #{0}")]
    MissingControl(String),

    /// Unknown settings field name
    #[error("Unknown settings field: {0}")]
    UnknownField(String),

    /// A value could not be converted to the field's type
    #[error("Invalid value for {field}: {value}")]
    InvalidValue {
        /// Field that was being set
        field: String,
        /// Raw value supplied by the caller
        value: String,
    },

    /// A summarize run is already in flight
    #[error("A summarize run is already in progress")]
    AlreadyRunning,

    /// Chat transcript could not be loaded
    #[error("Chat load error: {0}")]
    ChatLoad(String),

    /// Settings database errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for chat summarizer operations
///
/// Uses `anyhow::Error` so callers can attach context while propagating.
pub type Result<T> = anyhow::Result<T>;
