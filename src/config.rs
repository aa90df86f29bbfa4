//! Configuration management for the chat summarizer
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files and environment variables.

use crate::error::{Result, SummarizerError};
use crate::settings::record::{default_chunk_size, default_prompt, default_word_count};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// Holds the provider used for generation, where the plugin lives inside the
/// host, how settings are persisted, and the defaults for new settings records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Plugin identity and panel placement
    #[serde(default)]
    pub plugin: PluginConfig,
    /// Settings persistence
    #[serde(default)]
    pub storage: StorageConfig,
    /// Defaults for a freshly created settings record
    #[serde(default)]
    pub summarizer: SummarizerDefaults,
}

/// Provider configuration
///
/// Specifies which text-generation provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
}

fn default_provider_type() -> String {
    "ollama".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            ollama: OllamaConfig::default(),
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// Plugin identity inside the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Key of this plugin's slot in the host settings map
    #[serde(default = "default_plugin_id")]
    pub id: String,

    /// Static HTML fragment inserted into the host settings panel
    #[serde(default = "default_fragment_path")]
    pub fragment_path: PathBuf,

    /// Element id of the host container that receives the fragment
    #[serde(default = "default_container_id")]
    pub container_id: String,
}

fn default_plugin_id() -> String {
    "chat-summarizer".to_string()
}

fn default_fragment_path() -> PathBuf {
    PathBuf::from("assets/settings.html")
}

fn default_container_id() -> String {
    "extensions_settings".to_string()
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            id: default_plugin_id(),
            fragment_path: default_fragment_path(),
            container_id: default_container_id(),
        }
    }
}

/// Settings persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database holding the settings map. Defaults to the platform
    /// data directory when unset.
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Quiet period before a changed record is written (milliseconds)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    1000
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Defaults applied to missing fields of the settings record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerDefaults {
    /// Prompt template; `{{words}}` is replaced by the word count
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Messages per window
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,

    /// Target words per window summary
    #[serde(default = "default_word_count")]
    pub word_count: u32,
}

impl Default for SummarizerDefaults {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            chunk_size: default_chunk_size(),
            word_count: default_word_count(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment overrides
    ///
    /// A missing file is not an error: defaults are used and environment
    /// overrides still apply.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file {} not found, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SummarizerError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        tracing::info!("Loaded configuration from {}", path);
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider) = std::env::var("CHAT_SUMMARIZER_PROVIDER") {
            self.provider.provider_type = provider;
        }

        if let Ok(host) = std::env::var("CHAT_SUMMARIZER_OLLAMA_HOST") {
            self.provider.ollama.host = host;
        }

        if let Ok(model) = std::env::var("CHAT_SUMMARIZER_OLLAMA_MODEL") {
            self.provider.ollama.model = model;
        }

        if let Ok(db) = std::env::var("CHAT_SUMMARIZER_DB") {
            self.storage.db_path = Some(PathBuf::from(db));
        }

        if let Ok(debounce) = std::env::var("CHAT_SUMMARIZER_DEBOUNCE_MS") {
            match debounce.parse::<u64>() {
                Ok(ms) => self.storage.debounce_ms = ms,
                Err(_) => tracing::warn!(
                    "Ignoring CHAT_SUMMARIZER_DEBOUNCE_MS={}: not a number",
                    debounce
                ),
            }
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the provider is empty or unknown, the plugin id is
    /// empty, or the default chunk size is zero
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(SummarizerError::Config("Provider type cannot be empty".to_string()).into());
        }

        let valid_providers = ["ollama"];
        if !valid_providers.contains(&self.provider.provider_type.as_str()) {
            return Err(SummarizerError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                valid_providers.join(", ")
            ))
            .into());
        }

        if self.plugin.id.trim().is_empty() {
            return Err(SummarizerError::Config("plugin.id cannot be empty".to_string()).into());
        }

        if self.summarizer.chunk_size == 0 {
            return Err(SummarizerError::Config(
                "summarizer.chunk_size must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
