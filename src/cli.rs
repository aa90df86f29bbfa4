//! Command-line interface definition for chat-summarizer
//!
//! Runs the plugin outside a host: the chat comes from a JSON Lines export,
//! notifications go to the terminal and settings live in the local settings
//! database.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// chat-summarizer - summarize a chat in fixed-size chunks
#[derive(Parser, Debug, Clone)]
#[command(name = "chat-summarizer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Summarize a chat export with the stored settings
    Summarize {
        /// Chat export (JSON Lines, one message per line)
        #[arg(long)]
        chat: PathBuf,

        /// Store a new messages-per-chunk value before summarizing
        #[arg(long)]
        chunk_size: Option<u32>,

        /// Store a new prompt template before summarizing
        #[arg(long)]
        prompt: Option<String>,

        /// Store a new target word count before summarizing
        #[arg(long)]
        words: Option<u32>,
    },

    /// Inspect or change the stored settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// Copy the last message of a chat export into the summary input
    LastMessage {
        /// Chat export (JSON Lines, one message per line)
        #[arg(long)]
        chat: PathBuf,
    },

    /// Show the summary input as a notification
    Echo,
}

/// Settings subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    /// Print the stored settings
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set one field (prompt, chunk_size, word_count, response_length,
    /// summary, summary_input)
    Set { field: String, value: String },

    /// Restore the default settings
    Reset,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_summarize_with_overrides() {
        let cli = Cli::try_parse_from([
            "chat-summarizer",
            "summarize",
            "--chat",
            "chat.jsonl",
            "--chunk-size",
            "5",
            "--words",
            "40",
        ])
        .unwrap();

        if let Commands::Summarize {
            chat,
            chunk_size,
            prompt,
            words,
        } = cli.command
        {
            assert_eq!(chat, PathBuf::from("chat.jsonl"));
            assert_eq!(chunk_size, Some(5));
            assert_eq!(prompt, None);
            assert_eq!(words, Some(40));
        } else {
            panic!("Expected Summarize command");
        }
    }

    #[test]
    fn test_cli_summarize_requires_chat() {
        assert!(Cli::try_parse_from(["chat-summarizer", "summarize"]).is_err());
    }

    #[test]
    fn test_cli_parse_settings_set() {
        let cli =
            Cli::try_parse_from(["chat-summarizer", "settings", "set", "chunk_size", "12"]).unwrap();
        match cli.command {
            Commands::Settings {
                command: SettingsCommand::Set { field, value },
            } => {
                assert_eq!(field, "chunk_size");
                assert_eq!(value, "12");
            }
            other => panic!("Expected settings set, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "chat-summarizer",
            "--verbose",
            "--json-logs",
            "--config",
            "custom.yaml",
            "echo",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(cli.json_logs);
        assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
        assert!(matches!(cli.command, Commands::Echo));
    }

    #[test]
    fn test_cli_default_config_path() {
        let cli = Cli::try_parse_from(["chat-summarizer", "settings", "reset"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("config/config.yaml"));
        assert!(!cli.verbose);
    }
}
