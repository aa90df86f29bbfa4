//! chat-summarizer - summarize a chat in fixed-size chunks
//!
#![doc = "Main entry point for the chat-summarizer command-line tool."]

use anyhow::Result;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chat_summarizer::cli::{Cli, Commands, SettingsCommand};
use chat_summarizer::commands;
use chat_summarizer::commands::summarize::SummarizeOverrides;
use chat_summarizer::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose, cli.json_logs)?;

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Summarize {
            chat,
            chunk_size,
            prompt,
            words,
        } => {
            tracing::info!("Summarizing chat export {}", chat.display());
            let overrides = SummarizeOverrides {
                chunk_size,
                prompt,
                words,
            };
            commands::summarize::run_summarize(&config, &chat, overrides).await?;
            Ok(())
        }
        Commands::Settings { command } => match command {
            SettingsCommand::Show { json } => commands::settings::show_settings(&config, json),
            SettingsCommand::Set { field, value } => {
                commands::settings::set_setting(&config, &field, &value)
            }
            SettingsCommand::Reset => commands::settings::reset_settings(&config),
        },
        Commands::LastMessage { chat } => {
            commands::chat::copy_last_message(&config, &chat).await?;
            Ok(())
        }
        Commands::Echo => commands::chat::echo(&config),
    }
}

/// Initialize tracing with an environment filter
///
/// Logs go to stderr so stdout carries only command output. `RUST_LOG`
/// overrides the default level.
fn init_tracing(verbose: bool, json: bool) -> Result<()> {
    let default_level = if verbose {
        "chat_summarizer=debug"
    } else {
        "chat_summarizer=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}
