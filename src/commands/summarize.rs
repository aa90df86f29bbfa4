//! Summarize a chat export

use super::build_plugin;
use crate::config::Config;
use crate::error::Result;
use crate::host::JsonlChatContext;
use crate::settings::SettingsField;
use crate::summarizer::ChunkOutcome;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;

/// Values to store before the run
#[derive(Debug, Clone, Default)]
pub struct SummarizeOverrides {
    pub chunk_size: Option<u32>,
    pub prompt: Option<String>,
    pub words: Option<u32>,
}

/// Summarize `chat_path` and print the summary to stdout
///
/// Ctrl-C cancels the run before the next chunk; summaries produced so far
/// are still printed and stored.
pub async fn run_summarize(
    config: &Config,
    chat_path: &Path,
    overrides: SummarizeOverrides,
) -> Result<()> {
    let chat = JsonlChatContext::from_path(chat_path).await?;
    let plugin = Arc::new(build_plugin(config, Arc::new(chat))?);
    plugin.activate().await?;

    if let Some(chunk_size) = overrides.chunk_size {
        plugin.set_setting(SettingsField::ChunkSize, &chunk_size.to_string())?;
    }
    if let Some(prompt) = &overrides.prompt {
        plugin.set_setting(SettingsField::Prompt, prompt)?;
    }
    if let Some(words) = overrides.words {
        plugin.set_setting(SettingsField::WordCount, &words.to_string())?;
    }

    let interrupt = {
        let plugin = Arc::clone(&plugin);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                plugin.cancel();
            }
        })
    };

    let result = plugin.summarize().await;
    interrupt.abort();
    let report = result?;

    for (index, outcome) in report.outcomes.iter().enumerate() {
        match outcome {
            ChunkOutcome::Summary(_) => {
                tracing::debug!("Chunk {} summarized", index + 1)
            }
            ChunkOutcome::Empty => tracing::debug!("Chunk {} empty", index + 1),
            ChunkOutcome::Failed(e) => tracing::debug!("Chunk {} failed: {}", index + 1, e),
        }
    }

    match &report.summary {
        Some(summary) => println!("{}", summary),
        None if report.windows == 0 => eprintln!("{}", "No messages to summarize".yellow()),
        None => eprintln!("{}", "No chunk produced a summary".yellow()),
    }

    if report.cancelled {
        eprintln!(
            "{}",
            format!(
                "Cancelled after {} of {} chunks",
                report.generator_calls(),
                report.windows
            )
            .yellow()
        );
    }

    plugin.shutdown()
}
