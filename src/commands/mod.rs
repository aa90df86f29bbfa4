/*!
Command handlers for the CLI

Each handler wires the library components for one subcommand:

- `summarize` summarizes a chat export with the stored settings
- `settings` shows, changes or resets the stored settings
- `chat` copies the last message into the summary input and echoes it
*/

use crate::config::Config;
use crate::error::Result;
use crate::host::{ChatContext, StaticChatContext, TerminalNotifier};
use crate::plugin::SummarizerPlugin;
use crate::providers::LazyProvider;
use crate::settings::{open_persistence, SettingsStore};
use std::sync::Arc;
use std::time::Duration;

pub mod chat;
pub mod settings;
pub mod summarize;

/// Settings store backed by the configured database
///
/// Saves are debounced by `storage.debounce_ms`; callers flush before
/// exiting.
pub fn open_store(config: &Config) -> Result<SettingsStore> {
    let persistence = open_persistence(&config.storage)?;
    Ok(SettingsStore::new(
        config.plugin.id.clone(),
        config.summarizer.clone(),
        persistence,
    )
    .with_debounce(Duration::from_millis(config.storage.debounce_ms)))
}

/// Plugin instance with the configured provider and a terminal notifier
///
/// The provider is created on the first summarize call.
pub fn build_plugin(config: &Config, chat: Arc<dyn ChatContext>) -> Result<SummarizerPlugin> {
    Ok(SummarizerPlugin::new(
        config.plugin.clone(),
        open_store(config)?,
        Arc::new(LazyProvider::new(config.provider.clone())),
        chat,
        Arc::new(TerminalNotifier),
    ))
}

/// Plugin instance without a chat, for commands that only touch settings
pub fn build_detached_plugin(config: &Config) -> Result<SummarizerPlugin> {
    build_plugin(config, Arc::new(StaticChatContext::unselected()))
}
