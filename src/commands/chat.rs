//! Commands that act on the summary input

use super::{build_detached_plugin, build_plugin};
use crate::config::Config;
use crate::error::Result;
use crate::host::JsonlChatContext;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;

/// Copy the last message of `chat_path` into the stored summary input
pub async fn copy_last_message(config: &Config, chat_path: &Path) -> Result<()> {
    let chat = JsonlChatContext::from_path(chat_path).await?;
    let plugin = build_plugin(config, Arc::new(chat))?;
    plugin.activate().await?;

    match plugin.copy_last_message()? {
        Some(text) => println!("{}", text),
        None => eprintln!("{}", "Nothing to copy".yellow()),
    }

    plugin.shutdown()
}

/// Show the stored summary input as an info notification
pub fn echo(config: &Config) -> Result<()> {
    let plugin = build_detached_plugin(config)?;
    plugin.store().load()?;
    plugin.echo()?;
    plugin.shutdown()
}
