//! Settings inspection and editing

use super::open_store;
use crate::config::Config;
use crate::error::Result;
use crate::settings::{SettingsField, SettingsRecord};
use colored::Colorize;

/// Print the stored settings
pub fn show_settings(config: &Config, json: bool) -> Result<()> {
    let store = open_store(config)?;
    let record = store.load()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print!("{}", render_record(&record));
    }

    store.flush()
}

/// Set one field from its textual value
pub fn set_setting(config: &Config, field: &str, value: &str) -> Result<()> {
    let field: SettingsField = field.parse()?;
    let store = open_store(config)?;
    store.load()?;
    store.set(field, value)?;
    store.flush()?;

    println!("{} = {}", field.to_string().bold(), value);
    Ok(())
}

/// Replace the stored settings with the defaults
pub fn reset_settings(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let record = store.reset()?;
    store.flush()?;

    println!("{}", "Settings reset to defaults".green());
    print!("{}", render_record(&record));
    Ok(())
}

fn render_record(record: &SettingsRecord) -> String {
    SettingsField::ALL
        .iter()
        .map(|field| {
            format!(
                "{:<16} {}\n",
                field.as_str().bold(),
                record.value_of(*field)
            )
        })
        .collect()
}
