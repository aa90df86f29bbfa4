//! The plugin's settings record and its field names

use crate::config::SummarizerDefaults;
use crate::error::{Result, SummarizerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub(crate) fn default_prompt() -> String {
    "Summarize the following chat messages in about {{words}} words. \
     Keep names, decisions and open questions."
        .to_string()
}

pub(crate) fn default_chunk_size() -> u32 {
    20
}

pub(crate) fn default_word_count() -> u32 {
    150
}

/// Flat settings stored in this plugin's slot of the host settings map
///
/// Missing fields take their defaults when a slot is loaded, so older or
/// partially written slots keep working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRecord {
    /// Prompt template prepended to every window; `{{words}}` is replaced
    /// by `word_count`
    pub prompt: String,
    /// Messages per window
    pub chunk_size: u32,
    /// Target words for each window summary
    pub word_count: u32,
    /// Response length override passed to the generator, in tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_length: Option<u32>,
    /// Last summary produced by a run
    #[serde(default)]
    pub summary: String,
    /// Free text held in the summary input area
    #[serde(default)]
    pub summary_input: String,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self::with_defaults(&SummarizerDefaults::default())
    }
}

impl SettingsRecord {
    /// Build a fresh record from configured defaults
    pub fn with_defaults(defaults: &SummarizerDefaults) -> Self {
        Self {
            prompt: defaults.prompt.clone(),
            chunk_size: defaults.chunk_size,
            word_count: defaults.word_count,
            response_length: None,
            summary: String::new(),
            summary_input: String::new(),
        }
    }

    /// Build the effective record from a stored slot
    ///
    /// Every usable key present in `slot` wins over the default; every
    /// absent key falls back to `defaults`. Unknown keys are ignored.
    /// Numeric fields also accept their decimal text form, as written by
    /// host form controls. A value of the wrong type is logged and replaced
    /// by the default.
    ///
    /// # Errors
    ///
    /// Returns error if the slot is not a JSON object
    pub fn from_slot(slot: &serde_json::Value, defaults: &SummarizerDefaults) -> Result<Self> {
        let stored = slot.as_object().ok_or_else(|| {
            SummarizerError::Settings(format!("settings slot is not an object: {}", slot))
        })?;

        let mut merged = serde_json::to_value(Self::with_defaults(defaults))?;
        if let Some(target) = merged.as_object_mut() {
            for (key, value) in stored {
                let Some(field) = SettingsField::ALL.iter().find(|f| f.as_str() == key.as_str()) else {
                    continue;
                };
                let blank_number =
                    field.is_numeric() && value.as_str().is_some_and(|s| s.trim().is_empty());
                if value.is_null() || blank_number {
                    continue;
                }
                match slot_value(*field, value) {
                    Some(usable) => {
                        target.insert(key.clone(), usable);
                    }
                    None => tracing::warn!(
                        "Ignoring stored {} value {}; using the default",
                        field,
                        value
                    ),
                }
            }
        }

        let record: SettingsRecord = serde_json::from_value(merged)
            .map_err(|e| SummarizerError::Settings(format!("invalid settings slot: {}", e)))?;
        Ok(record)
    }

    /// Serialize the record into a slot value
    pub fn to_slot(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Set one field from its textual form
    ///
    /// Numeric fields must parse as unsigned integers. An empty value or `0`
    /// clears the response length override.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` when a numeric field does not parse; the
    /// record is left unchanged
    pub fn apply(&mut self, field: SettingsField, value: &str) -> Result<()> {
        let parse_number = |raw: &str| -> Result<u32> {
            raw.trim().parse::<u32>().map_err(|_| {
                SummarizerError::InvalidValue {
                    field: field.to_string(),
                    value: raw.to_string(),
                }
                .into()
            })
        };

        match field {
            SettingsField::Prompt => self.prompt = value.to_string(),
            SettingsField::ChunkSize => self.chunk_size = parse_number(value)?,
            SettingsField::WordCount => self.word_count = parse_number(value)?,
            SettingsField::ResponseLength => {
                self.response_length = if value.trim().is_empty() {
                    None
                } else {
                    Some(parse_number(value)?).filter(|n| *n > 0)
                };
            }
            SettingsField::Summary => self.summary = value.to_string(),
            SettingsField::SummaryInput => self.summary_input = value.to_string(),
        }
        Ok(())
    }

    /// Textual value of one field, as shown in the panel
    pub fn value_of(&self, field: SettingsField) -> String {
        match field {
            SettingsField::Prompt => self.prompt.clone(),
            SettingsField::ChunkSize => self.chunk_size.to_string(),
            SettingsField::WordCount => self.word_count.to_string(),
            SettingsField::ResponseLength => self
                .response_length
                .map(|n| n.to_string())
                .unwrap_or_default(),
            SettingsField::Summary => self.summary.clone(),
            SettingsField::SummaryInput => self.summary_input.clone(),
        }
    }

    /// Prompt template with `{{words}}` substituted
    pub fn rendered_prompt(&self) -> String {
        self.prompt.replace("{{words}}", &self.word_count.to_string())
    }
}

/// Names of the fields in [`SettingsRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsField {
    Prompt,
    ChunkSize,
    WordCount,
    ResponseLength,
    Summary,
    SummaryInput,
}

/// Stored value coerced to the field's type, or `None` when unusable
fn slot_value(field: SettingsField, value: &serde_json::Value) -> Option<serde_json::Value> {
    if !field.is_numeric() {
        return value.as_str().map(serde_json::Value::from);
    }

    let number = match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }?;
    if field == SettingsField::ResponseLength && number == 0 {
        return Some(serde_json::Value::Null);
    }
    Some(serde_json::Value::from(number))
}

impl SettingsField {
    /// All fields in display order
    pub const ALL: [SettingsField; 6] = [
        SettingsField::Prompt,
        SettingsField::ChunkSize,
        SettingsField::WordCount,
        SettingsField::ResponseLength,
        SettingsField::Summary,
        SettingsField::SummaryInput,
    ];

    /// Whether the field holds a count rather than text
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::ChunkSize | Self::WordCount | Self::ResponseLength
        )
    }

    /// Key used in the stored slot
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prompt => "prompt",
            Self::ChunkSize => "chunk_size",
            Self::WordCount => "word_count",
            Self::ResponseLength => "response_length",
            Self::Summary => "summary",
            Self::SummaryInput => "summary_input",
        }
    }
}

impl fmt::Display for SettingsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingsField {
    type Err = SummarizerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| SummarizerError::UnknownField(s.to_string()))
    }
}
