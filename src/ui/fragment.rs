//! Static HTML settings fragment

use crate::error::{Result, SummarizerError};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\sid\s*=\s*["']([^"']+)["']"#).expect("element id pattern is valid")
    })
}

/// The plugin's settings markup, inserted verbatim into the host panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    html: String,
    ids: BTreeSet<String>,
}

impl Fragment {
    /// Read the fragment from disk
    ///
    /// # Errors
    ///
    /// Returns `Fragment` error if the file cannot be read
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let html = tokio::fs::read_to_string(path).await.map_err(|e| {
            SummarizerError::Fragment(format!("Failed to load {}: {}", path.display(), e))
        })?;
        tracing::debug!("Loaded settings fragment from {}", path.display());
        Ok(Self::parse(html))
    }

    /// Wrap markup and index its element ids
    ///
    /// # Examples
    ///
    /// ```
    /// use chat_summarizer::ui::Fragment;
    ///
    /// let fragment = Fragment::parse(r#"<div><button id="summarize_button">Go</button></div>"#);
    /// assert!(fragment.contains_id("summarize_button"));
    /// ```
    pub fn parse(html: impl Into<String>) -> Self {
        let html = html.into();
        let ids = id_pattern()
            .captures_iter(&html)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
            .collect();
        Self { html, ids }
    }

    /// Raw markup
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Element ids declared in the markup
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}
