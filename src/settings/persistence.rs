//! Persistence backends for the host settings map
//!
//! The host keeps one JSON object per plugin id. Backends only move those
//! slots in and out; merging with defaults happens in the settings record.

use crate::error::{Result, SummarizerError};
use anyhow::Context;
use chrono::Utc;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Storage seam for the keyed settings map
pub trait SettingsPersistence: Send + Sync {
    /// Read the slot stored under `plugin_id`, if any
    fn load_slot(&self, plugin_id: &str) -> Result<Option<serde_json::Value>>;

    /// Replace the slot stored under `plugin_id`
    fn save_slot(&self, plugin_id: &str, slot: &serde_json::Value) -> Result<()>;
}

/// In-memory settings map
///
/// Useful for tests and for embedding the plugin where the host owns
/// persistence itself.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    slots: RwLock<HashMap<String, serde_json::Value>>,
    saves: RwLock<usize>,
}

impl MemorySettingsStore {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map pre-populated with one slot
    pub fn with_slot(plugin_id: &str, slot: serde_json::Value) -> Self {
        let store = Self::default();
        if let Ok(mut slots) = store.slots.write() {
            slots.insert(plugin_id.to_string(), slot);
        }
        store
    }

    /// Number of completed `save_slot` calls
    pub fn save_count(&self) -> usize {
        self.saves.read().map(|count| *count).unwrap_or_default()
    }
}

impl SettingsPersistence for MemorySettingsStore {
    fn load_slot(&self, plugin_id: &str) -> Result<Option<serde_json::Value>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| SummarizerError::Storage("settings map lock poisoned".to_string()))?;
        Ok(slots.get(plugin_id).cloned())
    }

    fn save_slot(&self, plugin_id: &str, slot: &serde_json::Value) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| SummarizerError::Storage("settings map lock poisoned".to_string()))?;
        slots.insert(plugin_id.to_string(), slot.clone());
        drop(slots);

        if let Ok(mut saves) = self.saves.write() {
            *saves += 1;
        }
        Ok(())
    }
}

/// SQLite-backed settings map
pub struct SqliteSettingsStore {
    db_path: PathBuf,
}

impl SqliteSettingsStore {
    /// Open the settings database in the user's data directory
    pub fn new() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("org", "chat-summarizer", "chat-summarizer")
            .ok_or_else(|| SummarizerError::Storage("Could not determine data directory".into()))?;

        Self::new_with_path(proj_dirs.data_dir().join("settings.db"))
    }

    /// Open the settings database at a specific path
    ///
    /// # Examples
    ///
    /// ```
    /// use chat_summarizer::settings::SqliteSettingsStore;
    ///
    /// let dir = std::env::temp_dir().join("chat_summarizer_doc");
    /// let store = SqliteSettingsStore::new_with_path(dir.join("settings.db")).unwrap();
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(|e| SummarizerError::Storage(e.to_string()))?;
        }

        let store = Self { db_path };
        store.init()?;
        Ok(store)
    }

    /// Path of the underlying database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn open(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)
            .context("Failed to open database")
            .map_err(|e| SummarizerError::Storage(e.to_string()))?;
        Ok(conn)
    }

    fn init(&self) -> Result<()> {
        let conn = self.open()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS extension_settings (
                plugin_id TEXT PRIMARY KEY,
                settings JSON NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create tables")
        .map_err(|e| SummarizerError::Storage(e.to_string()))?;
        Ok(())
    }

    /// When the slot for `plugin_id` was last written (RFC 3339)
    pub fn updated_at(&self, plugin_id: &str) -> Result<Option<String>> {
        let conn = self.open()?;
        let updated = conn
            .query_row(
                "SELECT updated_at FROM extension_settings WHERE plugin_id = ?",
                params![plugin_id],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query settings timestamp")
            .map_err(|e| SummarizerError::Storage(e.to_string()))?;
        Ok(updated)
    }
}

impl SettingsPersistence for SqliteSettingsStore {
    fn load_slot(&self, plugin_id: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.open()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT settings FROM extension_settings WHERE plugin_id = ?",
                params![plugin_id],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query settings")
            .map_err(|e| SummarizerError::Storage(e.to_string()))?;

        match raw {
            Some(json) => {
                let slot = serde_json::from_str(&json)
                    .context("Failed to deserialize settings")
                    .map_err(|e| SummarizerError::Storage(e.to_string()))?;
                Ok(Some(slot))
            }
            None => Ok(None),
        }
    }

    fn save_slot(&self, plugin_id: &str, slot: &serde_json::Value) -> Result<()> {
        let conn = self.open()?;
        let json = serde_json::to_string(slot)
            .context("Failed to serialize settings")
            .map_err(|e| SummarizerError::Storage(e.to_string()))?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO extension_settings (plugin_id, settings, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(plugin_id) DO UPDATE SET
                settings = excluded.settings,
                updated_at = excluded.updated_at",
            params![plugin_id, json, now],
        )
        .context("Failed to save settings")
        .map_err(|e| SummarizerError::Storage(e.to_string()))?;

        tracing::debug!("Persisted settings slot for {}", plugin_id);
        Ok(())
    }
}
