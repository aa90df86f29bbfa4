//! Settings store adapter
//!
//! Owns the plugin's settings record, reads it from the injected persistence
//! backend with defaults filled in, and writes changes back either on demand
//! or through a debounced background saver.

use super::persistence::SettingsPersistence;
use super::record::{SettingsField, SettingsRecord};
use crate::config::SummarizerDefaults;
use crate::error::{Result, SummarizerError};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Settings store for one plugin slot
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use chat_summarizer::config::SummarizerDefaults;
/// use chat_summarizer::settings::{MemorySettingsStore, SettingsField, SettingsStore};
///
/// # fn example() -> chat_summarizer::error::Result<()> {
/// let backend = Arc::new(MemorySettingsStore::new());
/// let store = SettingsStore::new("chat-summarizer", SummarizerDefaults::default(), backend);
/// let record = store.load()?;
/// assert_eq!(record.chunk_size, 20);
///
/// store.set(SettingsField::ChunkSize, "8")?;
/// store.flush()?;
/// # Ok(())
/// # }
/// ```
pub struct SettingsStore {
    plugin_id: String,
    defaults: SummarizerDefaults,
    record: Arc<Mutex<SettingsRecord>>,
    persistence: Arc<dyn SettingsPersistence>,
    saver: Option<DebouncedSaver>,
}

impl SettingsStore {
    /// Create a store that persists only on [`SettingsStore::flush`]
    pub fn new(
        plugin_id: impl Into<String>,
        defaults: SummarizerDefaults,
        persistence: Arc<dyn SettingsPersistence>,
    ) -> Self {
        let record = Arc::new(Mutex::new(SettingsRecord::with_defaults(&defaults)));
        Self {
            plugin_id: plugin_id.into(),
            defaults,
            record,
            persistence,
            saver: None,
        }
    }

    /// Persist changes after `debounce` has passed without further changes
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.saver = Some(DebouncedSaver::spawn(
            self.plugin_id.clone(),
            Arc::clone(&self.record),
            Arc::clone(&self.persistence),
            debounce,
        ));
        self
    }

    /// Identifier of the slot this store owns
    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    /// Read the slot, fill missing fields with defaults, and return the
    /// effective record
    ///
    /// An absent or empty slot is initialized with the defaults and scheduled
    /// for persistence.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails or the stored slot is not an object
    pub fn load(&self) -> Result<SettingsRecord> {
        let slot = self.persistence.load_slot(&self.plugin_id)?;

        let initialize = match &slot {
            None => true,
            Some(value) => value.as_object().map(|o| o.is_empty()).unwrap_or(false),
        };

        let loaded = match slot {
            Some(value) if !initialize => SettingsRecord::from_slot(&value, &self.defaults)?,
            _ => SettingsRecord::with_defaults(&self.defaults),
        };

        *self.lock()? = loaded.clone();

        if initialize {
            tracing::info!("Initialized settings for {} with defaults", self.plugin_id);
            self.schedule_save();
        } else {
            tracing::debug!("Loaded settings for {}", self.plugin_id);
        }

        Ok(loaded)
    }

    /// Current in-memory record
    pub fn get(&self) -> Result<SettingsRecord> {
        Ok(self.lock()?.clone())
    }

    /// Set one field from its textual form and schedule persistence
    ///
    /// # Errors
    ///
    /// Returns error if the value does not fit the field; the record is
    /// unchanged in that case
    pub fn set(&self, field: SettingsField, value: &str) -> Result<()> {
        self.lock()?.apply(field, value)?;
        tracing::debug!("Setting {} updated", field);
        self.schedule_save();
        Ok(())
    }

    /// Store the summary produced by a run
    pub fn set_summary(&self, summary: &str) -> Result<()> {
        self.set(SettingsField::Summary, summary)
    }

    /// Replace the whole record with the configured defaults
    pub fn reset(&self) -> Result<SettingsRecord> {
        let fresh = SettingsRecord::with_defaults(&self.defaults);
        *self.lock()? = fresh.clone();
        self.schedule_save();
        Ok(fresh)
    }

    /// Persist the current record immediately
    pub fn flush(&self) -> Result<()> {
        let slot = self.lock()?.to_slot()?;
        self.persistence.save_slot(&self.plugin_id, &slot)
    }

    fn schedule_save(&self) {
        if let Some(saver) = &self.saver {
            saver.notify();
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, SettingsRecord>> {
        self.record
            .lock()
            .map_err(|_| SummarizerError::Settings("settings record lock poisoned".to_string()).into())
    }
}

/// Background task that coalesces bursts of changes into a single save
struct DebouncedSaver {
    tx: mpsc::UnboundedSender<()>,
}

impl DebouncedSaver {
    fn spawn(
        plugin_id: String,
        record: Arc<Mutex<SettingsRecord>>,
        persistence: Arc<dyn SettingsPersistence>,
        debounce: Duration,
    ) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();

        tokio::spawn(async move {
            while rx.recv().await.is_some() {
                let mut closed = false;
                loop {
                    tokio::select! {
                        _ = tokio::time::sleep(debounce) => break,
                        next = rx.recv() => {
                            if next.is_none() {
                                closed = true;
                                break;
                            }
                        }
                    }
                }

                save_snapshot(&plugin_id, &record, &persistence).await;

                if closed {
                    break;
                }
            }
            tracing::debug!("Debounced saver for {} stopped", plugin_id);
        });

        Self { tx }
    }

    fn notify(&self) {
        if self.tx.send(()).is_err() {
            tracing::warn!("Debounced saver is no longer running; change not scheduled");
        }
    }
}

fn snapshot(plugin_id: &str, record: &Mutex<SettingsRecord>) -> Option<serde_json::Value> {
    let guard = match record.lock() {
        Ok(guard) => guard,
        Err(_) => {
            tracing::error!("Settings record lock poisoned for {}", plugin_id);
            return None;
        }
    };

    match guard.to_slot() {
        Ok(slot) => Some(slot),
        Err(e) => {
            tracing::error!("Failed to serialize settings for {}: {}", plugin_id, e);
            None
        }
    }
}

async fn save_snapshot(
    plugin_id: &str,
    record: &Arc<Mutex<SettingsRecord>>,
    persistence: &Arc<dyn SettingsPersistence>,
) {
    let Some(slot) = snapshot(plugin_id, record) else {
        return;
    };

    let id = plugin_id.to_string();
    let backend = Arc::clone(persistence);
    match tokio::task::spawn_blocking(move || backend.save_slot(&id, &slot)).await {
        Ok(Ok(())) => tracing::debug!("Saved settings for {}", plugin_id),
        Ok(Err(e)) => tracing::error!("Failed to save settings for {}: {}", plugin_id, e),
        Err(e) => tracing::error!("Settings save task failed for {}: {}", plugin_id, e),
    }
}
