//! Settings module
//!
//! The plugin keeps a small flat record in its slot of the host settings
//! map. This module holds the record type, the persistence backends for the
//! map, and the store adapter the rest of the plugin talks to.

pub(crate) mod persistence;
pub(crate) mod record;
pub(crate) mod store;

pub use persistence::{MemorySettingsStore, SettingsPersistence, SqliteSettingsStore};
pub use record::{SettingsField, SettingsRecord};
pub use store::SettingsStore;

use crate::config::StorageConfig;
use crate::error::Result;
use std::sync::Arc;

/// Open the persistence backend described by the storage configuration
///
/// Uses the configured database path when set, otherwise the platform data
/// directory.
pub fn open_persistence(config: &StorageConfig) -> Result<Arc<dyn SettingsPersistence>> {
    let store = match &config.db_path {
        Some(path) => SqliteSettingsStore::new_with_path(path.clone())?,
        None => SqliteSettingsStore::new()?,
    };
    tracing::debug!("Using settings database at {}", store.path().display());
    Ok(Arc::new(store))
}
