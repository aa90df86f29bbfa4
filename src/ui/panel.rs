//! Host settings panel
//!
//! A minimal model of the host page: named containers that receive
//! fragments, and the form controls those fragments declare. Controls are
//! addressed by element id and carry a text value and an enabled flag.

use super::fragment::Fragment;
use crate::error::{Result, SummarizerError};
use std::collections::HashMap;

/// Left column of the host's extension settings
pub const LEFT_COLUMN: &str = "extensions_settings";
/// Right column of the host's extension settings
pub const RIGHT_COLUMN: &str = "extensions_settings2";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Control {
    value: String,
    enabled: bool,
}

impl Default for Control {
    fn default() -> Self {
        Self {
            value: String::new(),
            enabled: true,
        }
    }
}

/// Host page state visible to the plugin
#[derive(Debug, Clone, Default)]
pub struct Panel {
    containers: HashMap<String, Vec<Fragment>>,
    controls: HashMap<String, Control>,
}

impl Panel {
    /// Panel with the given container ids
    pub fn with_containers<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            containers: ids.into_iter().map(|id| (id.into(), Vec::new())).collect(),
            controls: HashMap::new(),
        }
    }

    /// Panel laid out like the host's extension settings page
    pub fn host_default() -> Self {
        Self::with_containers([LEFT_COLUMN, RIGHT_COLUMN])
    }

    /// Append a fragment to a container and register its controls
    ///
    /// # Errors
    ///
    /// Returns `Fragment` error if the container does not exist
    pub fn insert(&mut self, container_id: &str, fragment: Fragment) -> Result<()> {
        let container = self.containers.get_mut(container_id).ok_or_else(|| {
            SummarizerError::Fragment(format!("Host container #{} not found", container_id))
        })?;

        for id in fragment.ids() {
            self.controls.entry(id.to_string()).or_default();
        }
        container.push(fragment);
        tracing::debug!("Inserted settings fragment into #{}", container_id);
        Ok(())
    }

    /// Fragments inserted into a container, in insertion order
    pub fn fragments(&self, container_id: &str) -> &[Fragment] {
        self.containers
            .get(container_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_control(&self, id: &str) -> bool {
        self.controls.contains_key(id)
    }

    /// Current value of a control
    pub fn value(&self, id: &str) -> Option<&str> {
        self.controls.get(id).map(|c| c.value.as_str())
    }

    /// Set the value of a control
    ///
    /// # Errors
    ///
    /// Returns `MissingControl` if no inserted fragment declares `id`
    pub fn set_value(&mut self, id: &str, value: impl Into<String>) -> Result<()> {
        self.control_mut(id)?.value = value.into();
        Ok(())
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.controls.get(id).map(|c| c.enabled).unwrap_or(false)
    }

    /// Enable or disable a control
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> Result<()> {
        self.control_mut(id)?.enabled = enabled;
        Ok(())
    }

    fn control_mut(&mut self, id: &str) -> Result<&mut Control> {
        self.controls
            .get_mut(id)
            .ok_or_else(|| SummarizerError::MissingControl(id.to_string()).into())
    }
}
