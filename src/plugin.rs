//! Plugin instance
//!
//! Ties the settings store, the panel and the summarizer together and runs
//! the actions raised by panel events.

use crate::config::PluginConfig;
use crate::error::{Result, SummarizerError};
use crate::host::{ChatContext, Notifier, Toast};
use crate::providers::Provider;
use crate::settings::{SettingsField, SettingsRecord, SettingsStore};
use crate::summarizer::runner::{reject_concurrent_run, TOAST_TITLE};
use crate::summarizer::{ChatSummarizer, SummaryOptions, SummaryReport};
use crate::ui::{
    Fragment, Panel, UiAction, UiBinder, UiEvent, SUMMARIZE_BUTTON, SUMMARY_INPUT, SUMMARY_OUTPUT,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

/// The chat summarizer plugin attached to one host
///
/// All methods take `&self`; the plugin can be shared behind an `Arc` so a
/// running summary can be cancelled from another task.
pub struct SummarizerPlugin {
    config: PluginConfig,
    store: SettingsStore,
    binder: UiBinder,
    panel: Mutex<Panel>,
    summarizer: ChatSummarizer,
    chat: Arc<dyn ChatContext>,
    notifier: Arc<dyn Notifier>,
    active: Mutex<Option<CancellationToken>>,
}

impl SummarizerPlugin {
    /// Create a plugin attached to the host's default settings panel
    pub fn new(
        config: PluginConfig,
        store: SettingsStore,
        provider: Arc<dyn Provider>,
        chat: Arc<dyn ChatContext>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            store,
            binder: UiBinder::standard(),
            panel: Mutex::new(Panel::host_default()),
            summarizer: ChatSummarizer::new(provider, Arc::clone(&notifier)),
            chat,
            notifier,
            active: Mutex::new(None),
        }
    }

    /// Attach to a custom panel layout
    pub fn with_panel(mut self, panel: Panel) -> Self {
        self.panel = Mutex::new(panel);
        self
    }

    /// Load the fragment into the host panel, bind its controls and show
    /// the stored settings
    ///
    /// # Errors
    ///
    /// Returns error if the fragment cannot be loaded, the container is
    /// missing, a required control is absent or the settings cannot be read
    pub async fn activate(&self) -> Result<SettingsRecord> {
        let fragment = Fragment::load(&self.config.fragment_path).await?;

        let record = {
            let mut panel = self.lock_panel()?;
            panel.insert(&self.config.container_id, fragment)?;
            self.binder.bind(&panel)?;
            let record = self.store.load()?;
            self.binder.reflect(&record, &mut panel)?;
            record
        };

        tracing::info!(
            "Plugin {} activated in #{}",
            self.config.id,
            self.config.container_id
        );
        Ok(record)
    }

    /// Route a panel event and run the action it maps to
    pub async fn handle_event(&self, event: UiEvent) -> Result<UiAction> {
        let action = {
            let mut panel = self.lock_panel()?;
            self.binder.dispatch(&event, &self.store, &mut panel)?
        };

        match action {
            UiAction::Summarize => {
                self.summarize().await?;
            }
            UiAction::Echo => self.echo()?,
            UiAction::GetLastMessage => {
                self.copy_last_message()?;
            }
            UiAction::SettingChanged(_) | UiAction::Ignored => {}
        }
        Ok(action)
    }

    /// Summarize the active chat with the stored settings
    ///
    /// The summarize button is disabled while the run is in flight. When at
    /// least one window produced text, the summary is shown in the output
    /// field and stored; otherwise both are left unchanged. A plugin that was
    /// never activated still summarizes; only the panel updates are skipped.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRunning` if a run is in flight
    pub async fn summarize(&self) -> Result<SummaryReport> {
        if !self.chat.is_chat_selected() {
            tracing::debug!("No chat selected");
            self.notifier
                .notify(&Toast::warning("Select a chat to summarize", TOAST_TITLE));
            return Ok(SummaryReport::default());
        }

        let run = ActiveRun::begin(self)?;
        let chat = self.chat.chat();
        let options = SummaryOptions::from_record(&self.store.get()?);

        let report = self
            .summarizer
            .summarize_with(&chat, &options, &run.token)
            .await?;

        if let Some(summary) = &report.summary {
            let mut panel = self.lock_panel()?;
            if panel.has_control(SUMMARY_OUTPUT) {
                panel.set_value(SUMMARY_OUTPUT, summary.as_str())?;
            }
            drop(panel);
            self.store.set_summary(summary)?;
        }
        Ok(report)
    }

    /// Cancel the run in flight, if any
    ///
    /// Returns whether a run was cancelled.
    pub fn cancel(&self) -> bool {
        match self.active.lock() {
            Ok(active) => match active.as_ref() {
                Some(token) => {
                    token.cancel();
                    tracing::info!("Cancelling summarize run");
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    /// Whether a summarize run is in flight
    pub fn is_running(&self) -> bool {
        self.summarizer.is_running()
    }

    /// Show the summary input text as an info notification
    pub fn echo(&self) -> Result<()> {
        let record = self.store.get()?;
        self.notifier.notify(&Toast::info(
            format!("Summary: {}", record.summary_input),
            TOAST_TITLE,
        ));
        Ok(())
    }

    /// Copy the last chat message into the summary input
    ///
    /// Returns the copied text, or `None` when there was nothing to copy.
    pub fn copy_last_message(&self) -> Result<Option<String>> {
        let Some(last) = self.chat.last_message() else {
            tracing::debug!("No messages in chat");
            return Ok(None);
        };
        if last.text.is_empty() {
            tracing::debug!("Last message does not contain text");
            return Ok(None);
        }

        let mut panel = self.lock_panel()?;
        self.binder.dispatch(
            &UiEvent::input(SUMMARY_INPUT, last.text.as_str()),
            &self.store,
            &mut panel,
        )?;
        Ok(Some(last.text))
    }

    /// Store one setting without going through the panel
    pub fn set_setting(&self, field: SettingsField, value: &str) -> Result<()> {
        self.store.set(field, value)
    }

    /// Settings store owned by this plugin
    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// Snapshot of the host panel
    pub fn panel(&self) -> Result<Panel> {
        Ok(self.lock_panel()?.clone())
    }

    /// Cancel any run and persist pending settings
    pub fn shutdown(&self) -> Result<()> {
        self.cancel();
        self.store.flush()?;
        tracing::debug!("Plugin {} shut down", self.config.id);
        Ok(())
    }

    /// Toggle the summarize button if the panel holds one
    fn set_summarize_enabled(&self, enabled: bool) -> Result<()> {
        let mut panel = self.lock_panel()?;
        if panel.has_control(SUMMARIZE_BUTTON) {
            panel.set_enabled(SUMMARIZE_BUTTON, enabled)?;
        } else {
            tracing::debug!("Panel not activated; #{} left as is", SUMMARIZE_BUTTON);
        }
        Ok(())
    }

    fn lock_panel(&self) -> Result<MutexGuard<'_, Panel>> {
        self.panel
            .lock()
            .map_err(|_| SummarizerError::Settings("panel lock poisoned".to_string()).into())
    }
}

/// A summarize run in flight: holds the cancellation token and keeps the
/// summarize button disabled until dropped
///
/// Taken before the summarizer's own run guard so that the token and the
/// button state always belong to the run that set them.
struct ActiveRun<'a> {
    plugin: &'a SummarizerPlugin,
    token: CancellationToken,
}

impl<'a> ActiveRun<'a> {
    fn begin(plugin: &'a SummarizerPlugin) -> Result<Self> {
        let mut active = plugin
            .active
            .lock()
            .map_err(|_| SummarizerError::Settings("run state lock poisoned".to_string()))?;
        if active.is_some() {
            return Err(reject_concurrent_run(plugin.notifier.as_ref()).into());
        }

        plugin.set_summarize_enabled(false)?;

        let token = CancellationToken::new();
        *active = Some(token.clone());
        Ok(Self { plugin, token })
    }
}

impl Drop for ActiveRun<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.plugin.set_summarize_enabled(true) {
            tracing::warn!("Failed to re-enable summarize button: {}", e);
        }
        if let Ok(mut active) = self.plugin.active.lock() {
            *active = None;
        }
    }
}
