//! Panel event binding
//!
//! Maps the fragment's controls to settings fields and buttons to plugin
//! actions. Input events write through to the settings store; click events
//! are turned into [`UiAction`]s for the plugin to run.

use super::panel::Panel;
use crate::error::{Result, SummarizerError};
use crate::settings::{SettingsField, SettingsRecord, SettingsStore};

pub const SUMMARY_PROMPT: &str = "summary_prompt";
pub const SUMMARY_WORD_COUNT: &str = "summary_word_count";
pub const SUMMARY_CHUNK_SIZE: &str = "summary_chunk_size";
pub const SUMMARY_CHUNK_SIZE_VALUE: &str = "summary_chunk_size_value";
pub const SUMMARY_INPUT: &str = "summary_input";
pub const SUMMARY_OUTPUT: &str = "summary_output";
pub const SUMMARIZE_BUTTON: &str = "summarize_button";
pub const ECHO_BUTTON: &str = "echo_button";
pub const GET_LAST_MESSAGE_BUTTON: &str = "get_last_message_button";

/// Event raised by a panel control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The value of an input, text area or slider changed
    Input { id: String, value: String },
    /// A button was clicked
    Click { id: String },
}

impl UiEvent {
    pub fn input(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Input {
            id: id.into(),
            value: value.into(),
        }
    }

    pub fn click(id: impl Into<String>) -> Self {
        Self::Click { id: id.into() }
    }
}

/// What the plugin should do in response to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// A setting was stored; nothing else to do
    SettingChanged(SettingsField),
    Summarize,
    Echo,
    GetLastMessage,
    /// Unknown control or disabled button
    Ignored,
}

#[derive(Debug, Clone, Copy)]
struct InputBinding {
    control: &'static str,
    field: SettingsField,
    /// Label mirroring the control's value
    label: Option<&'static str>,
}

/// Control bindings of the settings fragment
#[derive(Debug, Clone)]
pub struct UiBinder {
    inputs: Vec<InputBinding>,
    buttons: Vec<(&'static str, UiAction)>,
    output: &'static str,
}

impl UiBinder {
    /// Bindings for the bundled `settings.html`
    pub fn standard() -> Self {
        Self {
            inputs: vec![
                InputBinding {
                    control: SUMMARY_PROMPT,
                    field: SettingsField::Prompt,
                    label: None,
                },
                InputBinding {
                    control: SUMMARY_WORD_COUNT,
                    field: SettingsField::WordCount,
                    label: None,
                },
                InputBinding {
                    control: SUMMARY_CHUNK_SIZE,
                    field: SettingsField::ChunkSize,
                    label: Some(SUMMARY_CHUNK_SIZE_VALUE),
                },
                InputBinding {
                    control: SUMMARY_INPUT,
                    field: SettingsField::SummaryInput,
                    label: None,
                },
            ],
            buttons: vec![
                (SUMMARIZE_BUTTON, UiAction::Summarize),
                (ECHO_BUTTON, UiAction::Echo),
                (GET_LAST_MESSAGE_BUTTON, UiAction::GetLastMessage),
            ],
            output: SUMMARY_OUTPUT,
        }
    }

    /// Every control id the bindings expect, labels and output included
    pub fn required_ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = Vec::new();
        for input in &self.inputs {
            ids.push(input.control);
            ids.extend(input.label);
        }
        ids.extend(self.buttons.iter().map(|(id, _)| *id));
        ids.push(self.output);
        ids
    }

    /// Check that the panel holds every bound control
    ///
    /// # Errors
    ///
    /// Returns `MissingControl` naming the first absent id
    pub fn bind(&self, panel: &Panel) -> Result<()> {
        if let Some(missing) = self.required_ids().into_iter().find(|id| !panel.has_control(id)) {
            return Err(SummarizerError::MissingControl(missing.to_string()).into());
        }
        tracing::debug!("Bound {} panel controls", self.required_ids().len());
        Ok(())
    }

    /// Route one panel event
    ///
    /// Input on a bound control stores the value and mirrors it into the
    /// control and its label. Clicks on enabled buttons map to an action.
    ///
    /// # Errors
    ///
    /// Returns error if the store rejects the value; the panel is left
    /// unchanged in that case
    pub fn dispatch(
        &self,
        event: &UiEvent,
        store: &SettingsStore,
        panel: &mut Panel,
    ) -> Result<UiAction> {
        match event {
            UiEvent::Input { id, value } => {
                let Some(binding) = self.inputs.iter().find(|b| b.control == id.as_str()) else {
                    tracing::debug!("Ignoring input on unbound control #{}", id);
                    return Ok(UiAction::Ignored);
                };

                store.set(binding.field, value)?;
                panel.set_value(binding.control, value.as_str())?;
                if let Some(label) = binding.label {
                    panel.set_value(label, value.as_str())?;
                }
                Ok(UiAction::SettingChanged(binding.field))
            }
            UiEvent::Click { id } => {
                let Some((_, action)) = self.buttons.iter().find(|(b, _)| *b == id.as_str()) else {
                    tracing::debug!("Ignoring click on unbound control #{}", id);
                    return Ok(UiAction::Ignored);
                };

                if !panel.is_enabled(id) {
                    tracing::debug!("Ignoring click on disabled #{}", id);
                    return Ok(UiAction::Ignored);
                }
                Ok(*action)
            }
        }
    }

    /// Write the record's values into the controls exactly as stored
    pub fn reflect(&self, record: &SettingsRecord, panel: &mut Panel) -> Result<()> {
        for binding in &self.inputs {
            let value = record.value_of(binding.field);
            if let Some(label) = binding.label {
                panel.set_value(label, value.as_str())?;
            }
            panel.set_value(binding.control, value)?;
        }
        panel.set_value(self.output, record.summary.as_str())
    }

    /// Id of the display field for summaries
    pub fn output_id(&self) -> &'static str {
        self.output
    }
}

impl Default for UiBinder {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SummarizerDefaults;
    use crate::settings::MemorySettingsStore;
    use crate::ui::fragment::Fragment;
    use crate::ui::panel::LEFT_COLUMN;
    use std::sync::Arc;

    const HTML: &str = include_str!("../../assets/settings.html");

    fn panel() -> Panel {
        let mut panel = Panel::host_default();
        panel.insert(LEFT_COLUMN, Fragment::parse(HTML)).unwrap();
        panel
    }

    fn store() -> SettingsStore {
        let store = SettingsStore::new(
            "chat-summarizer",
            SummarizerDefaults::default(),
            Arc::new(MemorySettingsStore::new()),
        );
        store.load().unwrap();
        store
    }

    #[test]
    fn test_bundled_fragment_binds() {
        UiBinder::standard().bind(&panel()).unwrap();
    }

    #[test]
    fn test_bind_reports_missing_control() {
        let mut panel = Panel::host_default();
        panel
            .insert(LEFT_COLUMN, Fragment::parse(r#"<textarea id="summary_prompt"></textarea>"#))
            .unwrap();

        let err = UiBinder::standard().bind(&panel).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing control in settings fragment: #summary_word_count"
        );
    }

    #[test]
    fn test_reflect_defaults_exactly_as_stored() {
        let binder = UiBinder::standard();
        let mut panel = panel();
        let record = SettingsRecord::default();

        binder.reflect(&record, &mut panel).unwrap();

        assert_eq!(panel.value(SUMMARY_PROMPT), Some(record.prompt.as_str()));
        assert_eq!(panel.value(SUMMARY_WORD_COUNT), Some("150"));
        assert_eq!(panel.value(SUMMARY_CHUNK_SIZE), Some("20"));
        assert_eq!(panel.value(SUMMARY_CHUNK_SIZE_VALUE), Some("20"));
        assert_eq!(panel.value(SUMMARY_INPUT), Some(""));
        assert_eq!(panel.value(SUMMARY_OUTPUT), Some(""));
    }

    #[test]
    fn test_slider_updates_chunk_size_and_label_only() {
        let binder = UiBinder::standard();
        let store = store();
        let mut panel = panel();
        binder.reflect(&store.get().unwrap(), &mut panel).unwrap();
        let before = store.get().unwrap();

        let action = binder
            .dispatch(&UiEvent::input(SUMMARY_CHUNK_SIZE, "7"), &store, &mut panel)
            .unwrap();

        assert_eq!(action, UiAction::SettingChanged(SettingsField::ChunkSize));
        let mut expected = before;
        expected.chunk_size = 7;
        assert_eq!(store.get().unwrap(), expected);
        assert_eq!(panel.value(SUMMARY_CHUNK_SIZE), Some("7"));
        assert_eq!(panel.value(SUMMARY_CHUNK_SIZE_VALUE), Some("7"));
        assert_eq!(panel.value(SUMMARY_WORD_COUNT), Some("150"));
    }

    #[test]
    fn test_invalid_number_leaves_panel_unchanged() {
        let binder = UiBinder::standard();
        let store = store();
        let mut panel = panel();
        binder.reflect(&store.get().unwrap(), &mut panel).unwrap();

        let result = binder.dispatch(&UiEvent::input(SUMMARY_WORD_COUNT, "many"), &store, &mut panel);

        assert!(result.is_err());
        assert_eq!(panel.value(SUMMARY_WORD_COUNT), Some("150"));
        assert_eq!(store.get().unwrap().word_count, 150);
    }

    #[test]
    fn test_text_inputs_store_values() {
        let binder = UiBinder::standard();
        let store = store();
        let mut panel = panel();

        binder
            .dispatch(&UiEvent::input(SUMMARY_PROMPT, "Recap in {{words}} words"), &store, &mut panel)
            .unwrap();
        binder
            .dispatch(&UiEvent::input(SUMMARY_INPUT, "draft"), &store, &mut panel)
            .unwrap();

        let record = store.get().unwrap();
        assert_eq!(record.prompt, "Recap in {{words}} words");
        assert_eq!(record.summary_input, "draft");
    }

    #[test]
    fn test_clicks_map_to_actions() {
        let binder = UiBinder::standard();
        let store = store();
        let mut panel = panel();

        let cases = [
            (SUMMARIZE_BUTTON, UiAction::Summarize),
            (ECHO_BUTTON, UiAction::Echo),
            (GET_LAST_MESSAGE_BUTTON, UiAction::GetLastMessage),
            ("unknown_button", UiAction::Ignored),
        ];
        for (id, expected) in cases {
            let action = binder.dispatch(&UiEvent::click(id), &store, &mut panel).unwrap();
            assert_eq!(action, expected, "click on {}", id);
        }
    }

    #[test]
    fn test_disabled_button_is_ignored() {
        let binder = UiBinder::standard();
        let store = store();
        let mut panel = panel();
        panel.set_enabled(SUMMARIZE_BUTTON, false).unwrap();

        let action = binder
            .dispatch(&UiEvent::click(SUMMARIZE_BUTTON), &store, &mut panel)
            .unwrap();
        assert_eq!(action, UiAction::Ignored);
    }
}
