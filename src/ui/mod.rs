//! Settings panel binding
//!
//! Loads the static settings fragment, inserts it into a host container and
//! connects its controls to the settings store.

pub mod binder;
pub mod fragment;
pub mod panel;

pub use binder::{
    UiAction, UiBinder, UiEvent, ECHO_BUTTON, GET_LAST_MESSAGE_BUTTON, SUMMARIZE_BUTTON,
    SUMMARY_CHUNK_SIZE, SUMMARY_CHUNK_SIZE_VALUE, SUMMARY_INPUT, SUMMARY_OUTPUT, SUMMARY_PROMPT,
    SUMMARY_WORD_COUNT,
};
pub use fragment::Fragment;
pub use panel::{Panel, LEFT_COLUMN, RIGHT_COLUMN};
