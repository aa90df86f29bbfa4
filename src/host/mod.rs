//! Host services
//!
//! Traits for what the host application provides to the plugin (the active
//! chat and the notification popups) plus adapters that run without a host.

pub mod chat;
pub mod notify;

pub use chat::{ChatContext, ChatMessage, JsonlChatContext, StaticChatContext};
pub use notify::{
    LogNotifier, MemoryNotifier, Notifier, TerminalNotifier, Toast, ToastLevel, ToastOptions,
};

#[cfg(test)]
pub use notify::MockNotifier;
