//! Notification popups
//!
//! The host shows fire-and-forget toasts. Adapters here route them to the
//! log, to a terminal, or into memory.

use colored::Colorize;
use std::fmt;
use std::sync::Mutex;

/// Severity of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for ToastLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Display timing of a toast
///
/// Zero for both values keeps the toast open until dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastOptions {
    /// Milliseconds before the toast auto-dismisses
    pub time_out: u64,
    /// Extra milliseconds granted after the pointer leaves the toast
    pub extended_time_out: u64,
}

impl Default for ToastOptions {
    fn default() -> Self {
        Self {
            time_out: 5000,
            extended_time_out: 1000,
        }
    }
}

impl ToastOptions {
    /// Toast that stays open until dismissed
    pub fn sticky() -> Self {
        Self {
            time_out: 0,
            extended_time_out: 0,
        }
    }

    /// Whether the toast dismisses itself
    pub fn auto_dismiss(&self) -> bool {
        self.time_out > 0
    }
}

/// A notification popup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub title: String,
    pub options: ToastOptions,
}

impl Toast {
    fn new(level: ToastLevel, message: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            title: title.into(),
            options: ToastOptions::default(),
        }
    }

    /// Informational toast
    pub fn info(message: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(ToastLevel::Info, message, title)
    }

    /// Warning toast
    pub fn warning(message: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(ToastLevel::Warning, message, title)
    }

    /// Error toast
    pub fn error(message: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(ToastLevel::Error, message, title)
    }

    /// Replace the display timing
    pub fn with_options(mut self, options: ToastOptions) -> Self {
        self.options = options;
        self
    }
}

/// Host notification API
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Show a toast; never blocks and never fails
    fn notify(&self, toast: &Toast);
}

/// Notifier that writes toasts to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, toast: &Toast) {
        let sticky = !toast.options.auto_dismiss();
        let time_out_ms = toast.options.time_out;
        match toast.level {
            ToastLevel::Info => {
                tracing::info!(title = %toast.title, sticky, time_out_ms, "{}", toast.message)
            }
            ToastLevel::Warning => {
                tracing::warn!(title = %toast.title, sticky, time_out_ms, "{}", toast.message)
            }
            ToastLevel::Error => {
                tracing::error!(title = %toast.title, sticky, time_out_ms, "{}", toast.message)
            }
        }
    }
}

/// Notifier that prints coloured toasts to stderr
///
/// Toasts that stay open until dismissed are marked `(pinned)`; a terminal
/// line cannot dismiss itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    fn render(toast: &Toast) -> String {
        let label = match toast.level {
            ToastLevel::Info => "INFO".cyan().bold(),
            ToastLevel::Warning => "WARN".yellow().bold(),
            ToastLevel::Error => "ERROR".red().bold(),
        };
        let mut line = if toast.title.is_empty() {
            format!("[{}] {}", label, toast.message)
        } else {
            format!("[{}] {}: {}", label, toast.title.bold(), toast.message)
        };
        if !toast.options.auto_dismiss() {
            line.push_str(&format!(" {}", "(pinned)".dimmed()));
        }
        line
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, toast: &Toast) {
        eprintln!("{}", Self::render(toast));
    }
}

/// Notifier that keeps every toast in memory
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toasts shown so far, oldest first
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .map(|toasts| toasts.clone())
            .unwrap_or_default()
    }

    /// Toasts of one level
    pub fn of_level(&self, level: ToastLevel) -> Vec<Toast> {
        self.toasts()
            .into_iter()
            .filter(|toast| toast.level == level)
            .collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, toast: &Toast) {
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push(toast.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_constructors() {
        let toast = Toast::warning("empty", "Chunk 2");
        assert_eq!(toast.level, ToastLevel::Warning);
        assert_eq!(toast.message, "empty");
        assert_eq!(toast.title, "Chunk 2");
        assert_eq!(toast.options, ToastOptions::default());
    }

    #[test]
    fn test_sticky_options() {
        let toast = Toast::error("boom", "").with_options(ToastOptions::sticky());
        assert!(!toast.options.auto_dismiss());
        assert!(ToastOptions::default().auto_dismiss());
    }

    #[test]
    fn test_memory_notifier_records_in_order() {
        let notifier = MemoryNotifier::new();
        notifier.notify(&Toast::info("one", "t"));
        notifier.notify(&Toast::error("two", "t"));
        notifier.notify(&Toast::info("three", "t"));

        let messages: Vec<_> = notifier.toasts().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, vec!["one", "two", "three"]);
        assert_eq!(notifier.of_level(ToastLevel::Error).len(), 1);
    }

    #[test]
    fn test_terminal_render_contains_title_and_message() {
        colored::control::set_override(false);
        let rendered = TerminalNotifier::render(&Toast::info("Summary: hi", "Echo"));
        assert_eq!(rendered, "[INFO] Echo: Summary: hi");
        let untitled = TerminalNotifier::render(&Toast::warning("careful", ""));
        assert_eq!(untitled, "[WARN] careful");
    }

    #[test]
    fn test_terminal_render_marks_sticky_toasts() {
        colored::control::set_override(false);
        let toast = Toast::error("Chunk 2 of 3 failed", "Chat Summarizer")
            .with_options(ToastOptions::sticky());
        assert_eq!(
            TerminalNotifier::render(&toast),
            "[ERROR] Chat Summarizer: Chunk 2 of 3 failed (pinned)"
        );
    }

    #[test]
    fn test_level_display() {
        assert_eq!(ToastLevel::Info.to_string(), "info");
        assert_eq!(ToastLevel::Warning.to_string(), "warning");
        assert_eq!(ToastLevel::Error.to_string(), "error");
    }
}
