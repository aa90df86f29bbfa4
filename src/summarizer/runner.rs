//! Sequential chunked summarization
//!
//! One generator call per window, strictly in chat order, each awaited
//! before the next starts. A window that fails or comes back empty is
//! reported and skipped; the run continues with the next window.

use super::chunk::{build_prompt, chunk_windows, window_count, BLANK_LINE};
use crate::error::{Result, SummarizerError};
use crate::host::{ChatMessage, Notifier, Toast, ToastOptions};
use crate::providers::{GenerationOptions, Provider};
use crate::settings::SettingsRecord;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub(crate) const TOAST_TITLE: &str = "Chat Summarizer";
pub(crate) const ALREADY_RUNNING: &str = "A summary is already being generated";

/// Report a rejected concurrent run and build the error returned for it
pub(crate) fn reject_concurrent_run(notifier: &dyn Notifier) -> SummarizerError {
    tracing::warn!("{}", ALREADY_RUNNING);
    notifier.notify(&Toast::warning(ALREADY_RUNNING, TOAST_TITLE));
    SummarizerError::AlreadyRunning
}

/// Parameters of one summarize run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Messages per window
    pub chunk_size: u32,
    /// Prompt template placed before each window's transcript
    pub prompt: String,
    /// Options forwarded to every generator call
    pub generation: GenerationOptions,
}

impl SummaryOptions {
    /// Options taken from the stored settings
    pub fn from_record(record: &SettingsRecord) -> Self {
        Self {
            chunk_size: record.chunk_size,
            prompt: record.rendered_prompt(),
            generation: GenerationOptions {
                response_length: record.response_length,
            },
        }
    }
}

/// Result of one window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// The generator returned this text
    Summary(String),
    /// The generator returned nothing usable
    Empty,
    /// The generator call failed with this message
    Failed(String),
}

impl ChunkOutcome {
    /// Summary text, if this window produced one
    pub fn summary(&self) -> Option<&str> {
        match self {
            Self::Summary(text) => Some(text),
            _ => None,
        }
    }
}

/// What a summarize run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryReport {
    /// Successful window summaries joined by blank lines; `None` when no
    /// window produced text
    pub summary: Option<String>,
    /// Outcome per processed window, in window order
    pub outcomes: Vec<ChunkOutcome>,
    /// Number of windows the chat split into
    pub windows: usize,
    /// Whether the run stopped early because it was cancelled
    pub cancelled: bool,
}

impl SummaryReport {
    /// Number of generator calls that completed
    pub fn generator_calls(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of windows that produced a summary
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.summary().is_some()).count()
    }

    fn finish(outcomes: Vec<ChunkOutcome>, windows: usize, cancelled: bool) -> Self {
        let parts: Vec<&str> = outcomes.iter().filter_map(ChunkOutcome::summary).collect();
        let summary = if parts.is_empty() {
            None
        } else {
            Some(parts.join(BLANK_LINE))
        };
        Self {
            summary,
            outcomes,
            windows,
            cancelled,
        }
    }
}

/// Summarizes a chat through an external generator
///
/// Only one run may be in flight at a time; a second request while a run is
/// active is rejected with [`SummarizerError::AlreadyRunning`].
pub struct ChatSummarizer {
    provider: Arc<dyn Provider>,
    notifier: Arc<dyn Notifier>,
    running: AtomicBool,
}

impl ChatSummarizer {
    pub fn new(provider: Arc<dyn Provider>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            provider,
            notifier,
            running: AtomicBool::new(false),
        }
    }

    /// Whether a run is in flight
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Summarize `chat` in windows of `chunk_size` messages
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRunning` if another run is in flight. Generator
    /// failures never surface here; they are recorded per window.
    pub async fn summarize(
        &self,
        chat: &[ChatMessage],
        chunk_size: u32,
        prompt_template: &str,
    ) -> Result<SummaryReport> {
        let options = SummaryOptions {
            chunk_size,
            prompt: prompt_template.to_string(),
            generation: GenerationOptions::default(),
        };
        self.summarize_with(chat, &options, &CancellationToken::new())
            .await
    }

    /// Summarize with full options and a cancellation token
    ///
    /// Cancellation is checked before each window and while waiting for the
    /// generator; a cancelled run keeps the summaries produced so far.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRunning` if another run is in flight
    pub async fn summarize_with(
        &self,
        chat: &[ChatMessage],
        options: &SummaryOptions,
        cancel: &CancellationToken,
    ) -> Result<SummaryReport> {
        let _guard = RunGuard::acquire(&self.running)
            .ok_or_else(|| reject_concurrent_run(self.notifier.as_ref()))?;

        if chat.is_empty() {
            tracing::debug!("No messages in chat");
            return Ok(SummaryReport::default());
        }

        let windows = window_count(chat.len(), options.chunk_size);
        tracing::info!(
            "Summarizing {} messages in {} chunks of up to {}",
            chat.len(),
            windows,
            options.chunk_size.max(1)
        );

        let mut outcomes = Vec::with_capacity(windows);
        let mut cancelled = false;

        for (index, window) in chunk_windows(chat, options.chunk_size).enumerate() {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let chunk_no = index + 1;
            let prompt = build_prompt(window, &options.prompt);
            tracing::debug!(
                "Chunk {}/{}: {} messages, {} prompt bytes",
                chunk_no,
                windows,
                window.len(),
                prompt.len()
            );

            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                result = self.provider.generate(&prompt, options.generation) => result,
            };

            let outcome = match result {
                Ok(text) if text.trim().is_empty() => {
                    tracing::warn!("Chunk {}/{} returned an empty summary", chunk_no, windows);
                    self.notifier.notify(&Toast::warning(
                        format!("Chunk {} of {} returned an empty summary", chunk_no, windows),
                        TOAST_TITLE,
                    ));
                    ChunkOutcome::Empty
                }
                Ok(text) => ChunkOutcome::Summary(text),
                Err(e) => {
                    tracing::error!("Chunk {}/{} failed: {:#}", chunk_no, windows, e);
                    self.notifier.notify(
                        &Toast::error(
                            format!("Chunk {} of {} failed: {}", chunk_no, windows, e),
                            TOAST_TITLE,
                        )
                        .with_options(ToastOptions::sticky()),
                    );
                    ChunkOutcome::Failed(e.to_string())
                }
            };
            outcomes.push(outcome);
        }

        if cancelled {
            tracing::info!(
                "Summarize run cancelled after {} of {} chunks",
                outcomes.len(),
                windows
            );
        }

        let report = SummaryReport::finish(outcomes, windows, cancelled);
        tracing::info!(
            "Summarize run finished: {}/{} chunks summarized",
            report.succeeded(),
            windows
        );
        Ok(report)
    }
}

/// Marks a run as active for as long as it is held
struct RunGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
