//! Chat summarizer
//!
//! Splits the conversation into fixed-size windows and summarizes each one
//! through the configured provider, one window at a time.

pub mod chunk;
pub mod runner;

pub use chunk::{build_prompt, chunk_windows, window_count};
pub use runner::{ChatSummarizer, ChunkOutcome, SummaryOptions, SummaryReport};
