//! Windowing and prompt assembly

use crate::host::ChatMessage;

/// Separator between message texts inside a prompt and between window
/// summaries in the final output
pub const BLANK_LINE: &str = "\n\n";

/// Split the chat into contiguous windows of `chunk_size` messages
///
/// The last window may be shorter. A chunk size of zero is treated as one.
///
/// # Examples
///
/// ```
/// use chat_summarizer::host::ChatMessage;
/// use chat_summarizer::summarizer::chunk_windows;
///
/// let chat: Vec<_> = (0..5).map(|i| ChatMessage::new(i.to_string())).collect();
/// let sizes: Vec<_> = chunk_windows(&chat, 2).map(|w| w.len()).collect();
/// assert_eq!(sizes, vec![2, 2, 1]);
/// ```
pub fn chunk_windows(chat: &[ChatMessage], chunk_size: u32) -> std::slice::Chunks<'_, ChatMessage> {
    chat.chunks(effective_chunk_size(chunk_size))
}

/// Number of windows a chat of `len` messages splits into
pub fn window_count(len: usize, chunk_size: u32) -> usize {
    len.div_ceil(effective_chunk_size(chunk_size))
}

fn effective_chunk_size(chunk_size: u32) -> usize {
    (chunk_size as usize).max(1)
}

/// Build the generator prompt for one window
///
/// Message texts are joined with blank lines. A non-empty template is placed
/// before them, separated by a blank line.
pub fn build_prompt(window: &[ChatMessage], template: &str) -> String {
    let transcript = window
        .iter()
        .map(|message| message.text.as_str())
        .collect::<Vec<_>>()
        .join(BLANK_LINE);

    let template = template.trim();
    if template.is_empty() {
        transcript
    } else {
        format!("{}{}{}", template, BLANK_LINE, transcript)
    }
}
