//! Prompt assembly from arguments, piped stdin and a context file tail.

use std::io::Read;

use crate::core::types::ChatMessage;
use crate::error::{LlmctlError, Result};
use crate::util::env::stdin_is_tty;

/// Join positional arguments with single spaces and trim.
#[must_use]
pub fn prompt_from_args(args: &[String]) -> String {
    args.join(" ").trim().to_string()
}

/// Read all of stdin when it is piped. A terminal yields an empty string
/// without blocking.
///
/// # Errors
///
/// Returns [`LlmctlError::StdinRead`] if reading fails.
pub fn read_piped_stdin() -> Result<String> {
    if stdin_is_tty() {
        return Ok(String::new());
    }
    read_all(std::io::stdin().lock())
}

/// Read a reader to the end, replacing invalid UTF-8.
///
/// # Errors
///
/// Returns [`LlmctlError::StdinRead`] if reading fails.
pub fn read_all(mut reader: impl Read) -> Result<String> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(LlmctlError::StdinRead)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// The last `max` characters of `text`. `max == 0` keeps everything.
#[must_use]
pub fn tail_chars(text: &str, max: usize) -> &str {
    if max == 0 {
        return text;
    }
    match text.char_indices().rev().nth(max - 1) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

/// Build the user message from its parts. Each section appears only when
/// it has content.
#[must_use]
pub fn assemble(context_tail: &str, stdin: &str, prompt: &str) -> String {
    let mut out = String::new();

    if !context_tail.is_empty() {
        out.push_str("CONTEXT (tail):\n");
        out.push_str(context_tail);
        out.push_str("\n\n");
    }

    if !stdin.trim().is_empty() {
        out.push_str("STDIN:\n");
        out.push_str(stdin);
        out.push_str("\n\n");
    }

    if !prompt.trim().is_empty() {
        out.push_str("PROMPT:\n");
        out.push_str(prompt);
    }

    out
}

/// Optional system message followed by the user message.
#[must_use]
pub fn build_messages(system: Option<&str>, user: String) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system.filter(|s| !s.trim().is_empty()) {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(user));
    messages
}
