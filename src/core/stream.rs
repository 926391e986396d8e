//! SSE stream decoding for the Chat Completions API.
//!
//! [`SseDecoder`] turns arbitrary byte chunks into complete event payloads;
//! [`parse_data`] turns one payload into [`StreamEvent`]s. Events are split
//! on blank lines, so a multi-byte character cut across network chunks is
//! only decoded once its event is complete.

use serde_json::Value;

use crate::core::types::{ApiErrorEnvelope, ApiUsage, StreamChunk};
use crate::error::{LlmctlError, Result};

/// Maximum size for the pending buffer before we abort the stream.
const MAX_BUF: usize = 16 * 1024 * 1024; // 16 MiB

/// A decoded stream event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental assistant text.
    TextDelta(String),
    /// Usage reported by the API (usually in the last chunk).
    Usage(ApiUsage),
    /// The `[DONE]` sentinel.
    Done,
}

/// Incremental SSE decoder.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
}

impl SseDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes; returns the `data` payload of every event completed by
    /// them.
    ///
    /// # Errors
    ///
    /// Returns [`LlmctlError::Stream`] if an event grows beyond 16 MiB.
    pub fn push(&mut self, bytes: &[u8]) -> Result<Vec<String>> {
        // CR only ever appears as part of a line ending in practice.
        self.buf.extend(bytes.iter().copied().filter(|&b| b != b'\r'));

        if self.buf.len() > MAX_BUF {
            self.buf.clear();
            return Err(LlmctlError::Stream(
                "SSE stream buffer exceeded 16 MiB".to_string(),
            ));
        }

        let mut payloads = Vec::new();
        while let Some(pos) = self.buf.windows(2).position(|w| w == b"\n\n") {
            let event: Vec<u8> = self.buf.drain(..pos + 2).collect();
            if let Some(data) = extract_data(&String::from_utf8_lossy(&event)) {
                payloads.push(data);
            }
        }
        Ok(payloads)
    }

    /// Flush a final event that was not terminated by a blank line.
    pub fn finish(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let event = std::mem::take(&mut self.buf);
        extract_data(&String::from_utf8_lossy(&event))
    }
}

/// Join the `data:` lines of one event. Comments and other fields are
/// ignored; an event without data yields `None`.
fn extract_data(event: &str) -> Option<String> {
    let lines: Vec<&str> = event
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Parse a single data payload into zero or more events.
///
/// # Errors
///
/// Returns [`LlmctlError::Stream`] when the payload is not JSON or carries
/// an API error object.
pub fn parse_data(data: &str) -> Result<Vec<StreamEvent>> {
    let data = data.trim();
    if data == "[DONE]" {
        return Ok(vec![StreamEvent::Done]);
    }

    let value: Value = serde_json::from_str(data)
        .map_err(|e| LlmctlError::Stream(format!("malformed chunk: {e}")))?;

    if value.get("error").is_some_and(|e| !e.is_null()) {
        let message = serde_json::from_value::<ApiErrorEnvelope>(value.clone())
            .map(|env| env.error.describe())
            .unwrap_or_else(|_| value["error"].to_string());
        return Err(LlmctlError::Stream(message));
    }

    let chunk: StreamChunk = serde_json::from_value(value)
        .map_err(|e| LlmctlError::Stream(format!("unexpected chunk shape: {e}")))?;

    let mut events = Vec::new();

    if let Some(text) = chunk
        .choices
        .first()
        .and_then(|choice| choice.delta.content.as_ref())
        .filter(|text| !text.is_empty())
    {
        events.push(StreamEvent::TextDelta(text.clone()));
    }

    if let Some(usage) = chunk.usage {
        events.push(StreamEvent::Usage(usage));
    }

    Ok(events)
}
