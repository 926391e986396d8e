//! Counter output for `llmctl counter`.

use crate::error::Result;
use crate::storage::counter::UsageCounter;

/// `prompt=<p> completion=<c> total=<t>`, without a trailing newline.
#[must_use]
pub fn render_text(counter: &UsageCounter) -> String {
    format!(
        "prompt={} completion={} total={}",
        counter.prompt_tokens(),
        counter.completion_tokens(),
        counter.total_tokens()
    )
}

/// The record as pretty JSON, same shape as the counter file.
///
/// # Errors
///
/// Returns error if serialization fails.
pub fn render_json(counter: &UsageCounter) -> Result<String> {
    Ok(serde_json::to_string_pretty(counter)?)
}
