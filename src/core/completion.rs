//! Streaming chat completion client.

use std::io::Write;
use std::time::Duration;

use futures::StreamExt;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::{debug, instrument};

use crate::core::http::{build_client, classify};
use crate::core::stream::{SseDecoder, StreamEvent, parse_data};
use crate::core::types::{ApiErrorEnvelope, ApiUsage, ChatMessage, ChatRequest, StreamOptions};
use crate::error::{LlmctlError, Result};
use crate::storage::config::ResolvedConfig;

/// Longest raw error body quoted back to the user.
const MAX_ERROR_BODY: usize = 512;

/// Result of a completed stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// Full assistant text as streamed.
    pub text: String,
    /// Usage reported by the backend, if any.
    pub usage: Option<ApiUsage>,
}

/// Client for one OpenAI-compatible endpoint.
pub struct CompletionClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl CompletionClient {
    /// Build a client from resolved settings.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new(config: &ResolvedConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout)?,
            endpoint: completions_url(&config.base_url),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));

        if let Some(key) = &self.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| {
                LlmctlError::ConfigInvalid {
                    key: "OPENAI_API_KEY".to_string(),
                    value: "[REDACTED]".to_string(),
                    message: "API key contains invalid header characters".to_string(),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Stream a completion for `messages`, writing and flushing each text
    /// delta to `out` as it arrives.
    ///
    /// Text already written stays written if the stream later fails.
    ///
    /// # Errors
    ///
    /// - [`LlmctlError::Api`] for a non-success status
    /// - [`LlmctlError::Stream`] for an error or malformed chunk mid-stream
    /// - [`LlmctlError::Network`] / [`LlmctlError::Timeout`] for transport failures
    /// - [`LlmctlError::Io`] if writing to `out` fails
    #[instrument(skip_all, fields(model = %self.model))]
    pub async fn stream_to<W: Write>(
        &self,
        messages: &[ChatMessage],
        out: &mut W,
    ) -> Result<CompletionOutcome> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: true,
            stream_options: StreamOptions {
                include_usage: true,
            },
        };

        debug!(endpoint = %self.endpoint, messages = messages.len(), "Sending completion request");

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await
            .map_err(|e| classify(&e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        let mut outcome = CompletionOutcome::default();
        let mut decoder = SseDecoder::new();
        let mut bytes = response.bytes_stream();
        let mut done = false;

        while !done {
            let Some(chunk) = bytes.next().await else {
                break;
            };
            let chunk = chunk.map_err(|e| classify(&e, self.timeout))?;
            for data in decoder.push(&chunk)? {
                if apply(&data, &mut outcome, out)? {
                    done = true;
                    break;
                }
            }
        }

        if !done && let Some(data) = decoder.finish() {
            apply(&data, &mut outcome, out)?;
        }

        if !outcome.text.is_empty() && !outcome.text.ends_with('\n') {
            out.write_all(b"\n")?;
            out.flush()?;
        }

        debug!(
            chars = outcome.text.chars().count(),
            usage = ?outcome.usage,
            "Completion finished"
        );

        Ok(outcome)
    }
}

/// Handle one data payload. Returns `true` on `[DONE]`.
fn apply<W: Write>(data: &str, outcome: &mut CompletionOutcome, out: &mut W) -> Result<bool> {
    for event in parse_data(data)? {
        match event {
            StreamEvent::TextDelta(text) => {
                out.write_all(text.as_bytes())?;
                out.flush()?;
                outcome.text.push_str(&text);
            }
            StreamEvent::Usage(usage) => outcome.usage = Some(usage),
            StreamEvent::Done => return Ok(true),
        }
    }
    Ok(false)
}

/// `{base}/chat/completions`, ignoring a trailing slash on the base.
#[must_use]
pub fn completions_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    format!("{base}/chat/completions")
}

/// Build an API error from a non-success response body.
fn api_error(status: u16, body: &str) -> LlmctlError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body).map_or_else(
        |_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response body".to_string()
            } else {
                truncate(trimmed, MAX_ERROR_BODY)
            }
        },
        |env| env.error.describe(),
    );

    LlmctlError::Api {
        status: Some(status),
        message,
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
