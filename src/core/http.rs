//! HTTP client construction.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

use crate::error::{LlmctlError, Result};

/// Build a client whose `timeout` bounds the whole request, body included.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client(timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .user_agent(user_agent())
        .build()
        .map_err(|e| LlmctlError::Network(e.to_string()))
}

/// `llmctl/<version>`.
#[must_use]
pub fn user_agent() -> String {
    format!("llmctl/{}", env!("CARGO_PKG_VERSION"))
}

/// Map a reqwest failure to the crate error, distinguishing timeouts.
#[must_use]
pub fn classify(err: &reqwest::Error, timeout: Duration) -> LlmctlError {
    if err.is_timeout() {
        LlmctlError::Timeout(timeout)
    } else {
        LlmctlError::Network(describe(err))
    }
}

/// Error text including the source chain; reqwest's top-level message alone
/// ("error sending request") rarely says what went wrong.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_carries_version() {
        assert_eq!(
            user_agent(),
            format!("llmctl/{}", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn build_client_succeeds() {
        assert!(build_client(Duration::from_secs(5)).is_ok());
    }
}
