//! Error types for llmctl.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! - **Usage**: missing prompt, unreadable context file or stdin (exit 2)
//! - **Configuration**: invalid config file or flag values (exit 2)
//! - **Network**: connection failures and timeouts (exit 1)
//! - **Api**: non-success responses and in-stream API errors (exit 1)
//! - **Storage**: counter file and state directory failures (exit 1)
//!
//! Each error has a stable error code (e.g., `LLMCTL-U001`) for scripts that
//! want to branch on the failure kind.

pub mod suggestions;

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::util::time::format_duration;

pub use suggestions::FixSuggestion;

// =============================================================================
// Error Categories
// =============================================================================

/// High-level error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The invocation itself is wrong (missing prompt, unreadable inputs).
    Usage,
    /// Config file or flag values are invalid.
    Configuration,
    /// Transport failures talking to the completion API.
    Network,
    /// The completion API rejected the request or failed mid-stream.
    Api,
    /// Counter store and state directory failures.
    Storage,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Usage => "Usage error",
            Self::Configuration => "Configuration error",
            Self::Network => "Network error",
            Self::Api => "API error",
            Self::Storage => "Storage error",
        }
    }

    /// Returns a short code prefix for this category.
    #[must_use]
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            Self::Usage => "U",
            Self::Configuration => "C",
            Self::Network => "N",
            Self::Api => "P",
            Self::Storage => "S",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Request/stream failure, counter load or reset failure
    GeneralError = 1,
    /// Missing prompt, unreadable inputs, invalid configuration
    UsageError = 2,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as Self
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

/// Main error type for llmctl operations.
#[derive(Error, Debug)]
pub enum LlmctlError {
    // ==========================================================================
    // Usage errors
    // ==========================================================================
    /// Neither piped stdin nor argument text was supplied.
    #[error("no prompt supplied (pass prompt text or pipe input on stdin)")]
    MissingPrompt,

    /// The `--context` file could not be read.
    #[error("cannot read context file {path}: {source}")]
    ContextRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Piped stdin could not be read.
    #[error("cannot read stdin: {0}")]
    StdinRead(#[source] std::io::Error),

    // ==========================================================================
    // Configuration errors
    // ==========================================================================
    /// Error parsing the configuration file.
    #[error("config parse error at {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Invalid configuration value.
    #[error("invalid config value for '{key}': {message}")]
    ConfigInvalid {
        key: String,
        value: String,
        message: String,
    },

    // ==========================================================================
    // Network errors
    // ==========================================================================
    /// Request did not complete within the configured timeout.
    #[error("request timeout after {}", format_duration(*.0))]
    Timeout(Duration),

    /// Connection or transport failure.
    #[error("network error: {0}")]
    Network(String),

    // ==========================================================================
    // API errors
    // ==========================================================================
    /// The completion API answered with a non-success status.
    #[error("API error{}: {message}", status_suffix(.status))]
    Api {
        status: Option<u16>,
        message: String,
    },

    /// The response stream broke or carried an error payload.
    #[error("stream error: {0}")]
    Stream(String),

    // ==========================================================================
    // Storage errors
    // ==========================================================================
    /// Neither a state-home override nor a home directory is available.
    #[error("cannot resolve state directory: no home directory and XDG_STATE_HOME unset")]
    HomeDirUnavailable,

    /// Counter file could not be read or written.
    #[error("counter store error at {path}: {source}")]
    CounterIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmctlError {
    /// Map error to process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self.category() {
            ErrorCategory::Usage | ErrorCategory::Configuration => ExitCode::UsageError,
            ErrorCategory::Network | ErrorCategory::Api | ErrorCategory::Storage => {
                ExitCode::GeneralError
            }
        }
    }

    /// Returns the error category for classification.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingPrompt | Self::ContextRead { .. } | Self::StdinRead(_) => {
                ErrorCategory::Usage
            }

            Self::ConfigParse { .. } | Self::ConfigInvalid { .. } => ErrorCategory::Configuration,

            Self::Timeout(_) | Self::Network(_) => ErrorCategory::Network,

            Self::Api { .. } | Self::Stream(_) => ErrorCategory::Api,

            Self::HomeDirUnavailable | Self::CounterIo { .. } | Self::Io(_) | Self::Json(_) => {
                ErrorCategory::Storage
            }
        }
    }

    /// Returns a stable error code for programmatic handling.
    ///
    /// Format: `LLMCTL-{category}{number}`.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingPrompt => "LLMCTL-U001",
            Self::ContextRead { .. } => "LLMCTL-U002",
            Self::StdinRead(_) => "LLMCTL-U003",

            Self::ConfigParse { .. } => "LLMCTL-C001",
            Self::ConfigInvalid { .. } => "LLMCTL-C002",

            Self::Timeout(_) => "LLMCTL-N001",
            Self::Network(_) => "LLMCTL-N099",

            Self::Api { .. } => "LLMCTL-P001",
            Self::Stream(_) => "LLMCTL-P002",

            Self::HomeDirUnavailable => "LLMCTL-S001",
            Self::CounterIo { .. } => "LLMCTL-S002",
            Self::Io(_) => "LLMCTL-S003",
            Self::Json(_) => "LLMCTL-S004",
        }
    }

    /// Returns actionable fix suggestions for this error.
    #[must_use]
    pub fn fix_suggestions(&self) -> Vec<FixSuggestion> {
        match self {
            Self::MissingPrompt => suggestions::missing_prompt_suggestions(),
            Self::ContextRead { path, .. } => suggestions::context_read_suggestions(path),
            Self::ConfigParse { path, message } => {
                suggestions::config_parse_suggestions(path, message)
            }
            Self::ConfigInvalid { key, value, message } => {
                suggestions::config_invalid_suggestions(key, value, message)
            }
            Self::Timeout(elapsed) => suggestions::timeout_suggestions(*elapsed),
            Self::Network(_) => suggestions::network_suggestions(),
            Self::Api { status, .. } => suggestions::api_error_suggestions(*status),
            Self::HomeDirUnavailable => suggestions::state_dir_suggestions(),
            Self::StdinRead(_)
            | Self::Stream(_)
            | Self::CounterIo { .. }
            | Self::Io(_)
            | Self::Json(_) => Vec::new(),
        }
    }
}

#[allow(clippy::ref_option)]
fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Result type alias for llmctl operations.
pub type Result<T> = std::result::Result<T, LlmctlError>;
