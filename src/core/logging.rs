//! Diagnostic logging to stderr.
//!
//! Stdout carries only model output and counter values, so every log line
//! goes to stderr (or to `LLMCTL_LOG_FILE` when set).

use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::util::env::EnvSource;

pub const LOG_LEVEL_ENV: &str = "LLMCTL_LOG";
pub const LOG_FORMAT_ENV: &str = "LLMCTL_LOG_FORMAT";
pub const LOG_FILE_ENV: &str = "LLMCTL_LOG_FILE";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable logs.
    #[default]
    Human,
    /// JSON logs (one event per line).
    Json,
    /// Compact logs (single line, terse).
    Compact,
}

impl LogFormat {
    /// Parse from string (case-insensitive).
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

/// Log level from CLI argument or environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    #[default]
    Error,
}

impl LogLevel {
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "verbose" | "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Parse log level from `LLMCTL_LOG`.
#[must_use]
pub fn parse_log_level_from_env(env: &dyn EnvSource) -> Option<LogLevel> {
    env.non_empty(LOG_LEVEL_ENV)
        .and_then(|value| LogLevel::from_arg(&value))
}

/// Parse log format from `LLMCTL_LOG_FORMAT`.
#[must_use]
pub fn parse_log_format_from_env(env: &dyn EnvSource) -> Option<LogFormat> {
    env.non_empty(LOG_FORMAT_ENV)
        .and_then(|value| LogFormat::from_arg(&value))
}

/// Parse log file path from `LLMCTL_LOG_FILE`.
#[must_use]
pub fn parse_log_file_from_env(env: &dyn EnvSource) -> Option<PathBuf> {
    env.non_empty(LOG_FILE_ENV).map(PathBuf::from)
}

/// Settings derived from flags and environment, flags winning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LogLevel,
    pub format: LogFormat,
    pub file: Option<PathBuf>,
    pub verbose: bool,
}

impl LogSettings {
    /// Combine `--log-level`, `--json-output` and `-v` with the
    /// `LLMCTL_LOG*` variables. An unrecognized `--log-level` falls back to
    /// the environment.
    #[must_use]
    pub fn resolve(
        log_level: Option<&str>,
        json_output: bool,
        verbose: bool,
        env: &dyn EnvSource,
    ) -> Self {
        let level = log_level
            .and_then(LogLevel::from_arg)
            .or_else(|| parse_log_level_from_env(env))
            .unwrap_or_default();
        let format = if json_output {
            LogFormat::Json
        } else {
            parse_log_format_from_env(env).unwrap_or_default()
        };

        Self {
            level,
            format,
            file: parse_log_file_from_env(env),
            verbose,
        }
    }

    /// Level after applying `-v`.
    #[must_use]
    pub const fn effective_level(&self) -> LogLevel {
        if self.verbose && matches!(self.level, LogLevel::Error | LogLevel::Warn) {
            LogLevel::Debug
        } else {
            self.level
        }
    }
}

/// Initialize the global subscriber. Safe to call more than once; later
/// calls are ignored.
pub fn init(settings: &LogSettings) {
    let level = settings.effective_level();

    let file = settings.file.as_ref().and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    let make_writer = |file: Option<&std::fs::File>| -> BoxMakeWriter {
        if let Some(file) = file.and_then(|inner| inner.try_clone().ok()) {
            BoxMakeWriter::new(file)
        } else {
            BoxMakeWriter::new(std::io::stderr)
        }
    };

    let filter = EnvFilter::new(format!("llmctl={}", level.as_filter()));
    let writer = make_writer(file.as_ref());

    match settings.format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_writer(writer)
                .with_span_events(FmtSpan::CLOSE)
                .try_init()
                .ok();
        }
        LogFormat::Compact => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .compact()
                .with_writer(writer)
                .with_target(true)
                .try_init()
                .ok();
        }
        LogFormat::Human => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_target(false)
                .without_time()
                .try_init()
                .ok();
        }
    }
}
