//! Fix suggestions for llmctl errors.
//!
//! Maps error kinds to copy-paste ready commands plus a short explanation.

use std::path::Path;
use std::time::Duration;

use crate::util::time::format_duration;

// =============================================================================
// Fix Suggestion Types
// =============================================================================

/// A fix suggestion for an error.
#[derive(Debug, Clone)]
pub struct FixSuggestion {
    /// Fix commands in order of preference.
    /// These should be copy-paste ready for the terminal.
    pub commands: Vec<String>,

    /// Explanation of why this error occurred.
    pub context: String,

    /// Tips to prevent this error in the future.
    pub prevention: Option<String>,
}

impl FixSuggestion {
    /// Creates a new fix suggestion with required fields.
    #[must_use]
    pub fn new(commands: Vec<String>, context: impl Into<String>) -> Self {
        Self {
            commands,
            context: context.into(),
            prevention: None,
        }
    }

    /// Builder: adds prevention tips.
    #[must_use]
    pub fn with_prevention(mut self, prevention: impl Into<String>) -> Self {
        self.prevention = Some(prevention.into());
        self
    }
}

// =============================================================================
// Suggestion Generators
// =============================================================================

#[must_use]
pub fn missing_prompt_suggestions() -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec![
            "llmctl \"your prompt\"".to_string(),
            "cat file.txt | llmctl \"summarize\"".to_string(),
        ],
        "A prompt must come from the command line or from piped stdin.",
    )]
}

#[must_use]
pub fn context_read_suggestions(path: &Path) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec![format!("ls -l {}", path.display())],
        format!(
            "The context file {} does not exist or is not readable.",
            path.display()
        ),
    )]
}

#[must_use]
pub fn config_parse_suggestions(path: &str, message: &str) -> Vec<FixSuggestion> {
    vec![
        FixSuggestion::new(
            vec![format!("$EDITOR {path}")],
            format!("The config file could not be parsed: {message}"),
        )
        .with_prevention("Set LLMCTL_CONFIG to point at a different file while fixing it."),
    ]
}

#[must_use]
pub fn config_invalid_suggestions(key: &str, value: &str, message: &str) -> Vec<FixSuggestion> {
    let example = match key {
        "timeout" => "llmctl --timeout 2m \"your prompt\"",
        "tail" => "llmctl --tail 8000 --context notes.md \"your prompt\"",
        _ => "llmctl --help",
    };
    vec![FixSuggestion::new(
        vec![example.to_string()],
        format!("'{value}' is not a valid value for {key}: {message}"),
    )]
}

#[must_use]
pub fn timeout_suggestions(timeout: Duration) -> Vec<FixSuggestion> {
    vec![
        FixSuggestion::new(
            vec![format!(
                "llmctl --timeout {} \"your prompt\"",
                format_duration(timeout.saturating_mul(2))
            )],
            format!(
                "The completion did not finish within {}.",
                format_duration(timeout)
            ),
        )
        .with_prevention("Raise the default with `timeout` in the config file."),
    ]
}

#[must_use]
pub fn network_suggestions() -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec!["echo $OPENAI_BASE_URL".to_string()],
        "The completion endpoint could not be reached. Check the base URL and your connection.",
    )]
}

#[must_use]
pub fn api_error_suggestions(status: Option<u16>) -> Vec<FixSuggestion> {
    match status {
        Some(401 | 403) => vec![FixSuggestion::new(
            vec!["export OPENAI_API_KEY=sk-...".to_string()],
            "The API rejected the credentials.",
        )],
        Some(404) => vec![FixSuggestion::new(
            vec!["llmctl --model <name> \"your prompt\"".to_string()],
            "The model or endpoint was not found. Check --model and --base-url.",
        )],
        _ => Vec::new(),
    }
}

#[must_use]
pub fn state_dir_suggestions() -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec!["export XDG_STATE_HOME=\"$HOME/.local/state\"".to_string()],
        "No home directory is available to hold the token counter.",
    )]
}
