//! Error rendering for stderr.
//!
//! Plain output is `Error [CODE]: message` followed by at most one `Fix:`
//! line. With `--json-output` the error is a single JSON object so that the
//! whole stderr stream stays machine-readable.

use colored::Colorize;
use serde::Serialize;

use crate::error::{FixSuggestion, LlmctlError};

/// Render an error for stderr.
#[must_use]
pub fn render_error(error: &LlmctlError, json: bool, color: bool) -> String {
    if json {
        render_error_json(error)
    } else {
        render_simple(error, color)
    }
}

/// Render an error as one line of JSON.
#[must_use]
pub fn render_error_json(error: &LlmctlError) -> String {
    serde_json::to_string(&ErrorJson::from_error(error))
        .unwrap_or_else(|_| render_simple(error, false))
}

fn render_simple(error: &LlmctlError, color: bool) -> String {
    let mut lines = Vec::new();

    let header = format!("Error [{}]:", error.error_code());
    if color {
        lines.push(format!("{} {error}", header.red().bold()));
    } else {
        lines.push(format!("{header} {error}"));
    }

    if let Some(cmd) = first_command(&error.fix_suggestions()) {
        if color {
            lines.push(format!("{} {cmd}", "Fix:".cyan()));
        } else {
            lines.push(format!("Fix: {cmd}"));
        }
    }

    lines.join("\n")
}

/// First suggested command that is not a shell comment.
fn first_command(suggestions: &[FixSuggestion]) -> Option<&str> {
    suggestions
        .first()?
        .commands
        .iter()
        .map(String::as_str)
        .find(|cmd| !cmd.starts_with('#'))
}

#[derive(Serialize)]
struct ErrorJson {
    error_code: &'static str,
    category: &'static str,
    message: String,
    exit_code: i32,
    suggestions: Vec<SuggestionJson>,
}

#[derive(Serialize)]
struct SuggestionJson {
    commands: Vec<String>,
    context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prevention: Option<String>,
}

impl ErrorJson {
    fn from_error(error: &LlmctlError) -> Self {
        Self {
            error_code: error.error_code(),
            category: error.category().description(),
            message: error.to_string(),
            exit_code: error.exit_code().into(),
            suggestions: error
                .fix_suggestions()
                .into_iter()
                .map(|s| SuggestionJson {
                    commands: s.commands,
                    context: s.context,
                    prevention: s.prevention,
                })
                .collect(),
        }
    }
}
