//! Test utilities for llmctl.
//!
//! Provides SSE body builders for mock completion servers, counter and
//! config fixtures, and an isolated temporary directory helper.
//!
//! # Usage
//!
//! ```rust,ignore
//! use llmctl::test_utils::*;
//!
//! let body = sse_body(&["Hel", "lo"], Some((10, 5)));
//! let dir = TestDir::new();
//! let paths = dir.app_paths();
//! ```

use std::fs;
use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::storage::paths::AppPaths;

// =============================================================================
// SSE Fixtures
// =============================================================================

/// Frame one JSON payload as an SSE event.
#[must_use]
pub fn sse_event(payload: &serde_json::Value) -> String {
    format!("data: {payload}\n\n")
}

/// A chunk carrying one text delta.
#[must_use]
pub fn make_test_text_chunk(text: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion.chunk",
        "model": "test-model",
        "choices": [{
            "index": 0,
            "delta": { "content": text },
            "finish_reason": null
        }],
        "usage": null
    })
}

/// The trailing usage-only chunk sent when `include_usage` is requested.
#[must_use]
pub fn make_test_usage_chunk(prompt: u64, completion: u64) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion.chunk",
        "model": "test-model",
        "choices": [],
        "usage": {
            "prompt_tokens": prompt,
            "completion_tokens": completion,
            "total_tokens": prompt + completion
        }
    })
}

/// A complete streamed response: a role chunk, one chunk per delta, a
/// finish chunk, an optional usage chunk and `[DONE]`.
#[must_use]
pub fn sse_body(deltas: &[&str], usage: Option<(u64, u64)>) -> String {
    let mut body = sse_event(&json!({
        "id": "chatcmpl-test",
        "choices": [{ "index": 0, "delta": { "role": "assistant" }, "finish_reason": null }]
    }));

    for delta in deltas {
        body.push_str(&sse_event(&make_test_text_chunk(delta)));
    }

    body.push_str(&sse_event(&json!({
        "id": "chatcmpl-test",
        "choices": [{ "index": 0, "delta": {}, "finish_reason": "stop" }]
    })));

    if let Some((prompt, completion)) = usage {
        body.push_str(&sse_event(&make_test_usage_chunk(prompt, completion)));
    }

    body.push_str("data: [DONE]\n\n");
    body
}

/// An API error envelope as returned in a non-2xx body or inline in a
/// stream.
#[must_use]
pub fn make_test_api_error(message: &str, kind: &str) -> serde_json::Value {
    json!({ "error": { "message": message, "type": kind } })
}

// =============================================================================
// File Fixtures
// =============================================================================

/// Counter file contents as written by the store.
#[must_use]
pub fn make_test_counter_json(prompt: u64, completion: u64) -> String {
    format!(
        "{{\n  \"promptTokens\": {prompt},\n  \"completionTokens\": {completion},\n  \"totalTokens\": {}\n}}\n",
        prompt + completion
    )
}

/// A config file setting every supported default.
#[must_use]
pub fn make_test_config_toml() -> String {
    r#"[defaults]
model = "file-model"
system = "Be terse."
base_url = "http://localhost:11434/v1"
timeout = "2m"
tail = 8000
"#
    .to_string()
}

// =============================================================================
// Temporary Directory Helper
// =============================================================================

/// An isolated temporary directory, removed on drop.
///
/// ```rust,ignore
/// use llmctl::test_utils::TestDir;
///
/// let dir = TestDir::new();
/// dir.create_file("notes.md", "some context");
/// assert!(dir.file_exists("notes.md"));
/// ```
pub struct TestDir {
    inner: tempfile::TempDir,
}

impl TestDir {
    /// Create a new isolated temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: tempfile::tempdir().expect("Failed to create temp directory"),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// State and config directories rooted here.
    #[must_use]
    pub fn app_paths(&self) -> AppPaths {
        AppPaths::under(self.inner.path())
    }

    /// Create a file with the given content, creating parent directories.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be created or written.
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.inner.path().join(name);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        let mut file = fs::File::create(&path).expect("Failed to create test file");
        file.write_all(content.as_bytes())
            .expect("Failed to write test file");
    }

    /// Create a subdirectory.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be created.
    pub fn create_dir(&self, name: &str) {
        fs::create_dir_all(self.inner.path().join(name)).expect("Failed to create test directory");
    }

    /// Read a file from the temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read_file(&self, name: &str) -> io::Result<String> {
        fs::read_to_string(self.inner.path().join(name))
    }

    #[must_use]
    pub fn file_exists(&self, name: &str) -> bool {
        self.inner.path().join(name).exists()
    }

    #[must_use]
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.inner.path().join(name)
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

/// Check if a string contains ANSI escape sequences.
#[must_use]
pub fn has_ansi_codes(text: &str) -> bool {
    text.contains('\x1b')
}
