//! Shared fixtures for binary-level tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use llmctl::test_utils::{TestDir, sse_body};

/// Environment variables that would leak the developer's setup into tests.
const SCRUBBED_ENV: &[&str] = &[
    "OPENAI_API_KEY",
    "OPENAI_BASE_URL",
    "LLM_MODEL",
    "LLM_SYSTEM",
    "LLMCTL_CONFIG",
    "LLMCTL_LOG",
    "LLMCTL_LOG_FORMAT",
    "LLMCTL_LOG_FILE",
    "RUST_LOG",
];

/// Isolated state and config directories for one test.
pub struct Sandbox {
    pub dir: TestDir,
}

impl Sandbox {
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TestDir::new(),
        }
    }

    #[must_use]
    pub fn state_home(&self) -> PathBuf {
        self.dir.path().join("state")
    }

    #[must_use]
    pub fn config_home(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    #[must_use]
    pub fn counter_file(&self) -> PathBuf {
        self.state_home().join("llmctl").join("counter.json")
    }

    /// `llmctl` with a scrubbed environment pointing at this sandbox.
    ///
    /// # Panics
    ///
    /// Panics if the binary cannot be located.
    #[must_use]
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("llmctl").expect("llmctl binary");
        for key in SCRUBBED_ENV {
            cmd.env_remove(key);
        }
        cmd.env("XDG_STATE_HOME", self.state_home())
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("HOME", self.dir.path())
            .env("NO_COLOR", "1");
        cmd
    }

    /// Same as [`Sandbox::cmd`], aimed at a mock backend.
    #[must_use]
    pub fn cmd_against(&self, server: &MockServer) -> Command {
        let mut cmd = self.cmd();
        cmd.env("OPENAI_BASE_URL", format!("{}/v1", server.uri()))
            .env("OPENAI_API_KEY", "sk-test");
        cmd
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

/// Mount a streaming completion that emits `deltas` and reports usage.
pub async fn mount_completion(server: &MockServer, deltas: &[&str], usage: Option<(u64, u64)>) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body(deltas, usage)),
        )
        .mount(server)
        .await;
}

/// Read a file's modification time.
///
/// # Panics
///
/// Panics if metadata cannot be read.
#[must_use]
pub fn mtime(path: &Path) -> std::time::SystemTime {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .expect("file mtime")
}
