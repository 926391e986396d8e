//! Persistent token usage counter.
//!
//! A single JSON record accumulating prompt, completion and total token
//! counts across invocations. The only permitted sequence is
//! load → mutate → save; there is no partial in-place update.
//!
//! # Features
//! - Missing file loads as the zero record (first run is not a failure)
//! - Unparseable file loads as the zero record with a warning
//! - Atomic writes using temp file + rename (readers never see a partial file)
//!
//! There is no locking. Two processes updating the same file concurrently
//! can lose an update.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LlmctlError, Result};
use crate::storage::paths::AppPaths;

/// Cumulative token usage.
///
/// `total_tokens` is advanced by the same deltas as the other two fields,
/// so `total == prompt + completion` holds for every record produced by
/// [`UsageCounter::add`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageCounter {
    prompt_tokens: u64,
    completion_tokens: u64,
    total_tokens: u64,
}

impl UsageCounter {
    /// The zero record.
    pub const ZERO: Self = Self {
        prompt_tokens: 0,
        completion_tokens: 0,
        total_tokens: 0,
    };

    /// Return a new record with the deltas applied. Saturates at `u64::MAX`.
    #[must_use]
    pub const fn add(self, prompt_delta: u64, completion_delta: u64) -> Self {
        Self {
            prompt_tokens: self.prompt_tokens.saturating_add(prompt_delta),
            completion_tokens: self.completion_tokens.saturating_add(completion_delta),
            total_tokens: self
                .total_tokens
                .saturating_add(prompt_delta.saturating_add(completion_delta)),
        }
    }

    #[must_use]
    pub const fn prompt_tokens(&self) -> u64 {
        self.prompt_tokens
    }

    #[must_use]
    pub const fn completion_tokens(&self) -> u64 {
        self.completion_tokens
    }

    #[must_use]
    pub const fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    /// Whether all three fields are zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.prompt_tokens == 0 && self.completion_tokens == 0 && self.total_tokens == 0
    }
}

/// File-backed store for the [`UsageCounter`].
#[derive(Debug, Clone)]
pub struct CounterStore {
    path: PathBuf,
}

impl CounterStore {
    /// Store backed by an explicit file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the standard location under the resolved state directory.
    #[must_use]
    pub fn from_paths(paths: &AppPaths) -> Self {
        Self::new(paths.counter_file())
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted record.
    ///
    /// A missing file yields [`UsageCounter::ZERO`]. A file that exists but
    /// does not parse also yields the zero record, logged at `warn`; the next
    /// save replaces it.
    ///
    /// # Errors
    ///
    /// Returns [`LlmctlError::CounterIo`] if the file exists but cannot be
    /// read.
    pub fn load(&self) -> Result<UsageCounter> {
        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Counter file not found, starting from zero");
                return Ok(UsageCounter::ZERO);
            }
            Err(source) => {
                return Err(LlmctlError::CounterIo {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        match serde_json::from_slice(&content) {
            Ok(counter) => Ok(counter),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Counter file is not valid JSON, treating as zero"
                );
                Ok(UsageCounter::ZERO)
            }
        }
    }

    /// Persist `counter` as indented JSON, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`LlmctlError::CounterIo`] if the directory cannot be created
    /// or the file cannot be written.
    pub fn save(&self, counter: &UsageCounter) -> Result<()> {
        let io_err = |source| LlmctlError::CounterIo {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut content = serde_json::to_string_pretty(counter)?;
        content.push('\n');

        write_atomic(&self.path, content.as_bytes()).map_err(io_err)?;
        tracing::debug!(
            path = %self.path.display(),
            total = counter.total_tokens(),
            "Counter saved"
        );
        Ok(())
    }

    /// Overwrite the stored record with zero.
    ///
    /// # Errors
    ///
    /// Same as [`CounterStore::save`].
    pub fn reset(&self) -> Result<()> {
        self.save(&UsageCounter::ZERO)
    }

    /// Load, add the deltas, save. Returns the new record.
    ///
    /// A load failure degrades to the zero record (logged at `warn`) so that
    /// usage tracking never blocks a completion.
    ///
    /// # Errors
    ///
    /// Returns the save error, if any. Callers on the completion path log
    /// and drop it.
    pub fn record(&self, prompt_delta: u64, completion_delta: u64) -> Result<UsageCounter> {
        let current = self.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load counter, continuing from zero");
            UsageCounter::ZERO
        });
        let updated = current.add(prompt_delta, completion_delta);
        self.save(&updated)?;
        Ok(updated)
    }
}

/// Write bytes atomically using temp file + rename.
/// The temp file lives in the same directory so the rename stays on one
/// filesystem.
fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let temp_path = parent.join(format!(
        ".{}.tmp.{}",
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("counter"),
        std::process::id()
    ));

    let written = (|| {
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(content)?;
        file.sync_all()
    })();

    if let Err(e) = written.and_then(|()| std::fs::rename(&temp_path, path)) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e);
    }

    Ok(())
}
