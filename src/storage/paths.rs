//! Application paths for state and config.
//!
//! Resolved once at startup from an [`EnvSource`] so tests can point the
//! whole application at a temporary directory.

use std::path::{Path, PathBuf};

use crate::error::{LlmctlError, Result};
use crate::util::env::EnvSource;

/// Directory name used under the state and config homes.
pub const APP_NAME: &str = "llmctl";

/// Environment variable overriding the state home.
pub const ENV_STATE_HOME: &str = "XDG_STATE_HOME";
/// Environment variable overriding the config home.
pub const ENV_CONFIG_HOME: &str = "XDG_CONFIG_HOME";

/// Application paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// State directory (holds the token counter).
    pub state: PathBuf,
    /// Configuration directory, if one can be determined.
    pub config: Option<PathBuf>,
}

impl AppPaths {
    /// Resolve paths from the environment.
    ///
    /// State: `$XDG_STATE_HOME/llmctl`, else `~/.local/state/llmctl`.
    /// Config: `$XDG_CONFIG_HOME/llmctl`, else `~/.config/llmctl`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmctlError::HomeDirUnavailable`] when `XDG_STATE_HOME` is
    /// unset and no home directory can be determined. A missing config
    /// directory is not an error; the config file is simply skipped.
    pub fn resolve(env: &dyn EnvSource) -> Result<Self> {
        Self::resolve_with_home(env, home_dir())
    }

    /// Resolve paths with an explicit home directory.
    ///
    /// # Errors
    ///
    /// Same as [`AppPaths::resolve`].
    pub fn resolve_with_home(env: &dyn EnvSource, home: Option<PathBuf>) -> Result<Self> {
        let state = match env.non_empty(ENV_STATE_HOME) {
            Some(dir) => PathBuf::from(dir).join(APP_NAME),
            None => home
                .as_deref()
                .map(|h| h.join(".local").join("state").join(APP_NAME))
                .ok_or(LlmctlError::HomeDirUnavailable)?,
        };

        let config = env
            .non_empty(ENV_CONFIG_HOME)
            .map(|dir| PathBuf::from(dir).join(APP_NAME))
            .or_else(|| home.map(|h| h.join(".config").join(APP_NAME)));

        Ok(Self { state, config })
    }

    /// Paths rooted entirely under `root` (used by tests and tooling).
    #[must_use]
    pub fn under(root: &Path) -> Self {
        Self {
            state: root.join("state").join(APP_NAME),
            config: Some(root.join("config").join(APP_NAME)),
        }
    }

    /// Path to the token usage counter file.
    #[must_use]
    pub fn counter_file(&self) -> PathBuf {
        self.state.join("counter.json")
    }

    /// Path to the config file.
    #[must_use]
    pub fn config_file(&self) -> Option<PathBuf> {
        self.config.as_ref().map(|dir| dir.join("config.toml"))
    }
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}
