//! Configuration file loading and setting resolution.
//!
//! Loads optional defaults from `$XDG_CONFIG_HOME/llmctl/config.toml`
//! (falling back to `~/.config/llmctl/config.toml`):
//!
//! ```toml
//! [defaults]
//! model = "gpt-4o-mini"
//! system = "Be terse."
//! base_url = "http://localhost:11434/v1"
//! timeout = "2m"
//! tail = 8000
//! ```
//!
//! ## Precedence
//!
//! Settings are resolved with the following precedence (highest first):
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `OPENAI_API_KEY`: API key (environment only, never read from the file)
//! - `OPENAI_BASE_URL`: OpenAI-compatible base URL
//! - `LLM_MODEL`: Default model name
//! - `LLM_SYSTEM`: Default system prompt
//! - `LLMCTL_CONFIG`: Override config file path

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::cli::args::AskArgs;
use crate::error::{LlmctlError, Result};
use crate::util::env::EnvSource;
use crate::util::time::parse_duration;

// =============================================================================
// Environment Variable Names
// =============================================================================

/// Environment variable for the API key.
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable for the API base URL.
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
/// Environment variable for the default model.
pub const ENV_MODEL: &str = "LLM_MODEL";
/// Environment variable for the default system prompt.
pub const ENV_SYSTEM: &str = "LLM_SYSTEM";
/// Environment variable to override config file path.
pub const ENV_CONFIG: &str = "LLMCTL_CONFIG";

// =============================================================================
// Built-in Defaults
// =============================================================================

pub const DEFAULT_MODEL: &str = "gpt-5.2";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_TAIL: usize = 12_000;

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Fully resolved configuration after merging CLI, env vars, and config file.
#[derive(Clone)]
pub struct ResolvedConfig {
    /// Model name sent with the request.
    pub model: String,
    /// Optional system prompt.
    pub system: Option<String>,
    /// Optional context file.
    pub context: Option<PathBuf>,
    /// Characters kept from the end of the context file (0 keeps all).
    pub tail: usize,
    /// Total request timeout, including the streamed body.
    pub timeout: Duration,
    /// API base URL without the `/chat/completions` suffix.
    pub base_url: String,
    /// Bearer token, if any.
    pub api_key: Option<String>,
    /// Whether verbose diagnostics are enabled.
    pub verbose: bool,
    /// Source of each setting for debugging.
    pub sources: ConfigSources,
}

impl std::fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("model", &self.model)
            .field("system", &self.system)
            .field("context", &self.context)
            .field("tail", &self.tail)
            .field("timeout", &self.timeout)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("verbose", &self.verbose)
            .field("sources", &self.sources)
            .finish()
    }
}

/// Tracks the source of each configuration value.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub model: ConfigSource,
    pub system: ConfigSource,
    pub base_url: ConfigSource,
    pub timeout: ConfigSource,
    pub tail: ConfigSource,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value from CLI flag.
    Cli,
    /// Value from environment variable.
    Env,
    /// Value from config file.
    ConfigFile,
    /// Built-in default.
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI flag"),
            Self::Env => write!(f, "environment variable"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Pick the first present value in precedence order, recording its source.
fn pick<T>(
    cli: Option<T>,
    env: Option<T>,
    file: Option<T>,
    default: T,
    source: &mut ConfigSource,
) -> T {
    if let Some(value) = cli {
        *source = ConfigSource::Cli;
        value
    } else if let Some(value) = env {
        *source = ConfigSource::Env;
        value
    } else if let Some(value) = file {
        *source = ConfigSource::ConfigFile;
        value
    } else {
        *source = ConfigSource::Default;
        default
    }
}

impl ResolvedConfig {
    /// Resolve final configuration from CLI args, environment variables, and
    /// the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file exists but is invalid
    /// - Any resolved value is invalid (e.g., a base URL without a scheme)
    pub fn resolve(
        args: &AskArgs,
        verbose: bool,
        env: &dyn EnvSource,
        paths: Option<&AppPaths>,
    ) -> Result<Self> {
        let config = Self::load_config(env, paths)?;
        let file = config.defaults.validated()?;

        let mut sources = ConfigSources::default();

        let model = pick(
            args.model.clone().filter(|m| !m.trim().is_empty()),
            env.non_empty(ENV_MODEL),
            file.model,
            DEFAULT_MODEL.to_string(),
            &mut sources.model,
        );

        let system = pick(
            args.system.clone().map(Some),
            env.non_empty(ENV_SYSTEM).map(Some),
            file.system.map(Some),
            None,
            &mut sources.system,
        )
        .filter(|s| !s.trim().is_empty());

        let base_url = pick(
            args.base_url.clone().filter(|u| !u.trim().is_empty()),
            env.non_empty(ENV_BASE_URL),
            file.base_url,
            DEFAULT_BASE_URL.to_string(),
            &mut sources.base_url,
        );
        validate_base_url(&base_url)?;

        let timeout = pick(
            args.timeout,
            None,
            file.timeout,
            DEFAULT_TIMEOUT,
            &mut sources.timeout,
        );

        let tail = pick(args.tail, None, file.tail, DEFAULT_TAIL, &mut sources.tail);

        Ok(Self {
            model,
            system,
            context: args.context.clone(),
            tail,
            timeout,
            base_url,
            api_key: env.non_empty(ENV_API_KEY),
            verbose,
            sources,
        })
    }

    /// Load config file, respecting the `LLMCTL_CONFIG` override.
    fn load_config(env: &dyn EnvSource, paths: Option<&AppPaths>) -> Result<Config> {
        if let Some(path) = env.non_empty(ENV_CONFIG) {
            return Config::load_from(Path::new(&path));
        }
        match paths.and_then(AppPaths::config_file) {
            Some(path) => Config::load_from(&path),
            None => Ok(Config::default()),
        }
    }
}

fn validate_base_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(LlmctlError::ConfigInvalid {
            key: "base_url".to_string(),
            value: url.to_string(),
            message: "must start with http:// or https://".to_string(),
        })
    }
}

// =============================================================================
// Config File
// =============================================================================

/// Application configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Defaults applied when neither a flag nor an env var is given.
    pub defaults: DefaultsConfig,
}

/// `[defaults]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub model: Option<String>,
    pub system: Option<String>,
    pub base_url: Option<String>,
    /// Duration string such as `"5m"`.
    pub timeout: Option<String>,
    pub tail: Option<usize>,
}

/// `[defaults]` with the timeout parsed.
#[derive(Debug, Default)]
struct FileDefaults {
    model: Option<String>,
    system: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    tail: Option<usize>,
}

impl DefaultsConfig {
    fn validated(self) -> Result<FileDefaults> {
        let timeout = self
            .timeout
            .as_deref()
            .map(|raw| {
                parse_duration(raw).map_err(|message| LlmctlError::ConfigInvalid {
                    key: "timeout".to_string(),
                    value: raw.to_string(),
                    message,
                })
            })
            .transpose()?;

        Ok(FileDefaults {
            model: self.model.filter(|m| !m.trim().is_empty()),
            system: self.system,
            base_url: self.base_url.filter(|u| !u.trim().is_empty()),
            timeout,
            tail: self.tail,
        })
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// Returns default config if the file doesn't exist.
    /// Returns error only if the file exists but is invalid.
    ///
    /// # Errors
    ///
    /// Returns [`LlmctlError::ConfigParse`] for unreadable or malformed files.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(?path, "Loading config file");
        let parse_err = |message: String| LlmctlError::ConfigParse {
            path: path.display().to_string(),
            message,
        };
        let content = fs::read_to_string(path).map_err(|e| parse_err(e.to_string()))?;
        toml::from_str(&content).map_err(|e| parse_err(e.to_string()))
    }
}
