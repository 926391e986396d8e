//! Storage for configuration, paths, and the token usage counter.

pub mod config;
pub mod counter;
pub mod paths;

pub use config::{
    Config, ConfigSource, ConfigSources, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TAIL,
    DEFAULT_TIMEOUT, ENV_API_KEY, ENV_BASE_URL, ENV_CONFIG, ENV_MODEL, ENV_SYSTEM,
    ResolvedConfig,
};
pub use counter::{CounterStore, UsageCounter};
pub use paths::AppPaths;
