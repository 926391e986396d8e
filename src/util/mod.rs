//! Utility functions.

pub mod env;
pub mod time;

pub use env::{EnvSource, ProcessEnv};
pub use time::{format_duration, parse_duration};
