//! llmctl - minimal LLM command-line client
//!
//! Streams a chat completion from an OpenAI-compatible endpoint to stdout
//! and keeps a cumulative token-usage counter on disk.

#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod core;
pub mod error;
pub mod render;
pub mod storage;
pub mod util;

/// Test utilities module - included in test builds or when test-utils feature is enabled.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{ExitCode, LlmctlError, Result};
