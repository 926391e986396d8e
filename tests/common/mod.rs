//! Common test utilities for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: sandboxed `llmctl` commands and mock backends
//! - `log_capture`: tracing capture with assertions
//! - `logger`: structured test logging

pub mod fixtures;
pub mod log_capture;
pub mod logger;
