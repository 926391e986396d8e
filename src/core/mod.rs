//! Core request pipeline: prompt assembly, HTTP streaming and logging.

pub mod completion;
pub mod http;
pub mod logging;
pub mod prompt;
pub mod stream;
pub mod types;

pub use completion::{CompletionClient, CompletionOutcome};
pub use types::{ApiUsage, ChatMessage, Role};
