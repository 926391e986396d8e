//! Command-line interface.

pub mod args;
pub mod ask;
pub mod counter;

pub use args::{AskArgs, Cli, Commands, CounterAction, CounterArgs};
