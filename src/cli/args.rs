//! CLI argument definitions using clap.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::util::time::parse_duration;

/// Minimal LLM CLI - streams a chat completion and tracks token usage.
#[derive(Parser, Debug)]
#[command(name = "llmctl")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(after_help = "\
ENVIRONMENT:
    OPENAI_API_KEY      API key (sent as a bearer token when set)
    OPENAI_BASE_URL     OpenAI-compatible base URL
    LLM_MODEL           Default model name
    LLM_SYSTEM          Default system prompt
    XDG_STATE_HOME      Where the token counter is kept
    LLMCTL_CONFIG       Config file override

EXAMPLES:
    llmctl \"hello world c++\"
    llmctl --context notes.md \"extend section 5\" >> notes.md
    cat file.txt | llmctl \"summarize\"
    llmctl counter
    llmctl counter reset")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub ask: AskArgs,

    // === Global flags ===
    /// Verbose diagnostics on stderr (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Emit JSONL logs to stderr
    #[arg(long, global = true)]
    pub json_output: bool,

    /// Disable colored diagnostics
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Options for the default (prompt) command.
#[derive(Args, Debug, Clone, Default)]
pub struct AskArgs {
    /// Model name [default: $LLM_MODEL or gpt-5.2]
    #[arg(short, long, value_name = "NAME")]
    pub model: Option<String>,

    /// System prompt [default: $LLM_SYSTEM]
    #[arg(short, long, value_name = "TEXT")]
    pub system: Option<String>,

    /// Context file whose tail is prepended to the prompt
    #[arg(short, long, value_name = "FILE")]
    pub context: Option<PathBuf>,

    /// Max characters kept from the end of the context file [default: 12000]
    #[arg(long, value_name = "CHARS")]
    pub tail: Option<usize>,

    /// Request timeout, e.g. 90, 30s, 5m, 1m30s [default: 5m]
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// OpenAI-compatible base URL [default: $OPENAI_BASE_URL]
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Prompt text (joined with spaces)
    #[arg(value_name = "PROMPT")]
    pub prompt: Vec<String>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show total token usage, or reset it
    Counter(CounterArgs),
}

/// Arguments for the `counter` command.
#[derive(Args, Debug)]
pub struct CounterArgs {
    #[command(subcommand)]
    pub action: Option<CounterAction>,

    /// Print the counter as JSON
    #[arg(long)]
    pub json: bool,
}

/// Counter subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterAction {
    /// Reset the token counter to zero
    Reset,
}
