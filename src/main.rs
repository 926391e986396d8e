//! llmctl - minimal LLM command-line client
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clap::Parser;
use std::process::ExitCode;

use llmctl::cli::{Cli, Commands};
use llmctl::core::logging::{self, LogSettings};
use llmctl::storage::counter::CounterStore;
use llmctl::storage::paths::AppPaths;
use llmctl::util::env::{EnvSource, ProcessEnv, should_use_color};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let env = ProcessEnv;

    logging::init(&LogSettings::resolve(
        cli.log_level.as_deref(),
        cli.json_output,
        cli.verbose,
        &env,
    ));

    let json_errors = cli.json_output;
    let color = should_use_color(cli.no_color, &env);

    match run(cli, &env).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = %e, code = e.error_code(), "Command failed");
            eprintln!("{}", llmctl::render::render_error(&e, json_errors, color));
            e.exit_code().into()
        }
    }
}

async fn run(cli: Cli, env: &dyn EnvSource) -> llmctl::Result<()> {
    let paths = AppPaths::resolve(env);

    match cli.command {
        None => {
            let paths = match paths {
                Ok(paths) => Some(paths),
                Err(e) => {
                    tracing::warn!(error = %e, "Token usage will not be recorded");
                    None
                }
            };
            llmctl::cli::ask::execute(&cli.ask, cli.verbose, env, paths.as_ref()).await
        }

        Some(Commands::Counter(args)) => {
            let store = CounterStore::from_paths(&paths?);
            llmctl::cli::counter::execute(&args, &store)
        }
    }
}
