//! `llmctl counter` command.

use std::io::Write;

use tracing::debug;

use crate::cli::args::{CounterAction, CounterArgs};
use crate::error::Result;
use crate::render::counter::{render_json, render_text};
use crate::storage::counter::CounterStore;

/// Execute the counter command, writing to the process streams.
///
/// # Errors
///
/// Returns error if the counter cannot be loaded or reset.
pub fn execute(args: &CounterArgs, store: &CounterStore) -> Result<()> {
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    run(args, store, &mut stdout.lock(), &mut stderr.lock())
}

/// Execute the counter command against the given streams.
///
/// Showing the counter never writes to the store.
///
/// # Errors
///
/// Returns error if the counter cannot be loaded or reset, or if writing
/// the output fails.
pub fn run(
    args: &CounterArgs,
    store: &CounterStore,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    match args.action {
        Some(CounterAction::Reset) => {
            store.reset()?;
            debug!(path = %store.path().display(), "Counter reset");
            writeln!(err, "counter reset")?;
        }
        None => {
            let counter = store.load()?;
            let rendered = if args.json {
                render_json(&counter)?
            } else {
                render_text(&counter)
            };
            writeln!(out, "{rendered}")?;
        }
    }
    Ok(())
}
