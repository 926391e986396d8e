//! Default command: assemble a prompt, stream the completion to stdout and
//! record token usage.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::cli::args::AskArgs;
use crate::core::completion::CompletionClient;
use crate::core::prompt::{assemble, build_messages, prompt_from_args, read_piped_stdin, tail_chars};
use crate::core::types::{ApiUsage, ChatMessage};
use crate::error::{LlmctlError, Result};
use crate::storage::config::ResolvedConfig;
use crate::storage::counter::{CounterStore, UsageCounter};
use crate::storage::paths::AppPaths;
use crate::util::env::EnvSource;
use crate::util::time::format_duration;

/// Execute the default command.
///
/// `paths` is `None` when no state directory could be resolved; the
/// completion still runs but usage is not recorded.
///
/// # Errors
///
/// Usage and configuration errors are returned before any request is made.
/// Request and stream errors are returned after any partial output.
/// Counter failures are logged and never returned.
pub async fn execute(
    args: &AskArgs,
    verbose: bool,
    env: &dyn EnvSource,
    paths: Option<&AppPaths>,
) -> Result<()> {
    let config = ResolvedConfig::resolve(args, verbose, env, paths)?;
    debug!(
        model = %config.model,
        model_source = %config.sources.model,
        base_url = %config.base_url,
        timeout = %format_duration(config.timeout),
        context = ?config.context,
        "Resolved configuration"
    );

    let stdin = read_piped_stdin()?;
    let messages = prepare_messages(&config, &args.prompt, &stdin)?;

    let client = CompletionClient::new(&config)?;
    let mut stdout = std::io::stdout();
    let outcome = client.stream_to(&messages, &mut stdout).await?;

    let store = paths.map(CounterStore::from_paths);
    record_usage(store.as_ref(), outcome.usage);

    Ok(())
}

/// Validate the inputs and build the request messages.
///
/// # Errors
///
/// - [`LlmctlError::MissingPrompt`] if neither arguments nor stdin carry text
/// - [`LlmctlError::ContextRead`] if the context file cannot be read
pub fn prepare_messages(
    config: &ResolvedConfig,
    prompt_args: &[String],
    stdin: &str,
) -> Result<Vec<ChatMessage>> {
    let prompt = prompt_from_args(prompt_args);
    if prompt.is_empty() && stdin.trim().is_empty() {
        return Err(LlmctlError::MissingPrompt);
    }

    let context = match &config.context {
        Some(path) => read_context(path)?,
        None => String::new(),
    };
    let context_tail = tail_chars(&context, config.tail);
    if context_tail.len() < context.len() {
        debug!(kept = config.tail, "Context file truncated to its tail");
    }

    let user = assemble(context_tail, stdin, &prompt);
    Ok(build_messages(config.system.as_deref(), user))
}

fn read_context(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| LlmctlError::ContextRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Add reported usage to the counter. Best effort: failures are logged at
/// `warn` and the update is dropped.
///
/// Returns the updated record when one was written.
pub fn record_usage(store: Option<&CounterStore>, usage: Option<ApiUsage>) -> Option<UsageCounter> {
    let Some(usage) = usage.filter(|u| u.total_tokens > 0) else {
        debug!("backend did not provide token usage");
        return None;
    };

    let Some(store) = store else {
        warn!("No state directory available, token usage not recorded");
        return None;
    };

    match store.record(usage.prompt_tokens, usage.completion_tokens) {
        Ok(counter) => {
            info!(
                prompt = usage.prompt_tokens,
                completion = usage.completion_tokens,
                total = counter.total_tokens(),
                "Recorded token usage"
            );
            Some(counter)
        }
        Err(e) => {
            warn!(error = %e, path = %store.path().display(), "Failed to save token counter");
            None
        }
    }
}
