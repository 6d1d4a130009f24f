//! CLI `call` command — run one tool against the session without a transport.

use anyhow::{Context, Result};
use std::path::PathBuf;

use sequential_thinking::config::ThinkingConfig;

/// Dispatch `tool` with JSON `args` and print the outcome payload.
///
/// Failures are printed like successes but make the command exit non-zero.
pub async fn call(
    config: &ThinkingConfig,
    storage_dir: Option<PathBuf>,
    tool: &str,
    args: &str,
) -> Result<()> {
    let args: serde_json::Value =
        serde_json::from_str(args).context("--args must be a JSON object")?;
    let mut session = sequential_thinking::server::open_session(config, storage_dir).await?;

    let outcome = session.dispatch(tool, args).await;
    println!("{}", serde_json::to_string_pretty(&outcome.to_json())?);

    anyhow::ensure!(outcome.is_success(), "{tool} failed");
    Ok(())
}
