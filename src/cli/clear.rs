//! CLI `clear` command — delete the session history after user confirmation.

use anyhow::{bail, Result};
use std::io::Write;
use std::path::PathBuf;

use sequential_thinking::config::ThinkingConfig;

/// Clear the session history. Asks for confirmation unless `yes` is set.
pub async fn clear(
    config: &ThinkingConfig,
    storage_dir: Option<PathBuf>,
    yes: bool,
) -> Result<()> {
    let mut session = sequential_thinking::server::open_session(config, storage_dir).await?;

    if !yes {
        println!(
            "WARNING: This will permanently delete all {} thoughts in the current session.",
            session.store().len()
        );
        println!("Session: {}", session.store().session_file().display());
        print!("\nType YES to confirm: ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if input.trim() != "YES" {
            bail!("clear cancelled");
        }
    }

    session.clear().await?;
    println!("Thought history cleared.");
    Ok(())
}
