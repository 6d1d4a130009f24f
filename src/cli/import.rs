use anyhow::Result;
use std::path::{Path, PathBuf};

use sequential_thinking::config::ThinkingConfig;

/// Import a session file, replacing the current history.
pub async fn import(
    config: &ThinkingConfig,
    storage_dir: Option<PathBuf>,
    file: &Path,
) -> Result<()> {
    let mut session = sequential_thinking::server::open_session(config, storage_dir).await?;
    let previous = session.store().len();
    let imported = session.import(file).await?;

    println!("Import complete:");
    println!("  Thoughts imported: {imported}");
    println!("  Thoughts replaced: {previous}");
    Ok(())
}
