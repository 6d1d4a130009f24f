use anyhow::Result;
use std::path::{Path, PathBuf};

use sequential_thinking::config::ThinkingConfig;

/// Export the current session to `file`.
pub async fn export(
    config: &ThinkingConfig,
    storage_dir: Option<PathBuf>,
    file: &Path,
) -> Result<()> {
    let session = sequential_thinking::server::open_session(config, storage_dir).await?;
    session.export(file).await?;

    eprintln!(
        "Exported {} thoughts to {}.",
        session.store().len(),
        file.display()
    );
    Ok(())
}
