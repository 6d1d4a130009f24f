//! MCP server initialization for the stdio transport.

use crate::config::ThinkingConfig;
use crate::session::ThinkingSession;
use crate::thinking::ThoughtStore;
use crate::tools::ThinkingTools;
use anyhow::{Context, Result};
use rmcp::ServiceExt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared setup: resolve the storage directory and load the session from it.
pub async fn open_session(
    config: &ThinkingConfig,
    storage_dir: Option<PathBuf>,
) -> Result<ThinkingSession> {
    let dir = storage_dir.unwrap_or_else(|| config.resolved_storage_dir());
    let store = ThoughtStore::new(&dir).with_lock_options(config.lock_options());
    let session = ThinkingSession::open(store)
        .await
        .with_context(|| format!("failed to open session in {}", dir.display()))?;
    tracing::info!(dir = %dir.display(), thoughts = session.store().len(), "session ready");

    Ok(session.with_max_related(config.analysis.max_related))
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: ThinkingConfig, storage_dir: Option<PathBuf>) -> Result<()> {
    tracing::info!("starting sequential thinking MCP server on stdio");

    let session = open_session(&config, storage_dir).await?;
    let tools = ThinkingTools::new(Arc::new(Mutex::new(session)));
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server running — waiting for client");

    server.waiting().await?;
    tracing::info!("MCP server shut down");

    Ok(())
}
