mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sequential_thinking::{config, server};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sequential-thinking",
    version,
    about = "Sequential thinking MCP server for AI agents"
)]
struct Cli {
    /// Session directory (overrides config and MCP_STORAGE_DIR)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (stdio transport)
    Serve,
    /// Print a summary of the current session
    Summary,
    /// Export the current session to a JSON file
    Export { file: PathBuf },
    /// Replace the current session with the contents of a JSON file
    Import { file: PathBuf },
    /// Delete every thought in the current session
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Run a single tool call and print its JSON result
    Call {
        /// Tool name, e.g. process_thought
        tool: String,
        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = config::ThinkingConfig::load()?;

    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let dir = cli.storage_dir;
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => server::serve_stdio(config, dir).await?,
        Command::Summary => cli::summary::summary(&config, dir).await?,
        Command::Export { file } => cli::export::export(&config, dir, &file).await?,
        Command::Import { file } => cli::import::import(&config, dir, &file).await?,
        Command::Clear { yes } => cli::clear::clear(&config, dir, yes).await?,
        Command::Call { tool, args } => cli::call::call(&config, dir, &tool, &args).await?,
    }

    Ok(())
}
