pub mod process_thought;
pub mod session_file;

use process_thought::ProcessThoughtParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use session_file::SessionFileParams;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::session::{Operation, ThinkingSession};

/// The MCP tool handler. Holds the shared session and exposes the five
/// session operations via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct ThinkingTools {
    tool_router: ToolRouter<Self>,
    session: Arc<Mutex<ThinkingSession>>,
}

#[tool_router]
impl ThinkingTools {
    pub fn new(session: Arc<Mutex<ThinkingSession>>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            session,
        }
    }

    async fn run(&self, operation: Operation) -> Result<String, String> {
        let mut session = self.session.lock().await;
        session.execute(operation).await.into_tool_result()
    }

    /// Record a thought and analyze it against the session so far.
    #[tool(description = "Add a sequential thought with its metadata. Returns progress and related earlier thoughts.")]
    async fn process_thought(
        &self,
        Parameters(params): Parameters<ProcessThoughtParams>,
    ) -> Result<String, String> {
        self.run(Operation::SubmitThought(params.into())).await
    }

    #[tool(description = "Generate a summary of the entire thinking process.")]
    async fn generate_summary(&self) -> Result<String, String> {
        self.run(Operation::Summarize).await
    }

    #[tool(description = "Clear the thought history.")]
    async fn clear_history(&self) -> Result<String, String> {
        self.run(Operation::Clear).await
    }

    #[tool(description = "Export the current thinking session to a file.")]
    async fn export_session(
        &self,
        Parameters(params): Parameters<SessionFileParams>,
    ) -> Result<String, String> {
        self.run(Operation::Export(params.file_path.into())).await
    }

    /// Replaces the current history entirely.
    #[tool(
        description = "Import a thinking session from a file, replacing the current history. Fails without changing the history if the file does not exist; a corrupted file is backed up and imports as an empty session."
    )]
    async fn import_session(
        &self,
        Parameters(params): Parameters<SessionFileParams>,
    ) -> Result<String, String> {
        self.run(Operation::Import(params.file_path.into())).await
    }
}

#[tool_handler]
impl ServerHandler for ThinkingTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "Sequential thinking server. Use process_thought to record each step of a \
                 reasoning sequence with its stage, then generate_summary to review progress."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
