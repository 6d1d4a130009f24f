//! Session facade: the five externally visible operations.
//!
//! [`ThinkingSession`] composes the [`ThoughtStore`] with the pure analysis
//! functions. Typed methods return [`Result`]; [`ThinkingSession::execute`] and
//! [`ThinkingSession::dispatch`] wrap every outcome in a tagged [`Outcome`] so
//! no error crosses the transport boundary unhandled.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use crate::error::{Result, ThinkingError};
use crate::thinking::analysis::{self, ThoughtAnalysis, DEFAULT_MAX_RELATED};
use crate::thinking::summary::{self, SummaryResponse};
use crate::thinking::{Thought, ThoughtFields, ThoughtStore};

/// A parsed request against the session.
#[derive(Debug, Clone)]
pub enum Operation {
    SubmitThought(ThoughtFields),
    Summarize,
    Clear,
    Export(PathBuf),
    Import(PathBuf),
}

impl Operation {
    /// Tool name this operation is exposed under.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SubmitThought(_) => "process_thought",
            Self::Summarize => "generate_summary",
            Self::Clear => "clear_history",
            Self::Export(_) => "export_session",
            Self::Import(_) => "import_session",
        }
    }

    /// Parse a tool name and its JSON arguments.
    pub fn from_call(name: &str, args: Value) -> Result<Self> {
        match name {
            "process_thought" => Ok(Self::SubmitThought(parse_args(name, args)?)),
            "generate_summary" => Ok(Self::Summarize),
            "clear_history" => Ok(Self::Clear),
            "export_session" => {
                let args: FileArgs = parse_args(name, args)?;
                Ok(Self::Export(args.file_path))
            }
            "import_session" => {
                let args: FileArgs = parse_args(name, args)?;
                Ok(Self::Import(args.file_path))
            }
            other => Err(ThinkingError::UnknownOperation(other.to_string())),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileArgs {
    file_path: PathBuf,
}

fn parse_args<T: DeserializeOwned>(operation: &str, args: Value) -> Result<T> {
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args).map_err(|source| ThinkingError::InvalidArguments {
        operation: operation.to_string(),
        source,
    })
}

/// Tagged result of one operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Value),
    Failure { error: String },
}

impl Outcome {
    pub fn failure(err: &ThinkingError) -> Self {
        Self::Failure {
            error: err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// JSON payload; failures become `{"error": ..., "status": "failed"}`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Success(value) => value.clone(),
            Self::Failure { error } => json!({ "error": error, "status": "failed" }),
        }
    }

    /// Pretty-printed payload, split into the tool success/error channels.
    pub fn into_tool_result(self) -> std::result::Result<String, String> {
        let text = serde_json::to_string_pretty(&self.to_json())
            .unwrap_or_else(|e| format!(r#"{{"error": "{e}", "status": "failed"}}"#));
        if self.is_success() {
            Ok(text)
        } else {
            Err(text)
        }
    }
}

/// One thinking session bound to a storage directory.
#[derive(Debug)]
pub struct ThinkingSession {
    store: ThoughtStore,
    max_related: usize,
}

impl ThinkingSession {
    /// Initialize `store` from disk and wrap it.
    pub async fn open(mut store: ThoughtStore) -> Result<Self> {
        store.initialize().await?;
        Ok(Self {
            store,
            max_related: DEFAULT_MAX_RELATED,
        })
    }

    pub fn with_max_related(mut self, max_related: usize) -> Self {
        self.max_related = max_related;
        self
    }

    pub fn store(&self) -> &ThoughtStore {
        &self.store
    }

    /// Validate, persist, then analyze a new thought against the full history.
    pub async fn submit_thought(&mut self, fields: ThoughtFields) -> Result<ThoughtAnalysis> {
        tracing::info!(
            thought_number = fields.sequence_number,
            total = fields.total_sequence_length,
            stage = %fields.stage,
            "processing thought"
        );

        let thought = Thought::new(fields)?;
        self.store.add(thought.clone()).await?;

        let all = self.store.all_thoughts();
        let report = analysis::analyze(&thought, &all, self.max_related);

        tracing::info!(
            id = %thought.id(),
            thought_number = thought.sequence_number(),
            related = report.thought_analysis.analysis.related_thoughts_count,
            "thought processed"
        );
        Ok(report)
    }

    pub fn summarize(&self) -> SummaryResponse {
        tracing::info!(count = self.store.len(), "generating summary");
        summary::summarize(&self.store.all_thoughts())
    }

    pub async fn clear(&mut self) -> Result<()> {
        tracing::info!("clearing thought history");
        self.store.clear().await
    }

    pub async fn export(&self, path: &Path) -> Result<()> {
        tracing::info!(path = %path.display(), "exporting session");
        self.store.export_to(path).await
    }

    /// Replace the history with the contents of `path`.
    pub async fn import(&mut self, path: &Path) -> Result<usize> {
        tracing::info!(path = %path.display(), "importing session");
        self.store.import_from(path).await
    }

    /// Run one operation, folding any error into [`Outcome::Failure`].
    pub async fn execute(&mut self, operation: Operation) -> Outcome {
        let name = operation.name();
        let result = match operation {
            Operation::SubmitThought(fields) => self
                .submit_thought(fields)
                .await
                .and_then(|report| serde_json::to_value(report).map_err(Into::into)),
            Operation::Summarize => serde_json::to_value(self.summarize()).map_err(Into::into),
            Operation::Clear => self.clear().await.map(|()| {
                json!({ "status": "success", "message": "Thought history cleared" })
            }),
            Operation::Export(path) => self.export(&path).await.map(|()| {
                json!({
                    "status": "success",
                    "message": format!("Session exported to {}", path.display()),
                    "path": path.display().to_string(),
                })
            }),
            Operation::Import(path) => self.import(&path).await.map(|count| {
                json!({
                    "status": "success",
                    "message": format!("Session imported from {}", path.display()),
                    "path": path.display().to_string(),
                    "thoughtCount": count,
                })
            }),
        };

        match result {
            Ok(value) => Outcome::Success(value),
            Err(e) => {
                tracing::error!(tool = name, error = %e, "operation failed");
                Outcome::failure(&e)
            }
        }
    }

    /// Parse and run a named operation. Never returns an error.
    pub async fn dispatch(&mut self, name: &str, args: Value) -> Outcome {
        match Operation::from_call(name, args) {
            Ok(operation) => self.execute(operation).await,
            Err(e) => {
                tracing::error!(tool = name, error = %e, "rejected call");
                Outcome::failure(&e)
            }
        }
    }
}
