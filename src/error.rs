//! Error types for the thinking core.
//!
//! [`ValidationError`] covers malformed thought input and is checked in a fixed
//! priority order. [`ThinkingError`] is what every store and session operation
//! returns; corrupted session files never surface here because the store
//! recovers from them on load.

use std::path::PathBuf;

use crate::thinking::types::ThoughtStage;

/// The first rule a candidate thought violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("thought content cannot be empty")]
    EmptyText,

    #[error("thought number must be between 1 and {max} (got {0})", max = u32::MAX)]
    SequenceNumberOutOfRange(i64),

    #[error("total thoughts must be between 1 and {max} (got {0})", max = u32::MAX)]
    TotalOutOfRange(i64),

    #[error(
        "total thoughts ({total}) must be greater or equal to current thought number ({sequence})"
    )]
    TotalBelowSequence { sequence: i64, total: i64 },

    #[error("invalid thinking stage: '{0}'. Valid stages are: {valid}", valid = ThoughtStage::valid_names())]
    UnknownStage(String),

    #[error("field '{0}' is missing or has the wrong type")]
    MissingField(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum ThinkingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not move corrupted file {} aside: {source}", path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not lock {} after {attempts} attempts", path.display())]
    LockTimeout { path: PathBuf, attempts: u32 },

    #[error("import file not found: {}", .0.display())]
    ImportNotFound(PathBuf),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown tool: {0}")]
    UnknownOperation(String),

    #[error("invalid arguments for {operation}: {source}")]
    InvalidArguments {
        operation: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ThinkingError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ThinkingError> = std::result::Result<T, E>;
