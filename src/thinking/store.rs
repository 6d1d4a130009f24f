//! File-backed session store.
//!
//! [`ThoughtStore`] owns the in-memory history for one session and rewrites
//! `current_session.json` in full after every mutation. Reads and writes of any
//! data file happen under its sibling lock file (see [`super::lock`]), and each
//! write lands in a temp file that is renamed over the target.
//!
//! A data file that fails to load is moved to `<file>.bak.<timestamp>` and
//! treated as empty.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Result, ThinkingError};
use crate::thinking::lock::{lock_path_for, FileLock, LockOptions};
use crate::thinking::types::{now_iso8601, Thought, ThoughtStage};

pub const SESSION_FILE: &str = "current_session.json";
pub const SESSION_LOCK: &str = "current_session.lock";

/// On-disk document shape shared by session and export files.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionDocument {
    thoughts: Vec<Map<String, Value>>,
    last_updated: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportMetadata {
    exported_at: String,
    metadata: ExportStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportStats {
    total_thoughts: usize,
    stages: BTreeMap<ThoughtStage, usize>,
}

/// Authoritative history for one session directory.
#[derive(Debug)]
pub struct ThoughtStore {
    storage_dir: PathBuf,
    session_file: PathBuf,
    lock_file: PathBuf,
    lock_options: LockOptions,
    history: Vec<Thought>,
}

impl ThoughtStore {
    /// Create a store rooted at `storage_dir`. Nothing is read until
    /// [`initialize`](Self::initialize).
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        let storage_dir = storage_dir.into();
        Self {
            session_file: storage_dir.join(SESSION_FILE),
            lock_file: storage_dir.join(SESSION_LOCK),
            storage_dir,
            lock_options: LockOptions::default(),
            history: Vec::new(),
        }
    }

    pub fn with_lock_options(mut self, lock_options: LockOptions) -> Self {
        self.lock_options = lock_options;
        self
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn session_file(&self) -> &Path {
        &self.session_file
    }

    /// Create the storage directory if needed and load the session file.
    ///
    /// A missing file gives an empty history. A file that is corrupted, or
    /// cannot be locked or read, is backed up and also gives an empty history.
    /// Only directory creation and a failed backup rename are returned as
    /// errors.
    pub async fn initialize(&mut self) -> Result<()> {
        tokio::fs::create_dir_all(&self.storage_dir)
            .await
            .map_err(|e| ThinkingError::storage(&self.storage_dir, e))?;

        self.history =
            match load_thoughts(&self.session_file, &self.lock_file, &self.lock_options).await {
                Ok(thoughts) => thoughts,
                Err(e @ ThinkingError::Backup { .. }) => return Err(e),
                Err(e) => {
                    tracing::error!(
                        path = %self.session_file.display(),
                        error = %e,
                        "error loading session, starting empty"
                    );
                    Vec::new()
                }
            };

        tracing::info!(
            path = %self.session_file.display(),
            count = self.history.len(),
            "session loaded"
        );
        Ok(())
    }

    /// Append a thought and persist the whole history.
    ///
    /// The append is not rolled back if the write fails.
    pub async fn add(&mut self, thought: Thought) -> Result<()> {
        self.history.push(thought);
        self.save_session().await
    }

    /// Copy of the full history in insertion order.
    pub fn all_thoughts(&self) -> Vec<Thought> {
        self.history.clone()
    }

    pub fn thoughts_by_stage(&self, stage: ThoughtStage) -> Vec<Thought> {
        self.history
            .iter()
            .filter(|t| t.stage() == stage)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Drop every thought and persist the empty session.
    pub async fn clear(&mut self) -> Result<()> {
        self.history.clear();
        self.save_session().await
    }

    /// Write the history plus export metadata to `path`, leaving the session
    /// file untouched.
    pub async fn export_to(&self, path: &Path) -> Result<()> {
        let metadata = ExportMetadata {
            exported_at: now_iso8601(),
            metadata: ExportStats {
                total_thoughts: self.history.len(),
                stages: stage_breakdown(&self.history),
            },
        };
        let extra = match serde_json::to_value(metadata)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        save_thoughts(
            path,
            &lock_path_for(path),
            &self.history,
            extra,
            &self.lock_options,
        )
        .await?;
        tracing::info!(path = %path.display(), count = self.history.len(), "session exported");
        Ok(())
    }

    /// Replace the history with the thoughts in `path` and persist it to the
    /// session file. Returns the number of thoughts imported.
    pub async fn import_from(&mut self, path: &Path) -> Result<usize> {
        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|e| ThinkingError::storage(path, e))?;
        if !exists {
            return Err(ThinkingError::ImportNotFound(path.to_path_buf()));
        }

        let thoughts = load_thoughts(path, &lock_path_for(path), &self.lock_options).await?;
        let count = thoughts.len();
        self.history = thoughts;
        self.save_session().await?;
        tracing::info!(path = %path.display(), count, "session imported");
        Ok(count)
    }

    async fn save_session(&self) -> Result<()> {
        let result = save_thoughts(
            &self.session_file,
            &self.lock_file,
            &self.history,
            Map::new(),
            &self.lock_options,
        )
        .await;
        if let Err(ref e) = result {
            tracing::error!(
                path = %self.session_file.display(),
                error = %e,
                "error saving session"
            );
        }
        result
    }
}

/// Count of thoughts per stage, with every stage present.
pub fn stage_breakdown(thoughts: &[Thought]) -> BTreeMap<ThoughtStage, usize> {
    let mut counts: BTreeMap<ThoughtStage, usize> =
        ThoughtStage::ALL.into_iter().map(|s| (s, 0)).collect();
    for thought in thoughts {
        *counts.entry(thought.stage()).or_default() += 1;
    }
    counts
}

/// Backup path for a corrupted file: `<file>.bak.<ISO timestamp>` with `:` and
/// `.` in the timestamp replaced by `-`.
pub fn backup_path_for(path: &Path, timestamp: &str) -> PathBuf {
    let stamp = timestamp.replace([':', '.'], "-");
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".bak.{stamp}"));
    PathBuf::from(name)
}

/// Serialize `thoughts` (with ids) plus `extra` top-level keys and atomically
/// replace `path` while holding `lock_path`.
async fn save_thoughts(
    path: &Path,
    lock_path: &Path,
    thoughts: &[Thought],
    extra: Map<String, Value>,
    lock_options: &LockOptions,
) -> Result<()> {
    let document = SessionDocument {
        thoughts: thoughts.iter().map(|t| t.to_persistable(true)).collect(),
        last_updated: now_iso8601(),
        extra,
    };
    let json = serde_json::to_string_pretty(&document)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ThinkingError::storage(parent, e))?;
    }

    let _lock = FileLock::acquire(lock_path, lock_options).await?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, json)
        .await
        .map_err(|e| ThinkingError::storage(&tmp_path, e))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| ThinkingError::storage(path, e))?;

    tracing::debug!(path = %path.display(), count = thoughts.len(), "saved thoughts");
    Ok(())
}

/// Load thoughts from `path` under `lock_path`.
///
/// Missing file → empty. A file that cannot be locked, read, decoded or
/// parsed → renamed to a backup, empty.
async fn load_thoughts(
    path: &Path,
    lock_path: &Path,
    lock_options: &LockOptions,
) -> Result<Vec<Thought>> {
    let exists = tokio::fs::try_exists(path)
        .await
        .map_err(|e| ThinkingError::storage(path, e))?;
    if !exists {
        return Ok(Vec::new());
    }

    let parsed = match read_locked(path, lock_path, lock_options).await {
        Ok(bytes) => String::from_utf8(bytes)
            .map_err(|e| format!("invalid UTF-8: {e}"))
            .and_then(|content| parse_document(&content)),
        Err(e) => Err(format!("unreadable: {e}")),
    };

    match parsed {
        Ok(thoughts) => {
            tracing::debug!(path = %path.display(), count = thoughts.len(), "loaded thoughts");
            Ok(thoughts)
        }
        Err(reason) => {
            tracing::error!(path = %path.display(), %reason, "corrupted thought file");
            let backup = backup_path_for(path, &now_iso8601());
            tokio::fs::rename(path, &backup)
                .await
                .map_err(|e| ThinkingError::Backup {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            tracing::info!(backup = %backup.display(), "created backup of corrupted file");
            Ok(Vec::new())
        }
    }
}

async fn read_locked(
    path: &Path,
    lock_path: &Path,
    lock_options: &LockOptions,
) -> Result<Vec<u8>> {
    let _lock = FileLock::acquire(lock_path, lock_options).await?;
    tokio::fs::read(path)
        .await
        .map_err(|e| ThinkingError::storage(path, e))
}

/// Parse a session/export document. The error string describes why the file
/// is considered corrupted.
fn parse_document(content: &str) -> std::result::Result<Vec<Thought>, String> {
    let data: Value = serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}"))?;
    let Value::Object(map) = data else {
        return Err("top level is not an object".into());
    };

    match map.get("thoughts") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                Thought::from_persistable(item).map_err(|e| format!("thought {i}: {e}"))
            })
            .collect(),
        Some(_) => Err("'thoughts' is not an array".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_path_strips_colons_and_dots() {
        let p = backup_path_for(
            Path::new("/s/current_session.json"),
            "2025-03-01T10:20:30.456Z",
        );
        assert_eq!(
            p,
            PathBuf::from("/s/current_session.json.bak.2025-03-01T10-20-30-456Z")
        );
    }

    #[test]
    fn parse_document_rejects_bad_shapes() {
        assert!(parse_document("{not json").is_err());
        assert!(parse_document("[1, 2]").is_err());
        assert!(parse_document(r#"{"thoughts": 3}"#).is_err());
        assert!(parse_document(r#"{"thoughts": [{"thought": ""}]}"#).is_err());
        assert_eq!(parse_document(r#"{"lastUpdated": "x"}"#).unwrap().len(), 0);
    }

    #[test]
    fn stage_breakdown_lists_all_stages() {
        let counts = stage_breakdown(&[]);
        assert_eq!(counts.len(), 5);
        assert!(counts.values().all(|&c| c == 0));
    }
}
