//! Advisory lock files.
//!
//! A data file `foo.json` is guarded by a sibling `foo.lock`. The lock is an
//! exclusive `flock` on that file, held by [`FileLock`] and released when the
//! guard drops. Contention is retried with exponential backoff.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, ThinkingError};

/// Retry budget for lock acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOptions {
    /// Retries after the first failed attempt.
    pub retries: u32,
    pub min_timeout: Duration,
    pub max_timeout: Duration,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            retries: 5,
            min_timeout: Duration::from_millis(100),
            max_timeout: Duration::from_millis(1000),
        }
    }
}

impl LockOptions {
    /// Delay before retry number `retry` (0-based): doubles from `min_timeout`,
    /// capped at `max_timeout`.
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.min_timeout
            .checked_mul(factor)
            .unwrap_or(self.max_timeout)
            .min(self.max_timeout)
    }
}

/// Lock file path for a data file: `x.json` → `x.lock`, anything else gets
/// `.lock` appended.
pub fn lock_path_for(data_file: &Path) -> PathBuf {
    match data_file.extension() {
        Some(ext) if ext == "json" => data_file.with_extension("lock"),
        _ => {
            let mut name = data_file.as_os_str().to_owned();
            name.push(".lock");
            PathBuf::from(name)
        }
    }
}

/// RAII guard for an acquired lock file.
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Acquire an exclusive lock on `path`, creating the lock file if needed.
    ///
    /// Returns [`ThinkingError::LockTimeout`] once the retry budget is spent.
    pub async fn acquire(path: &Path, options: &LockOptions) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .map_err(|e| ThinkingError::storage(path, e))?;

        let attempts = options.retries + 1;
        for retry in 0..attempts {
            match FileExt::try_lock_exclusive(&file) {
                Ok(()) => {
                    return Ok(Self {
                        file,
                        path: path.to_path_buf(),
                    })
                }
                Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                    if retry + 1 == attempts {
                        break;
                    }
                    let delay = options.backoff(retry);
                    tracing::debug!(
                        path = %path.display(),
                        retry,
                        delay_ms = delay.as_millis() as u64,
                        "lock contended, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(ThinkingError::storage(path, e)),
            }
        }

        tracing::warn!(path = %path.display(), attempts, "lock acquisition timed out");
        Err(ThinkingError::LockTimeout {
            path: path.to_path_buf(),
            attempts,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release lock");
        }
    }
}
