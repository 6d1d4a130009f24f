#![allow(dead_code)]

use sequential_thinking::thinking::lock::LockOptions;
use sequential_thinking::thinking::{Thought, ThoughtFields, ThoughtStore};
use std::path::Path;
use std::time::Duration;

/// Build a valid thought; panics on invalid input.
pub fn thought(text: &str, number: i64, total: i64, stage: &str, tags: &[&str]) -> Thought {
    Thought::new(fields(text, number, total, stage, tags)).unwrap()
}

pub fn fields(text: &str, number: i64, total: i64, stage: &str, tags: &[&str]) -> ThoughtFields {
    ThoughtFields {
        text: text.to_string(),
        sequence_number: number,
        total_sequence_length: total,
        continuation: number < total,
        stage: stage.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    }
}

/// Short lock backoff so contention tests stay quick.
pub fn fast_locks() -> LockOptions {
    LockOptions {
        retries: 2,
        min_timeout: Duration::from_millis(5),
        max_timeout: Duration::from_millis(20),
    }
}

/// A store over `dir`, already initialized.
pub async fn open_store(dir: &Path) -> ThoughtStore {
    let mut store = ThoughtStore::new(dir).with_lock_options(fast_locks());
    store.initialize().await.unwrap();
    store
}

pub fn ids(thoughts: &[Thought]) -> Vec<String> {
    thoughts.iter().map(|t| t.id().to_string()).collect()
}
