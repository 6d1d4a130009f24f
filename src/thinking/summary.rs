//! Whole-session summary.
//!
//! [`summarize`] never fails: an empty history yields a flat message, and an
//! internal computation failure degrades to a count plus error text.

use anyhow::{anyhow, ensure, Result};
use serde::Serialize;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::panic::{self, UnwindSafe};

use crate::thinking::types::{Thought, ThoughtStage};

pub const NO_THOUGHTS_MESSAGE: &str = "No thoughts recorded yet";
const TOP_TAGS: usize = 5;

/// `{"summary": ...}` wrapper returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub summary: Summary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Summary {
    /// No thoughts recorded; serialized as a bare string.
    Empty(String),
    Report(SessionSummary),
    Degraded(DegradedSummary),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total_thoughts: usize,
    /// Counts for the stages that actually occur.
    pub stages: BTreeMap<ThoughtStage, usize>,
    pub timeline: Vec<TimelineEntry>,
    pub top_tags: Vec<TagCount>,
    pub completion_status: CompletionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub number: u32,
    pub stage: ThoughtStage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStatus {
    pub has_all_stages: bool,
    /// `count / max(total_sequence_length) * 100` over the whole history.
    pub percent_complete: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DegradedSummary {
    pub total_thoughts: usize,
    pub error: String,
}

impl SummaryResponse {
    pub fn is_empty(&self) -> bool {
        matches!(self.summary, Summary::Empty(_))
    }

    pub fn report(&self) -> Option<&SessionSummary> {
        match &self.summary {
            Summary::Report(report) => Some(report),
            _ => None,
        }
    }
}

/// Summarize a full history.
pub fn summarize(thoughts: &[Thought]) -> SummaryResponse {
    if thoughts.is_empty() {
        return SummaryResponse {
            summary: Summary::Empty(NO_THOUGHTS_MESSAGE.into()),
        };
    }

    SummaryResponse {
        summary: guarded(thoughts, build_report),
    }
}

/// Run `build`, turning an error or a panic into [`Summary::Degraded`].
fn guarded<F>(thoughts: &[Thought], build: F) -> Summary
where
    F: FnOnce(&[Thought]) -> Result<SessionSummary> + UnwindSafe,
{
    let outcome = panic::catch_unwind(|| build(thoughts))
        .unwrap_or_else(|payload| Err(anyhow!(panic_message(payload.as_ref()))));

    match outcome {
        Ok(report) => Summary::Report(report),
        Err(e) => {
            tracing::error!(error = %e, "error generating summary");
            Summary::Degraded(DegradedSummary {
                total_thoughts: thoughts.len(),
                error: e.to_string(),
            })
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "summary computation panicked".to_string()
    }
}

fn build_report(thoughts: &[Thought]) -> Result<SessionSummary> {
    let mut stages: BTreeMap<ThoughtStage, usize> = BTreeMap::new();
    for thought in thoughts {
        *stages.entry(thought.stage()).or_default() += 1;
    }

    let mut ordered: Vec<&Thought> = thoughts.iter().collect();
    ordered.sort_by_key(|t| t.sequence_number());
    let timeline = ordered
        .into_iter()
        .map(|t| TimelineEntry {
            number: t.sequence_number(),
            stage: t.stage(),
        })
        .collect();

    // Declared maximum, not any single thought's total. Sessions mixing totals
    // get a percentage relative to the largest one.
    let max_total = thoughts
        .iter()
        .map(Thought::total_sequence_length)
        .max()
        .unwrap_or(0);
    let percent_complete = if max_total > 0 {
        thoughts.len() as f64 / f64::from(max_total) * 100.0
    } else {
        0.0
    };
    ensure!(
        percent_complete.is_finite(),
        "completion percentage is not finite ({} / {max_total})",
        thoughts.len()
    );
    tracing::debug!(
        count = thoughts.len(),
        max_total,
        percent_complete,
        "calculated completion"
    );

    let has_all_stages = ThoughtStage::ALL.iter().all(|s| stages.contains_key(s));

    Ok(SessionSummary {
        total_thoughts: thoughts.len(),
        stages,
        timeline,
        top_tags: top_tags(thoughts, TOP_TAGS),
        completion_status: CompletionStatus {
            has_all_stages,
            percent_complete,
        },
    })
}

/// Most frequent tags, descending by count; ties keep first-seen order.
fn top_tags(thoughts: &[Thought], limit: usize) -> Vec<TagCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<TagCount> = Vec::new();
    for tag in thoughts.iter().flat_map(|t| t.tags()) {
        match index.get(tag.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(tag.as_str(), counts.len());
                counts.push(TagCount {
                    tag: tag.clone(),
                    count: 1,
                });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}
