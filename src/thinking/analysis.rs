//! Relationship analysis over a thought history.
//!
//! All functions here are pure: they read a history slice and never touch
//! storage. [`find_related`] ranks same-stage thoughts first, then thoughts
//! sharing tags; [`analyze`] builds the report returned for a submitted thought.

use serde::Serialize;
use std::collections::HashSet;

use crate::thinking::types::{Thought, ThoughtStage};

pub const DEFAULT_MAX_RELATED: usize = 3;
const SNIPPET_CHARS: usize = 100;

/// Thoughts related to `target`, at most `max_results`, never `target` itself.
///
/// Same-stage thoughts come first in history order, then thoughts sharing at
/// least one tag ordered by shared-tag count (descending, stable).
pub fn find_related<'a>(
    target: &Thought,
    all_thoughts: &'a [Thought],
    max_results: usize,
) -> Vec<&'a Thought> {
    let same_stage = all_thoughts
        .iter()
        .filter(|t| t.stage() == target.stage() && t.id() != target.id());

    let target_tags: HashSet<&str> = target.tags().iter().map(String::as_str).collect();
    let mut tag_related: Vec<(&Thought, usize)> = if target_tags.is_empty() {
        Vec::new()
    } else {
        all_thoughts
            .iter()
            .filter(|t| t.id() != target.id())
            .filter_map(|t| {
                let shared = t
                    .tags()
                    .iter()
                    .map(String::as_str)
                    .collect::<HashSet<_>>()
                    .intersection(&target_tags)
                    .count();
                (shared > 0).then_some((t, shared))
            })
            .collect()
    };
    tag_related.sort_by(|a, b| b.1.cmp(&a.1));

    let mut seen: HashSet<&str> = HashSet::new();
    same_stage
        .chain(tag_related.into_iter().map(|(t, _)| t))
        .filter(|&t| seen.insert(t.id()))
        .take(max_results)
        .collect()
}

/// True when no other thought in `all_thoughts` shares `target`'s stage.
pub fn is_first_in_stage(target: &Thought, all_thoughts: &[Thought]) -> bool {
    all_thoughts
        .iter()
        .filter(|t| t.stage() == target.stage())
        .count()
        <= 1
}

/// Report for a single thought in the context of its history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtAnalysis {
    pub thought_analysis: AnalysisReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    #[serde(rename = "currentThought")]
    pub current_thought: CurrentThought,
    pub analysis: AnalysisBlock,
    pub context: AnalysisContext,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentThought {
    pub thought_number: u32,
    pub total_thoughts: u32,
    pub next_thought_needed: bool,
    pub stage: ThoughtStage,
    pub tags: Vec<String>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisBlock {
    pub related_thoughts_count: usize,
    pub related_thought_summaries: Vec<RelatedThoughtSummary>,
    /// `sequence_number / total_sequence_length * 100` for this thought alone.
    pub progress: f64,
    pub is_first_in_stage: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedThoughtSummary {
    pub thought_number: u32,
    pub stage: ThoughtStage,
    pub snippet: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisContext {
    pub thought_history_length: usize,
    pub current_stage: ThoughtStage,
}

/// Analyze `target` against `all_thoughts` (which normally includes it).
pub fn analyze(
    target: &Thought,
    all_thoughts: &[Thought],
    max_related: usize,
) -> ThoughtAnalysis {
    let related = find_related(target, all_thoughts, max_related);
    let progress =
        f64::from(target.sequence_number()) / f64::from(target.total_sequence_length()) * 100.0;

    ThoughtAnalysis {
        thought_analysis: AnalysisReport {
            current_thought: CurrentThought {
                thought_number: target.sequence_number(),
                total_thoughts: target.total_sequence_length(),
                next_thought_needed: target.continuation(),
                stage: target.stage(),
                tags: target.tags().to_vec(),
                timestamp: target.created_at().to_string(),
            },
            analysis: AnalysisBlock {
                related_thoughts_count: related.len(),
                related_thought_summaries: related
                    .iter()
                    .map(|t| RelatedThoughtSummary {
                        thought_number: t.sequence_number(),
                        stage: t.stage(),
                        snippet: snippet(t.text()),
                    })
                    .collect(),
                progress,
                is_first_in_stage: is_first_in_stage(target, all_thoughts),
            },
            context: AnalysisContext {
                thought_history_length: all_thoughts.len(),
                current_stage: target.stage(),
            },
        },
    }
}

/// First 100 characters of `text`, with `...` appended when cut.
fn snippet(text: &str) -> String {
    match text.char_indices().nth(SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
