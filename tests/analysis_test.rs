mod helpers;

use helpers::thought;
use sequential_thinking::thinking::analysis::DEFAULT_MAX_RELATED;
use sequential_thinking::thinking::summary::{Summary, NO_THOUGHTS_MESSAGE};
use sequential_thinking::thinking::{
    analyze, find_related, is_first_in_stage, summarize, ThoughtStage,
};
use serde_json::json;

#[test]
fn related_by_stage_excludes_target() {
    let a = thought("A", 1, 3, "Problem Definition", &[]);
    let b = thought("B", 2, 3, "Research", &[]);
    let c = thought("C", 3, 3, "Problem Definition", &[]);
    let all = vec![a.clone(), b, c.clone()];

    let related = find_related(&a, &all, DEFAULT_MAX_RELATED);

    assert_eq!(related, vec![&c]);
}

#[test]
fn related_by_tags_keeps_history_order_on_ties() {
    let d = thought("D", 1, 4, "Research", &["climate"]);
    let e = thought("E", 2, 4, "Analysis", &["climate"]);
    let f = thought("F", 3, 4, "Synthesis", &["economy"]);
    let g = thought("G", 4, 4, "Conclusion", &["climate"]);
    let all = vec![d.clone(), e.clone(), f, g.clone()];

    let related = find_related(&g, &all, DEFAULT_MAX_RELATED);

    assert_eq!(related, vec![&d, &e]);
}

#[test]
fn related_ranks_tag_matches_by_shared_count() {
    let one = thought("one tag", 1, 4, "Research", &["a", "x"]);
    let two = thought("two tags", 2, 4, "Analysis", &["a", "b", "b"]);
    let target = thought("target", 3, 4, "Conclusion", &["a", "b", "a"]);
    let all = vec![one.clone(), two.clone(), target.clone()];

    let related = find_related(&target, &all, DEFAULT_MAX_RELATED);

    assert_eq!(related, vec![&two, &one]);
}

#[test]
fn related_fills_from_stage_first_then_tags_without_duplicates() {
    let s1 = thought("s1", 1, 6, "Research", &["k"]);
    let s2 = thought("s2", 2, 6, "Research", &[]);
    let t1 = thought("t1", 3, 6, "Analysis", &["k"]);
    let t2 = thought("t2", 4, 6, "Synthesis", &["k"]);
    let target = thought("target", 5, 6, "Research", &["k"]);
    let all = vec![s1.clone(), s2.clone(), t1.clone(), t2, target.clone()];

    let related = find_related(&target, &all, 3);

    assert_eq!(related, vec![&s1, &s2, &t1]);
    assert!(find_related(&target, &all, 0).is_empty());
}

#[test]
fn first_in_stage_counts_target_itself() {
    let a = thought("a", 1, 2, "Research", &[]);
    let b = thought("b", 2, 2, "Research", &[]);

    assert!(is_first_in_stage(&a, &[a.clone()]));
    assert!(is_first_in_stage(&a, &[]));
    assert!(!is_first_in_stage(&b, &[a, b.clone()]));
}

#[test]
fn summarize_empty_returns_flat_message() {
    let response = summarize(&[]);

    assert!(response.is_empty());
    assert!(matches!(&response.summary, Summary::Empty(m) if m == NO_THOUGHTS_MESSAGE));
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({ "summary": "No thoughts recorded yet" })
    );
}

#[test]
fn summarize_reports_stages_timeline_and_completion() {
    let thoughts = vec![
        thought("define", 1, 5, "Problem Definition", &["scope"]),
        thought("analyze", 3, 5, "Analysis", &["data", "scope"]),
        thought("research", 2, 5, "Research", &["data"]),
        thought("more analysis", 4, 5, "Analysis", &["data"]),
    ];

    let response = summarize(&thoughts);
    let report = response.report().expect("structured summary");

    assert_eq!(report.total_thoughts, 4);
    assert_eq!(report.stages.len(), 3);
    assert_eq!(report.stages[&ThoughtStage::Analysis], 2);
    assert_eq!(report.stages[&ThoughtStage::Research], 1);
    assert!(!report.stages.contains_key(&ThoughtStage::Conclusion));

    let numbers: Vec<u32> = report.timeline.iter().map(|e| e.number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
    assert_eq!(report.timeline[1].stage, ThoughtStage::Research);

    assert_eq!(report.top_tags[0].tag, "data");
    assert_eq!(report.top_tags[0].count, 3);
    assert_eq!(report.top_tags[1].tag, "scope");

    assert!(!report.completion_status.has_all_stages);
    assert!((report.completion_status.percent_complete - 80.0).abs() < 1e-9);
}

#[test]
fn summarize_uses_largest_declared_total() {
    let thoughts = vec![
        thought("a", 1, 2, "Problem Definition", &[]),
        thought("b", 2, 2, "Research", &[]),
        thought("c", 3, 8, "Analysis", &[]),
        thought("d", 4, 8, "Synthesis", &[]),
        thought("e", 5, 8, "Conclusion", &[]),
    ];

    let response = summarize(&thoughts);
    let report = response.report().unwrap();

    assert!(report.completion_status.has_all_stages);
    assert!((report.completion_status.percent_complete - 62.5).abs() < 1e-9);
}

#[test]
fn summarize_serializes_with_camel_case_keys() {
    let thoughts = vec![thought("only", 1, 4, "Research", &["x"])];

    let value = serde_json::to_value(summarize(&thoughts)).unwrap();

    let summary = &value["summary"];
    assert_eq!(summary["totalThoughts"], 1);
    assert_eq!(summary["stages"]["Research"], 1);
    assert_eq!(summary["timeline"][0], json!({ "number": 1, "stage": "Research" }));
    assert_eq!(summary["topTags"][0], json!({ "tag": "x", "count": 1 }));
    assert_eq!(summary["completionStatus"]["percentComplete"], 25.0);
    assert_eq!(summary["completionStatus"]["hasAllStages"], false);
}

#[test]
fn analyze_reports_progress_from_target_alone() {
    let first = thought("first", 1, 5, "Problem Definition", &["q"]);
    let second = thought("second", 2, 10, "Research", &["q"]);
    let all = vec![first.clone(), second];

    let report = analyze(&first, &all, DEFAULT_MAX_RELATED).thought_analysis;

    assert!((report.analysis.progress - 20.0).abs() < 1e-9);
    assert!(report.analysis.is_first_in_stage);
    assert_eq!(report.analysis.related_thoughts_count, 1);
    assert_eq!(report.analysis.related_thought_summaries[0].thought_number, 2);
    assert_eq!(report.context.thought_history_length, 2);
    assert_eq!(report.context.current_stage, ThoughtStage::ProblemDefinition);
    assert_eq!(report.current_thought.thought_number, 1);
    assert_eq!(report.current_thought.total_thoughts, 5);
    assert_eq!(report.current_thought.tags, vec!["q".to_string()]);
}

#[test]
fn analyze_truncates_long_snippets() {
    let long = "x".repeat(150);
    let earlier = thought(&long, 1, 2, "Research", &[]);
    let target = thought("short", 2, 2, "Research", &[]);
    let all = vec![earlier, target.clone()];

    let value = serde_json::to_value(analyze(&target, &all, DEFAULT_MAX_RELATED)).unwrap();

    let snippet = value["thoughtAnalysis"]["analysis"]["relatedThoughtSummaries"][0]["snippet"]
        .as_str()
        .unwrap();
    assert_eq!(snippet.len(), 103);
    assert!(snippet.ends_with("..."));
    assert_eq!(value["thoughtAnalysis"]["analysis"]["isFirstInStage"], false);
    assert_eq!(value["thoughtAnalysis"]["currentThought"]["stage"], "Research");
    assert_eq!(value["thoughtAnalysis"]["context"]["thoughtHistoryLength"], 2);
}
