//! CLI `summary` command — print the session summary.

use anyhow::Result;
use std::path::PathBuf;

use sequential_thinking::config::ThinkingConfig;
use sequential_thinking::thinking::summary::Summary;

/// Print a human-readable summary of the current session.
pub async fn summary(config: &ThinkingConfig, storage_dir: Option<PathBuf>) -> Result<()> {
    let session = sequential_thinking::server::open_session(config, storage_dir).await?;
    let response = session.summarize();

    let report = match &response.summary {
        Summary::Report(report) => report,
        Summary::Empty(message) => {
            println!("{message}");
            return Ok(());
        }
        Summary::Degraded(degraded) => {
            println!("Total thoughts:   {}", degraded.total_thoughts);
            println!("Summary failed:   {}", degraded.error);
            return Ok(());
        }
    };

    println!("Thinking Session Summary");
    println!("{}", "=".repeat(40));
    println!("  Total thoughts:  {}", report.total_thoughts);
    println!(
        "  Complete:        {:.1}%{}",
        report.completion_status.percent_complete,
        if report.completion_status.has_all_stages {
            " (all stages covered)"
        } else {
            ""
        }
    );
    println!();

    println!("By Stage:");
    for (stage, count) in &report.stages {
        println!("  {:<20} {}", stage.as_str(), count);
    }
    println!();

    println!("Timeline:");
    for entry in &report.timeline {
        println!("  #{:<4} {}", entry.number, entry.stage);
    }

    if !report.top_tags.is_empty() {
        println!();
        println!("Top Tags:");
        for tag in &report.top_tags {
            println!("  {:<20} {}", tag.tag, tag.count);
        }
    }

    Ok(())
}
