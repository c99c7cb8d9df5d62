//! Summary report generation.
//!
//! This module turns a finished [`Tally`] into a [`SummaryReport`] and
//! renders it as a plain-text table, Markdown or JSON.

use crate::analysis::Tally;
use crate::models::{ReportMetadata, SummaryReport};
use crate::report::format::{format_duration, format_rate, processing_rate, PlainTable};
use anyhow::Result;
use chrono::Utc;

const BANNER: &str = "****** SUMMARY ******";

/// Build a report snapshot from a tally.
///
/// The time elapsed is only reported when `elapsed_seconds` is given; the
/// processing rate additionally requires it to be positive.
pub fn build_summary(tally: &Tally, elapsed_seconds: Option<f64>, source: &str) -> SummaryReport {
    let total = tally.total();
    SummaryReport {
        metadata: ReportMetadata {
            source: source.to_string(),
            generated_at: Utc::now(),
        },
        succeeded: tally.succeeded(),
        failed: tally.failed(),
        duplicate: tally.duplicate(),
        total,
        elapsed_seconds,
        elapsed: elapsed_seconds.map(format_duration),
        files_per_minute: elapsed_seconds.and_then(|secs| processing_rate(total, secs)),
        failed_items: tally.failed_items().to_vec(),
        duplicate_items: tally.duplicate_items().to_vec(),
    }
}

/// The `Metric`/`Count` rows shared by all human-readable renderings.
fn summary_rows(report: &SummaryReport) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Success", report.succeeded.to_string()),
        ("Error", report.failed.to_string()),
        ("Duplicate, not imported", report.duplicate.to_string()),
    ];
    if let Some(ref elapsed) = report.elapsed {
        rows.push(("Time elapsed", elapsed.clone()));
        if let Some(rate) = report.files_per_minute {
            rows.push(("Processing rate", format_rate(rate)));
        }
    }
    rows
}

/// Render the console summary: banner followed by the metrics table.
pub fn generate_text_report(report: &SummaryReport, show_items: bool) -> String {
    let mut table = PlainTable::new(["Metric", "Count"]);
    for (metric, count) in summary_rows(report) {
        table.push_row([metric.to_string(), count]);
    }

    let mut output = String::new();
    output.push_str("\n\n");
    output.push_str(BANNER);
    output.push('\n');
    output.push_str(&table.to_string());

    if show_items {
        output.push_str(&generate_item_list("Failed items", &report.failed_items));
        output.push_str(&generate_item_list(
            "Duplicate items",
            &report.duplicate_items,
        ));
    }

    output
}

fn generate_item_list(title: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let mut section = format!("\n{}:\n", title);
    for item in items {
        section.push_str(&format!("  - {}\n", item));
    }
    section
}

/// Generate a Markdown summary.
pub fn generate_markdown_report(report: &SummaryReport, show_items: bool) -> String {
    let mut output = String::new();

    output.push_str("# Import Summary\n\n");

    output.push_str(&format!("- **Source:** {}\n", report.metadata.source));
    output.push_str(&format!(
        "- **Generated:** {}\n",
        report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!("- **Total Items:** {}\n\n", report.total));

    output.push_str("| Metric | Count |\n");
    output.push_str("|:---|:---|\n");
    for (metric, count) in summary_rows(report) {
        output.push_str(&format!("| {} | {} |\n", metric, count));
    }
    output.push('\n');

    if show_items {
        output.push_str(&generate_markdown_item_list(
            "Failed Items",
            &report.failed_items,
        ));
        output.push_str(&generate_markdown_item_list(
            "Duplicate Items",
            &report.duplicate_items,
        ));
    }

    output
}

fn generate_markdown_item_list(title: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let mut section = format!("## {}\n\n", title);
    for item in items {
        section.push_str(&format!("- `{}`\n", item));
    }
    section.push('\n');
    section
}

/// Generate a JSON summary.
pub fn generate_json_report(report: &SummaryReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Outcome;

    fn create_test_tally() -> Tally {
        [
            Outcome::succeeded("2019/a.jpg"),
            Outcome::succeeded("2019/b.jpg"),
            Outcome::succeeded("2019/c.jpg"),
            Outcome::failed("2019/d.mov"),
            Outcome::duplicate("2019/e.jpg"),
            Outcome::duplicate("2019/f.jpg"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_text_report_without_timing() {
        let report = build_summary(&create_test_tally(), None, "stdin");
        let text = generate_text_report(&report, false);

        let expected = "\n\n****** SUMMARY ******
Metric                   Count
-----------------------  -----
Success                  3
Error                    1
Duplicate, not imported  2
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_text_report_with_timing() {
        let report = build_summary(&create_test_tally(), Some(125.0), "stdin");
        let text = generate_text_report(&report, false);

        assert!(text.contains("Time elapsed             2 minutes 5 seconds\n"));
        assert!(text.contains("Processing rate          2.9 files / minute\n"));
    }

    #[test]
    fn test_rate_omitted_for_zero_elapsed() {
        let report = build_summary(&create_test_tally(), Some(0.0), "stdin");
        assert_eq!(report.files_per_minute, None);

        let text = generate_text_report(&report, false);
        assert!(text.contains("Time elapsed"));
        assert!(text.contains("0 seconds"));
        assert!(!text.contains("Processing rate"));
    }

    #[test]
    fn test_rate_value() {
        let report = build_summary(&create_test_tally(), Some(30.0), "stdin");
        assert_eq!(report.files_per_minute, Some(12.0));
    }

    #[test]
    fn test_text_report_is_idempotent() {
        let tally = create_test_tally();
        let first = generate_text_report(&build_summary(&tally, Some(61.0), "x"), true);
        let second = generate_text_report(&build_summary(&tally, Some(61.0), "x"), true);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rendering_same_report_twice_is_identical() {
        let report = build_summary(&create_test_tally(), Some(125.0), "outcomes.tsv");

        assert_eq!(
            generate_text_report(&report, true),
            generate_text_report(&report, true)
        );
        assert_eq!(
            generate_markdown_report(&report, true),
            generate_markdown_report(&report, true)
        );
        assert_eq!(
            generate_json_report(&report).unwrap(),
            generate_json_report(&report).unwrap()
        );
    }

    #[test]
    fn test_text_report_item_lists() {
        let report = build_summary(&create_test_tally(), None, "stdin");
        let text = generate_text_report(&report, true);

        assert!(text.contains("\nFailed items:\n  - 2019/d.mov\n"));
        assert!(text.contains("\nDuplicate items:\n  - 2019/e.jpg\n  - 2019/f.jpg\n"));
    }

    #[test]
    fn test_item_lists_skip_empty_sections() {
        let tally: Tally = [Outcome::succeeded("a.jpg")].into_iter().collect();
        let text = generate_text_report(&build_summary(&tally, None, "stdin"), true);

        assert!(!text.contains("Failed items"));
        assert!(!text.contains("Duplicate items"));
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = build_summary(&create_test_tally(), Some(3661.0), "outcomes.tsv");
        let markdown = generate_markdown_report(&report, true);

        assert!(markdown.contains("# Import Summary"));
        assert!(markdown.contains("- **Source:** outcomes.tsv"));
        assert!(markdown.contains("| Duplicate, not imported | 2 |"));
        assert!(markdown.contains("| Time elapsed | 1 hours 1 minutes 1 seconds |"));
        assert!(markdown.contains("## Failed Items\n\n- `2019/d.mov`\n"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = build_summary(&create_test_tally(), None, "stdin");
        let json = generate_json_report(&report).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["succeeded"], 3);
        assert_eq!(value["total"], 6);
        assert_eq!(value["duplicate_items"][1], "2019/f.jpg");
        assert!(value.get("elapsed").is_none());
        assert!(value.get("files_per_minute").is_none());
    }
}
