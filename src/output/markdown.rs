//! Markdown report generation
//!
//! This module renders the completion report as a markdown document that is
//! written next to the crawled content.

use crate::output::stats::CrawlReport;
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Number of failures listed individually before the table is truncated
const MAX_LISTED_FAILURES: usize = 50;

/// Crawl facts that are not part of the counters
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub seed: &'a str,
    pub depth_limit: u32,
    pub same_domain_only: bool,
    pub location: &'a str,
}

/// Writes the markdown report to `output_path`
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn generate_markdown_report(
    report: &CrawlReport,
    context: &ReportContext<'_>,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_report(report, context);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_report(report: &CrawlReport, context: &ReportContext<'_>) -> String {
    let stats = &report.stats;
    let mut md = String::new();

    md.push_str("# Site-Harvest Crawl Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", context.seed));
    md.push_str(&format!("- **Started**: {}\n", stats.started_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        report.elapsed.as_secs_f64()
    ));
    md.push_str(&format!("- **Status**: {}\n", report.final_state));
    md.push_str(&format!("- **Depth Limit**: {}\n", context.depth_limit));
    md.push_str(&format!(
        "- **Same Domain Only**: {}\n",
        if context.same_domain_only { "yes" } else { "no" }
    ));
    md.push_str(&format!("- **Output**: {}\n\n", context.location));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str("| Counter | Value |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Total | {} |\n", stats.total));
    md.push_str(&format!("| Success | {} |\n", stats.success));
    md.push_str(&format!("| Failed | {} |\n", stats.failed));
    md.push_str(&format!("| Skipped | {} |\n", stats.skipped));
    if let Some(rate) = report.throughput() {
        md.push_str(&format!("| Pages/second | {:.2} |\n", rate));
    }
    md.push('\n');

    // Depth breakdown
    if !stats.pages_by_depth.is_empty() {
        md.push_str("## Depth Breakdown\n\n");
        md.push_str("| Depth | Pages |\n");
        md.push_str("|-------|-------|\n");
        for (depth, count) in &stats.pages_by_depth {
            md.push_str(&format!("| {} | {} |\n", depth, count));
        }
        md.push('\n');
    }

    // Failures
    if !stats.failures.is_empty() {
        md.push_str("## Failures\n\n");
        md.push_str("| URL | Cause |\n");
        md.push_str("|-----|-------|\n");
        for failure in stats.failures.iter().take(MAX_LISTED_FAILURES) {
            md.push_str(&format!(
                "| {} | {} |\n",
                failure.url,
                failure.reason.replace('|', "\\|")
            ));
        }
        if stats.failures.len() > MAX_LISTED_FAILURES {
            md.push_str(&format!(
                "\n... and {} more\n",
                stats.failures.len() - MAX_LISTED_FAILURES
            ));
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::CrawlStats;
    use crate::state::CrawlState;
    use std::time::Duration;

    fn context() -> ReportContext<'static> {
        ReportContext {
            seed: "https://example.com/",
            depth_limit: 2,
            same_domain_only: true,
            location: "/tmp/out",
        }
    }

    fn create_test_report() -> CrawlReport {
        let mut stats = CrawlStats::new();
        stats.record_success(0);
        stats.record_success(1);
        stats.record_success(1);
        stats.record_failure("https://example.com/missing", "HTTP status 404");
        CrawlReport {
            stats,
            elapsed: Duration::from_secs(3),
            final_state: CrawlState::Finished,
        }
    }

    #[test]
    fn test_format_markdown_report() {
        let markdown = format_markdown_report(&create_test_report(), &context());

        assert!(markdown.contains("# Site-Harvest Crawl Report"));
        assert!(markdown.contains("- **Seed**: https://example.com/"));
        assert!(markdown.contains("- **Status**: finished"));
        assert!(markdown.contains("| Total | 4 |"));
        assert!(markdown.contains("| Success | 3 |"));
        assert!(markdown.contains("| Pages/second | 1.00 |"));
    }

    #[test]
    fn test_markdown_with_depth_breakdown() {
        let markdown = format_markdown_report(&create_test_report(), &context());

        assert!(markdown.contains("Depth Breakdown"));
        assert!(markdown.contains("| 0 | 1 |"));
        assert!(markdown.contains("| 1 | 2 |"));
    }

    #[test]
    fn test_markdown_lists_failures() {
        let markdown = format_markdown_report(&create_test_report(), &context());

        assert!(markdown.contains("## Failures"));
        assert!(markdown.contains("| https://example.com/missing | HTTP status 404 |"));
    }

    #[test]
    fn test_markdown_without_failures_or_time() {
        let report = CrawlReport {
            stats: CrawlStats::new(),
            elapsed: Duration::ZERO,
            final_state: CrawlState::Interrupted,
        };
        let markdown = format_markdown_report(&report, &context());

        assert!(!markdown.contains("## Failures"));
        assert!(!markdown.contains("Pages/second"));
        assert!(markdown.contains("interrupted"));
    }

    #[test]
    fn test_generate_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("crawl_report.md");
        generate_markdown_report(&create_test_report(), &context(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Site-Harvest Crawl Report"));
    }
}
