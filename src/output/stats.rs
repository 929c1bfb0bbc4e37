//! Console rendering of crawl statistics

use crate::output::traits::CrawlSummary;

/// Prints the crawl summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &CrawlSummary) {
    print!("{}", format_summary(summary));
}

/// Renders the crawl summary as text
pub fn format_summary(summary: &CrawlSummary) -> String {
    let mut out = String::new();
    let stats = &summary.frontier;

    out.push_str("=== Crawl Statistics ===\n\n");

    out.push_str("Overview:\n");
    out.push_str(&format!("  Seed: {}\n", summary.seed_url));
    out.push_str(&format!("  Max depth: {}\n", summary.max_depth));
    out.push_str(&format!(
        "  Started: {}\n",
        summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(duration) = summary.duration_seconds() {
        out.push_str(&format!("  Duration: {:.1}s\n", duration));
    }
    out.push_str(&format!("  Unique domains: {}\n", summary.unique_domains));
    out.push('\n');

    out.push_str("Links:\n");
    out.push_str(&format!("  Queued: {}\n", stats.queued));
    out.push_str(&format!("  Fetched: {}\n", stats.visited));
    out.push_str(&format!(
        "  Skipped at depth limit: {}\n",
        stats.skipped_at_depth_limit
    ));
    out.push_str(&format!("  Dropped after fetch failure: {}\n", stats.dropped));
    out.push_str(&format!("  Rejected: {}\n", stats.total_rejected()));
    out.push('\n');

    let breakdown = summary.rejection_breakdown();
    if !breakdown.is_empty() {
        out.push_str("Rejections by Reason:\n");
        for (reason, count) in breakdown {
            out.push_str(&format!("  {}: {}\n", reason, count));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "Success Rate: {:.1}% ({} / {} pages fetched)\n",
        summary.success_rate(),
        stats.visited,
        summary.pages_fetched()
    ));

    out
}
