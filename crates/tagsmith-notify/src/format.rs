//! Slack mrkdwn rendering for run summaries and failure alerts.

use std::fmt::Write;

use tagsmith_pipeline::{top_tags, BatchSummary};

const MAX_FAILURES_LISTED: usize = 10;

/// Renders the end-of-run summary message.
pub(crate) fn run_summary_text(summary: &BatchSummary, top_tags_limit: usize) -> String {
    let emoji = if summary.failed > 0 {
        ":warning:"
    } else {
        ":white_check_mark:"
    };
    let status = if summary.dry_run { "DRY RUN" } else { "COMPLETE" };

    let mut text = format!(
        "{emoji} *Product Auto-Tagger {status}*\n\n\
         • *Total products:* {}\n\
         • *Successfully tagged:* {}\n\
         • *Failed:* {}",
        summary.total, summary.tagged, summary.failed
    );

    let ranking = top_tags(&summary.results, top_tags_limit);
    if !ranking.is_empty() {
        let rendered: Vec<String> = ranking
            .iter()
            .map(|t| format!("`{}` ({})", t.tag, t.count))
            .collect();
        let _ = write!(text, "\n\n*Top tags generated:* {}", rendered.join(", "));
    }

    let failures: Vec<_> = summary.results.iter().filter(|r| !r.success).collect();
    if !failures.is_empty() {
        text.push_str("\n\n*Failed products:*");
        for result in failures.iter().take(MAX_FAILURES_LISTED) {
            let reason = result.error.as_deref().unwrap_or("unknown error");
            let _ = write!(text, "\n• _{}_: {reason}", result.title);
        }
        if failures.len() > MAX_FAILURES_LISTED {
            let _ = write!(text, "\n_...and {} more_", failures.len() - MAX_FAILURES_LISTED);
        }
    }

    text
}

/// Renders a single-product failure alert.
pub(crate) fn failure_text(product_id: i64, title: &str, error: &str) -> String {
    format!(":x: *Tagging failed* for product _{title}_ (ID: {product_id})\n*Error:* {error}")
}
