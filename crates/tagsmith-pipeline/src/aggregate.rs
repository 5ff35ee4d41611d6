//! Run-outcome aggregation: summary counts and tag-frequency ranking.

use std::collections::HashMap;

use crate::types::{AppliedResult, BatchSummary, TagCount};

/// Computes the summary for one run. Pure and deterministic given its
/// inputs; `total` is the size of the catalog snapshot the run iterated,
/// which by the run invariant equals `results.len()`.
#[must_use]
pub fn summarize(total: usize, results: Vec<AppliedResult>, dry_run: bool) -> BatchSummary {
    let generated = results.iter().filter(|r| r.success).count();
    let tagged = results.iter().filter(|r| r.applied).count();
    let failed = results.iter().filter(|r| !r.success).count();

    BatchSummary {
        total,
        generated,
        tagged,
        failed,
        dry_run,
        results,
    }
}

/// Top-`limit` frequency ranking over the generated tags of successful
/// results. Descending count; ties broken by first-encountered order
/// across the result sequence (stable).
#[must_use]
pub fn top_tags(results: &[AppliedResult], limit: usize) -> Vec<TagCount> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut next_rank = 0usize;

    for result in results {
        if !result.success {
            continue;
        }
        for tag in &result.tags {
            let entry = counts.entry(tag.as_str()).or_insert_with(|| {
                let first_seen = next_rank;
                next_rank += 1;
                (0, first_seen)
            });
            entry.0 += 1;
        }
    }

    let mut ranking: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(tag, (count, first_seen))| (tag, count, first_seen))
        .collect();
    ranking.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranking.truncate(limit);

    ranking
        .into_iter()
        .map(|(tag, count, _)| TagCount {
            tag: tag.to_owned(),
            count,
        })
        .collect()
}
