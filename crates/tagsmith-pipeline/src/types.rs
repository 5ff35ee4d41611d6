//! Result and summary types for one pipeline run.
//!
//! Everything here is ephemeral: a run recomputes from the catalog's
//! current state and nothing is persisted between runs.

use serde::Serialize;

/// Mode flags for a run. Defaults mirror the trigger surface:
/// merge with existing tags, write the result back.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Merge generated tags with the product's existing ones; when false,
    /// generated tags replace the existing set entirely.
    pub merge: bool,
    /// Generate and merge, but suppress the write-back step.
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            merge: true,
            dry_run: false,
        }
    }
}

/// Per-product outcome of one run.
///
/// Invariant: `success == false` implies `applied == false`.
#[derive(Debug, Clone, Serialize)]
pub struct AppliedResult {
    pub product_id: i64,
    pub title: String,
    /// Generated tags, normalized; empty when generation failed.
    pub tags: Vec<String>,
    pub success: bool,
    /// Present iff `success == false`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Raw tag string snapshot taken before the run touched the product.
    pub previous_tags: String,
    /// Merged set rendered in the catalog's comma-and-space format. For a
    /// failed item nothing was merged, so this equals `previous_tags`.
    pub final_tags: String,
    /// True iff a write was performed (always false on dry runs).
    pub applied: bool,
}

/// Terminal artifact of one run; consumed once by the notifier and the
/// caller. `results.len() == total` for every run.
///
/// `generated` and `tagged` are distinct on purpose: a dry run reports how
/// many products generated successfully while `tagged` stays 0, since
/// nothing was written.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    /// Count of results with `success == true`.
    pub generated: usize,
    /// Count of results with `applied == true`.
    pub tagged: usize,
    /// Count of results with `success == false`.
    pub failed: usize,
    pub dry_run: bool,
    pub results: Vec<AppliedResult>,
}

/// One entry of the top-tag frequency ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Outcome of tagging a single product via the trigger surface.
#[derive(Debug, Clone, Serialize)]
pub struct SingleTagOutcome {
    pub product_id: i64,
    pub title: String,
    pub previous_tags: String,
    /// Final tag string written to (or, on a merge=false run, replacing)
    /// the catalog entry.
    pub new_tags: String,
    /// The tags the model generated, before merging.
    pub ai_generated: Vec<String>,
}
