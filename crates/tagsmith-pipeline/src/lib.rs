//! Batch tag-enrichment pipeline.
//!
//! Drives per-product tag generation over a catalog snapshot, strictly
//! sequentially and rate limited, with per-item failure isolation for both
//! generation and write-back. The outcome is merged, applied, and
//! aggregated into a [`BatchSummary`].

mod aggregate;
mod error;
mod limiter;
mod merge;
mod orchestrator;
mod types;

pub use aggregate::{summarize, top_tags};
pub use error::PipelineError;
pub use limiter::{FixedDelay, RateLimiter};
pub use merge::{merge_tags, parse_tag_string, render_tags};
pub use orchestrator::{BatchOrchestrator, TagSink, TagSource};
pub use types::{AppliedResult, BatchSummary, RunOptions, SingleTagOutcome, TagCount};
