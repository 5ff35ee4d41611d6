//! Tag generation against the Anthropic messages API.
//!
//! Builds a structured prompt from a catalog product, sends it with a fixed
//! system instruction, and parses the model's reply into a normalized
//! (lowercased, trimmed) tag list. The client never retries; retry policy
//! for transient failures belongs to the batch orchestrator.

mod client;
mod error;
mod parse;
mod prompt;

pub use client::ModelClient;
pub use error::TaggerError;
pub use prompt::ProductInfo;
