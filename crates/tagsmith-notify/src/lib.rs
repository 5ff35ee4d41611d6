//! Slack notifications for tagging runs via incoming webhooks.
//!
//! The notifier is best-effort throughout: a missing webhook URL disables
//! it silently, and callers are expected to log delivery failures rather
//! than fail the run that produced them.

mod error;
mod format;
mod slack;

pub use error::NotifyError;
pub use slack::SlackNotifier;
