use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Slack webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Slack webhook returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}
