use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The model endpoint returned a non-success response.
    #[error("model returned status {status}: {body}")]
    Generation { status: u16, body: String },

    /// The model responded, but not with one of the two accepted shapes
    /// (a `{"tags": [...]}` object or a bare JSON array of strings).
    #[error("model response not parseable as a tag list: {reason}")]
    Parse { reason: String },

    #[error("invalid model API base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl TaggerError {
    /// Whether the error is worth retrying: network failures, rate limits,
    /// and server-side errors. Parse failures are deterministic per response
    /// and never retried here; the orchestrator owns retry policy.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            TaggerError::Http(_) => true,
            TaggerError::Generation { status, .. } => *status == 429 || *status >= 500,
            TaggerError::Parse { .. } | TaggerError::InvalidBaseUrl { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_and_server_errors_are_transient() {
        assert!(TaggerError::Generation {
            status: 429,
            body: String::new()
        }
        .is_transient());
        assert!(TaggerError::Generation {
            status: 529,
            body: String::new()
        }
        .is_transient());
    }

    #[test]
    fn client_errors_and_parse_failures_are_not_transient() {
        assert!(!TaggerError::Generation {
            status: 400,
            body: String::new()
        }
        .is_transient());
        assert!(!TaggerError::Parse {
            reason: "nope".to_owned()
        }
        .is_transient());
    }
}
