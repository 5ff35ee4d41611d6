use serde::Serialize;
use tagsmith_pipeline::BatchSummary;

use crate::error::NotifyError;
use crate::format;

/// Incoming-webhook payload. Slack ignores `channel` for webhooks pinned
/// to a channel, but accepts it for reroutable ones.
#[derive(Debug, Serialize)]
struct SlackMessage<'a> {
    channel: &'a str,
    text: String,
}

/// Posts run summaries and failure alerts to a Slack incoming webhook.
///
/// Constructed with `webhook_url: None` the notifier is a no-op that logs
/// a warning per skipped message, so deployments without Slack configured
/// run unchanged.
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
    channel: String,
    top_tags_limit: usize,
}

impl SlackNotifier {
    #[must_use]
    pub fn new(webhook_url: Option<String>, channel: String, top_tags_limit: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url,
            channel,
            top_tags_limit,
        }
    }

    /// Sends the end-of-run summary message.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the webhook request fails or Slack
    /// responds with a non-success status. A missing webhook URL is not
    /// an error.
    pub async fn notify_run_summary(&self, summary: &BatchSummary) -> Result<(), NotifyError> {
        self.post(format::run_summary_text(summary, self.top_tags_limit))
            .await
    }

    /// Sends a single-product failure alert.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::notify_run_summary`].
    pub async fn notify_tagging_failure(
        &self,
        product_id: i64,
        title: &str,
        error: &str,
    ) -> Result<(), NotifyError> {
        self.post(format::failure_text(product_id, title, error))
            .await
    }

    async fn post(&self, text: String) -> Result<(), NotifyError> {
        let Some(webhook_url) = self.webhook_url.as_deref() else {
            tracing::warn!("SLACK_WEBHOOK_URL not set, skipping notification");
            return Ok(());
        };

        let message = SlackMessage {
            channel: &self.channel,
            text,
        };
        let response = self.client.post(webhook_url).json(&message).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("Slack notification delivered");
        Ok(())
    }
}
