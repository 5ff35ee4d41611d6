//! HTTP client for the Anthropic messages API.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use tagsmith_catalog::Product;

use crate::error::TaggerError;
use crate::parse::parse_tags;
use crate::prompt::{ProductInfo, SYSTEM_PROMPT};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// Client for single-product tag generation.
///
/// Holds the reqwest client, API key, and model parameters. Use
/// [`ModelClient::new`] for production or [`ModelClient::with_base_url`] to
/// point at a mock server in tests. Does not retry: per-item retry policy
/// belongs to the batch orchestrator, and the model call is not required to
/// be deterministic anyway.
pub struct ModelClient {
    client: Client,
    api_key: String,
    messages_url: String,
    model: String,
    max_tokens: u32,
}

impl ModelClient {
    /// Creates a client pointed at the production Anthropic API.
    ///
    /// # Errors
    ///
    /// Returns [`TaggerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        model: &str,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> Result<Self, TaggerError> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, model, max_tokens, timeout_secs)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`TaggerError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`TaggerError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        base_url: &str,
        api_key: &str,
        model: &str,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> Result<Self, TaggerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tagsmith/0.1 (catalog-enrichment)")
            .build()?;

        let trimmed = base_url.trim_end_matches('/');
        reqwest::Url::parse(trimmed).map_err(|e| TaggerError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            messages_url: format!("{trimmed}/v1/messages"),
            model: model.to_owned(),
            max_tokens,
        })
    }

    /// Generates a normalized tag list for one product.
    ///
    /// The only guaranteed-deterministic part of this call is the
    /// normalization of whatever the model returns (lowercase + trim);
    /// tests stub the model with fixtures rather than exercising it live.
    ///
    /// # Errors
    ///
    /// - [`TaggerError::Generation`]: non-success response from the model endpoint.
    /// - [`TaggerError::Parse`]: reply is not one of the two accepted shapes.
    /// - [`TaggerError::Http`]: network or TLS failure.
    pub async fn generate_tags(&self, product: &Product) -> Result<Vec<String>, TaggerError> {
        let info = ProductInfo::from_product(product);
        let payload = serde_json::to_string_pretty(&info).map_err(|e| TaggerError::Parse {
            reason: format!("failed to serialize product payload: {e}"),
        })?;

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: format!("Generate tags for this product:\n{payload}"),
            }],
        };

        let response = self
            .client
            .post(&self.messages_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TaggerError::Generation {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: MessagesResponse =
            serde_json::from_str(&body).map_err(|e| TaggerError::Parse {
                reason: format!("unexpected messages response envelope: {e}"),
            })?;

        let text = parsed
            .content
            .first()
            .map(|block| block.text.as_str())
            .ok_or_else(|| TaggerError::Parse {
                reason: "messages response has no content blocks".to_owned(),
            })?;

        let tags = parse_tags(text)?;
        tracing::debug!(product_id = product.id, count = tags.len(), "generated tags");
        Ok(tags)
    }
}
