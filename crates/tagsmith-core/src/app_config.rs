use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime configuration for every tagsmith binary.
///
/// Loaded once at startup and passed explicitly into each component's
/// constructor; no component reads the environment on its own.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,

    /// Shop domain the catalog lives under, e.g. `my-shop.myshopify.com`.
    pub shop_domain: String,
    pub shopify_access_token: String,
    pub catalog_page_size: u32,
    pub catalog_request_timeout_secs: u64,
    pub catalog_max_retries: u32,
    pub catalog_retry_backoff_base_secs: u64,
    pub catalog_inter_page_delay_ms: u64,

    pub anthropic_api_key: String,
    pub model: String,
    pub model_max_tokens: u32,
    pub model_request_timeout_secs: u64,
    pub generation_max_retries: u32,
    pub generation_retry_backoff_base_secs: u64,
    /// Fixed pause between per-product generation calls.
    pub generation_inter_request_delay_ms: u64,

    pub slack_webhook_url: Option<String>,
    pub slack_channel: String,

    /// How many entries the top-tag ranking keeps in run summaries.
    pub top_tags_limit: usize,

    /// Six-field cron expression for the scheduled tag-all run.
    pub tag_schedule: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("shop_domain", &self.shop_domain)
            .field("shopify_access_token", &"[redacted]")
            .field("catalog_page_size", &self.catalog_page_size)
            .field(
                "catalog_request_timeout_secs",
                &self.catalog_request_timeout_secs,
            )
            .field("catalog_max_retries", &self.catalog_max_retries)
            .field(
                "catalog_retry_backoff_base_secs",
                &self.catalog_retry_backoff_base_secs,
            )
            .field("catalog_inter_page_delay_ms", &self.catalog_inter_page_delay_ms)
            .field("anthropic_api_key", &"[redacted]")
            .field("model", &self.model)
            .field("model_max_tokens", &self.model_max_tokens)
            .field(
                "model_request_timeout_secs",
                &self.model_request_timeout_secs,
            )
            .field("generation_max_retries", &self.generation_max_retries)
            .field(
                "generation_retry_backoff_base_secs",
                &self.generation_retry_backoff_base_secs,
            )
            .field(
                "generation_inter_request_delay_ms",
                &self.generation_inter_request_delay_ms,
            )
            .field(
                "slack_webhook_url",
                &self.slack_webhook_url.as_ref().map(|_| "[redacted]"),
            )
            .field("slack_channel", &self.slack_channel)
            .field("top_tags_limit", &self.top_tags_limit)
            .field("tag_schedule", &self.tag_schedule)
            .finish()
    }
}
