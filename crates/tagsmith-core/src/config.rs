use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup, no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let shop_domain = require("SHOP_DOMAIN")?;
    let shopify_access_token = require("SHOPIFY_ACCESS_TOKEN")?;
    let anthropic_api_key = require("ANTHROPIC_API_KEY")?;

    let env = parse_environment(&or_default("TAGSMITH_ENV", "development"));
    let bind_addr = parse_addr("TAGSMITH_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("TAGSMITH_LOG_LEVEL", "info");

    let catalog_page_size = parse_u32("TAGSMITH_CATALOG_PAGE_SIZE", "50")?;
    let catalog_request_timeout_secs = parse_u64("TAGSMITH_CATALOG_REQUEST_TIMEOUT_SECS", "30")?;
    let catalog_max_retries = parse_u32("TAGSMITH_CATALOG_MAX_RETRIES", "3")?;
    let catalog_retry_backoff_base_secs =
        parse_u64("TAGSMITH_CATALOG_RETRY_BACKOFF_BASE_SECS", "5")?;
    let catalog_inter_page_delay_ms = parse_u64("TAGSMITH_CATALOG_INTER_PAGE_DELAY_MS", "250")?;

    let model = or_default("TAGSMITH_MODEL", "claude-sonnet-4-5-20250929");
    let model_max_tokens = parse_u32("TAGSMITH_MODEL_MAX_TOKENS", "1024")?;
    let model_request_timeout_secs = parse_u64("TAGSMITH_MODEL_REQUEST_TIMEOUT_SECS", "60")?;
    let generation_max_retries = parse_u32("TAGSMITH_GENERATION_MAX_RETRIES", "3")?;
    let generation_retry_backoff_base_secs =
        parse_u64("TAGSMITH_GENERATION_RETRY_BACKOFF_BASE_SECS", "2")?;
    let generation_inter_request_delay_ms =
        parse_u64("TAGSMITH_GENERATION_INTER_REQUEST_DELAY_MS", "200")?;

    let slack_webhook_url = lookup("SLACK_WEBHOOK_URL").ok();
    let slack_channel = or_default("TAGSMITH_SLACK_CHANNEL", "#products");

    let top_tags_limit = parse_usize("TAGSMITH_TOP_TAGS_LIMIT", "10")?;

    // Daily at 03:00 UTC.
    let tag_schedule = or_default("TAGSMITH_TAG_SCHEDULE", "0 0 3 * * *");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        shop_domain,
        shopify_access_token,
        catalog_page_size,
        catalog_request_timeout_secs,
        catalog_max_retries,
        catalog_retry_backoff_base_secs,
        catalog_inter_page_delay_ms,
        anthropic_api_key,
        model,
        model_max_tokens,
        model_request_timeout_secs,
        generation_max_retries,
        generation_retry_backoff_base_secs,
        generation_inter_request_delay_ms,
        slack_webhook_url,
        slack_channel,
        top_tags_limit,
        tag_schedule,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated with valid values.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("SHOP_DOMAIN", "example-shop.myshopify.com");
        m.insert("SHOPIFY_ACCESS_TOKEN", "shpat_test_token");
        m.insert("ANTHROPIC_API_KEY", "sk-ant-test");
        m
    }

    #[test]
    fn parse_environment_known_values() {
        assert_eq!(parse_environment("development"), Environment::Development);
        assert_eq!(parse_environment("test"), Environment::Test);
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("staging"), Environment::Development);
    }

    #[test]
    fn build_app_config_fails_without_shop_domain() {
        let mut map = full_env();
        map.remove("SHOP_DOMAIN");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "SHOP_DOMAIN"),
            "expected MissingEnvVar(SHOP_DOMAIN), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_without_access_token() {
        let mut map = full_env();
        map.remove("SHOPIFY_ACCESS_TOKEN");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "SHOPIFY_ACCESS_TOKEN"),
            "expected MissingEnvVar(SHOPIFY_ACCESS_TOKEN), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_without_anthropic_api_key() {
        let mut map = full_env();
        map.remove("ANTHROPIC_API_KEY");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "ANTHROPIC_API_KEY"),
            "expected MissingEnvVar(ANTHROPIC_API_KEY), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map = full_env();
        map.insert("TAGSMITH_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TAGSMITH_BIND_ADDR"),
            "expected InvalidEnvVar(TAGSMITH_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_succeeds_with_all_required_vars() {
        let map = full_env();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.shop_domain, "example-shop.myshopify.com");
        assert_eq!(cfg.catalog_page_size, 50);
        assert_eq!(cfg.catalog_request_timeout_secs, 30);
        assert_eq!(cfg.catalog_max_retries, 3);
        assert_eq!(cfg.catalog_retry_backoff_base_secs, 5);
        assert_eq!(cfg.catalog_inter_page_delay_ms, 250);
        assert_eq!(cfg.model, "claude-sonnet-4-5-20250929");
        assert_eq!(cfg.model_max_tokens, 1024);
        assert_eq!(cfg.model_request_timeout_secs, 60);
        assert_eq!(cfg.generation_max_retries, 3);
        assert_eq!(cfg.generation_retry_backoff_base_secs, 2);
        assert_eq!(cfg.generation_inter_request_delay_ms, 200);
        assert!(cfg.slack_webhook_url.is_none());
        assert_eq!(cfg.slack_channel, "#products");
        assert_eq!(cfg.top_tags_limit, 10);
        assert_eq!(cfg.tag_schedule, "0 0 3 * * *");
    }

    #[test]
    fn tag_schedule_override() {
        let mut map = full_env();
        map.insert("TAGSMITH_TAG_SCHEDULE", "0 30 1 * * MON");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.tag_schedule, "0 30 1 * * MON");
    }

    #[test]
    fn catalog_page_size_override() {
        let mut map = full_env();
        map.insert("TAGSMITH_CATALOG_PAGE_SIZE", "250");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.catalog_page_size, 250);
    }

    #[test]
    fn catalog_page_size_invalid() {
        let mut map = full_env();
        map.insert("TAGSMITH_CATALOG_PAGE_SIZE", "lots");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TAGSMITH_CATALOG_PAGE_SIZE"),
            "expected InvalidEnvVar(TAGSMITH_CATALOG_PAGE_SIZE), got: {result:?}"
        );
    }

    #[test]
    fn generation_delay_override() {
        let mut map = full_env();
        map.insert("TAGSMITH_GENERATION_INTER_REQUEST_DELAY_MS", "500");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.generation_inter_request_delay_ms, 500);
    }

    #[test]
    fn generation_delay_invalid() {
        let mut map = full_env();
        map.insert("TAGSMITH_GENERATION_INTER_REQUEST_DELAY_MS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TAGSMITH_GENERATION_INTER_REQUEST_DELAY_MS"),
            "expected InvalidEnvVar(TAGSMITH_GENERATION_INTER_REQUEST_DELAY_MS), got: {result:?}"
        );
    }

    #[test]
    fn slack_webhook_url_is_optional() {
        let mut map = full_env();
        map.insert("SLACK_WEBHOOK_URL", "https://hooks.slack.example/services/T/B/x");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            cfg.slack_webhook_url.as_deref(),
            Some("https://hooks.slack.example/services/T/B/x")
        );
    }

    #[test]
    fn slack_channel_override() {
        let mut map = full_env();
        map.insert("TAGSMITH_SLACK_CHANNEL", "#ops");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.slack_channel, "#ops");
    }

    #[test]
    fn model_override() {
        let mut map = full_env();
        map.insert("TAGSMITH_MODEL", "claude-3-5-haiku-20241022");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.model, "claude-3-5-haiku-20241022");
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("shpat_test_token"));
        assert!(!rendered.contains("sk-ant-test"));
        assert!(rendered.contains("[redacted]"));
    }
}
