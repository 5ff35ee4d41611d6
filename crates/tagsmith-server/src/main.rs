mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use tagsmith_catalog::CatalogClient;
use tagsmith_notify::SlackNotifier;
use tagsmith_tagger::ModelClient;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(tagsmith_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let catalog = Arc::new(CatalogClient::new(
        &config.shop_domain,
        &config.shopify_access_token,
        config.catalog_request_timeout_secs,
        config.catalog_max_retries,
        config.catalog_retry_backoff_base_secs,
    )?);
    let tagger = Arc::new(ModelClient::new(
        &config.anthropic_api_key,
        &config.model,
        config.model_max_tokens,
        config.model_request_timeout_secs,
    )?);
    let notifier = Arc::new(SlackNotifier::new(
        config.slack_webhook_url.clone(),
        config.slack_channel.clone(),
        config.top_tags_limit,
    ));
    let run_lock = Arc::new(Mutex::new(()));

    let _scheduler = scheduler::build_scheduler(
        Arc::clone(&config),
        Arc::clone(&catalog),
        Arc::clone(&tagger),
        Arc::clone(&notifier),
        Arc::clone(&run_lock),
    )
    .await?;

    let auth = AuthState::from_env(matches!(config.env, tagsmith_core::Environment::Development))?;
    let app = build_app(
        AppState {
            config: Arc::clone(&config),
            catalog,
            tagger,
            notifier,
            run_lock,
        },
        auth,
    );

    tracing::info!(addr = %config.bind_addr, shop = %config.shop_domain, "starting server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
