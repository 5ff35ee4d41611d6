use std::sync::Arc;

use clap::{Parser, Subcommand};
use tagsmith_catalog::CatalogClient;
use tagsmith_notify::SlackNotifier;
use tagsmith_pipeline::{summarize, BatchOrchestrator, FixedDelay, RunOptions};
use tagsmith_tagger::ModelClient;

#[derive(Debug, Parser)]
#[command(name = "tagsmith-cli")]
#[command(about = "Catalog tag enrichment from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List all products with their current tags.
    Products,
    /// Generate and apply tags to a single product.
    Tag {
        /// Product ID to tag.
        id: i64,
        /// Replace existing tags instead of merging with them.
        #[arg(long)]
        replace: bool,
    },
    /// Generate and apply tags across the whole catalog.
    TagAll {
        /// Generate and merge, but skip the write-back step.
        #[arg(long)]
        dry_run: bool,
        /// Replace existing tags instead of merging with them.
        #[arg(long)]
        no_merge: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = tagsmith_core::load_app_config_from_env()?;

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
    let orchestrator = BatchOrchestrator::new(
        tagger,
        Arc::clone(&catalog),
        FixedDelay::from_millis(config.generation_inter_request_delay_ms),
        config.generation_max_retries,
        config.generation_retry_backoff_base_secs,
    );

    match cli.command {
        Commands::Products => {
            let products = catalog
                .fetch_all_products(config.catalog_page_size, config.catalog_inter_page_delay_ms)
                .await?;
            println!("{} products", products.len());
            for product in &products {
                let tags = if product.tags.is_empty() {
                    "(untagged)"
                } else {
                    &product.tags
                };
                println!("{:>12}  {}  [{}]", product.id, product.title, tags);
            }
        }
        Commands::Tag { id, replace } => {
            let product = catalog.fetch_product(id).await?;
            let outcome = orchestrator.tag_product(&product, !replace).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::TagAll { dry_run, no_merge } => {
            let products = catalog
                .fetch_all_products(config.catalog_page_size, config.catalog_inter_page_delay_ms)
                .await?;
            tracing::info!(count = products.len(), "tagging catalog");

            let options = RunOptions {
                merge: !no_merge,
                dry_run,
            };
            let results = orchestrator.run(&products, options).await;
            let summary = summarize(products.len(), results, dry_run);

            let notifier = SlackNotifier::new(
                config.slack_webhook_url.clone(),
                config.slack_channel.clone(),
                config.top_tags_limit,
            );
            if let Err(e) = notifier.notify_run_summary(&summary).await {
                tracing::warn!(error = %e, "run summary notification not delivered");
            }

            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
