//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring tag-all run.

use std::sync::Arc;

use tagsmith_catalog::CatalogClient;
use tagsmith_notify::SlackNotifier;
use tagsmith_pipeline::{summarize, BatchOrchestrator, FixedDelay, RunOptions};
use tagsmith_tagger::ModelClient;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Registers the scheduled tag-all job and starts the scheduler. Returns
/// the running [`JobScheduler`] handle, which must be kept alive for the
/// lifetime of the process; dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    config: Arc<tagsmith_core::AppConfig>,
    catalog: Arc<CatalogClient>,
    tagger: Arc<ModelClient>,
    notifier: Arc<SlackNotifier>,
    run_lock: Arc<Mutex<()>>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let schedule = config.tag_schedule.clone();
    let job = Job::new_async(schedule.as_str(), move |_uuid, _lock| {
        let config = Arc::clone(&config);
        let catalog = Arc::clone(&catalog);
        let tagger = Arc::clone(&tagger);
        let notifier = Arc::clone(&notifier);
        let run_lock = Arc::clone(&run_lock);

        Box::pin(async move {
            tracing::info!("scheduler: starting scheduled tag-all run");
            run_tagging_job(&config, catalog, tagger, &notifier, &run_lock).await;
            tracing::info!("scheduler: scheduled tag-all run complete");
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

/// Drive one full-catalog tagging run with default options.
///
/// Shares the run lock with the HTTP trigger: if a run is already in
/// flight this invocation is skipped entirely rather than queued.
async fn run_tagging_job(
    config: &tagsmith_core::AppConfig,
    catalog: Arc<CatalogClient>,
    tagger: Arc<ModelClient>,
    notifier: &SlackNotifier,
    run_lock: &Mutex<()>,
) {
    let Ok(_guard) = run_lock.try_lock() else {
        tracing::info!("scheduler: a tagging run is already in progress; skipping");
        return;
    };

    let products = match catalog
        .fetch_all_products(config.catalog_page_size, config.catalog_inter_page_delay_ms)
        .await
    {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "scheduler: catalog fetch failed; aborting run");
            return;
        }
    };

    if products.is_empty() {
        tracing::info!("scheduler: catalog is empty; nothing to tag");
        return;
    }

    let orchestrator = BatchOrchestrator::new(
        tagger,
        Arc::clone(&catalog),
        FixedDelay::from_millis(config.generation_inter_request_delay_ms),
        config.generation_max_retries,
        config.generation_retry_backoff_base_secs,
    );

    let results = orchestrator.run(&products, RunOptions::default()).await;

    for result in results.iter().filter(|r| !r.success) {
        let reason = result.error.as_deref().unwrap_or("unknown error");
        if let Err(e) = notifier
            .notify_tagging_failure(result.product_id, &result.title, reason)
            .await
        {
            tracing::warn!(error = %e, "scheduler: failure notification not delivered");
        }
    }

    let summary = summarize(products.len(), results, false);

    tracing::info!(
        total = summary.total,
        tagged = summary.tagged,
        failed = summary.failed,
        "scheduler: tagging run finished"
    );

    if let Err(e) = notifier.notify_run_summary(&summary).await {
        tracing::warn!(error = %e, "scheduler: run summary notification not delivered");
    }
}
