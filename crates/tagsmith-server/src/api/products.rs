use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tagsmith_catalog::{CatalogClient, CatalogError, Product};
use tagsmith_pipeline::{
    summarize, BatchOrchestrator, FixedDelay, PipelineError, RunOptions,
};
use tagsmith_tagger::ModelClient;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub struct ProductListItem {
    pub id: i64,
    pub title: String,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub tags: String,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductListData {
    pub count: usize,
    pub products: Vec<ProductListItem>,
}

#[derive(Debug, Deserialize)]
pub struct TagRequest {
    #[serde(default = "default_merge")]
    pub merge: bool,
}

#[derive(Debug, Deserialize)]
pub struct TagAllRequest {
    #[serde(default = "default_merge")]
    pub merge: bool,
    #[serde(default)]
    pub dry_run: bool,
}

fn default_merge() -> bool {
    true
}

fn build_orchestrator(
    state: &AppState,
) -> BatchOrchestrator<Arc<ModelClient>, Arc<CatalogClient>, FixedDelay> {
    BatchOrchestrator::new(
        Arc::clone(&state.tagger),
        Arc::clone(&state.catalog),
        FixedDelay::from_millis(state.config.generation_inter_request_delay_ms),
        state.config.generation_max_retries,
        state.config.generation_retry_backoff_base_secs,
    )
}

fn map_catalog_error(request_id: String, error: &CatalogError) -> ApiError {
    match error {
        CatalogError::ProductNotFound { product_id } => ApiError::new(
            request_id,
            "not_found",
            format!("product {product_id} not found"),
        ),
        CatalogError::RateLimited { .. } => {
            ApiError::new(request_id, "rate_limited", error.to_string())
        }
        _ => {
            tracing::error!(error = %error, "catalog request failed");
            ApiError::new(request_id, "upstream_error", error.to_string())
        }
    }
}

/// GET /api/v1/products
///
/// Lists every product in the catalog with its current tags.
pub async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<impl IntoResponse, ApiError> {
    let products = state
        .catalog
        .fetch_all_products(
            state.config.catalog_page_size,
            state.config.catalog_inter_page_delay_ms,
        )
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), &e))?;

    let items: Vec<ProductListItem> = products.into_iter().map(list_item).collect();

    Ok(Json(ApiResponse {
        data: ProductListData {
            count: items.len(),
            products: items,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn list_item(product: Product) -> ProductListItem {
    let image = product.image.and_then(|i| i.src);
    ProductListItem {
        id: product.id,
        title: product.title,
        vendor: product.vendor,
        product_type: product.product_type,
        tags: product.tags,
        image,
    }
}

/// POST /api/v1/products/{id}/tag
///
/// Generates tags for one product and writes them back, merging with the
/// existing set unless the request says otherwise.
pub async fn tag_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<i64>,
    payload: Option<Json<TagRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let merge = payload.map_or(true, |Json(p)| p.merge);

    let product = state
        .catalog
        .fetch_product(product_id)
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), &e))?;

    let orchestrator = build_orchestrator(&state);
    let outcome = match orchestrator.tag_product(&product, merge).await {
        Ok(outcome) => outcome,
        Err(PipelineError::Generation(e)) => {
            if let Err(notify_err) = state
                .notifier
                .notify_tagging_failure(product.id, &product.title, &e.to_string())
                .await
            {
                tracing::warn!(error = %notify_err, "failure notification not delivered");
            }
            tracing::error!(product_id, error = %e, "tag generation failed");
            return Err(ApiError::new(req_id.0, "upstream_error", e.to_string()));
        }
        Err(PipelineError::Catalog(e)) => {
            return Err(map_catalog_error(req_id.0, &e));
        }
        Err(PipelineError::ProductNotFound { product_id }) => {
            return Err(ApiError::new(
                req_id.0,
                "not_found",
                format!("product {product_id} not found"),
            ));
        }
    };

    Ok(Json(ApiResponse {
        data: outcome,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/products/tag-all
///
/// Runs the whole catalog through tag generation. Only one run may be in
/// flight at a time; concurrent triggers are rejected with a conflict.
pub async fn tag_all(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Option<Json<TagAllRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let options = payload.map_or_else(RunOptions::default, |Json(p)| RunOptions {
        merge: p.merge,
        dry_run: p.dry_run,
    });

    let Ok(_guard) = state.run_lock.try_lock() else {
        return Err(ApiError::new(
            req_id.0,
            "conflict",
            "a tagging run is already in progress",
        ));
    };

    let products = state
        .catalog
        .fetch_all_products(
            state.config.catalog_page_size,
            state.config.catalog_inter_page_delay_ms,
        )
        .await
        .map_err(|e| map_catalog_error(req_id.0.clone(), &e))?;

    tracing::info!(
        count = products.len(),
        merge = options.merge,
        dry_run = options.dry_run,
        "starting tag-all run"
    );

    let orchestrator = build_orchestrator(&state);
    let results = orchestrator.run(&products, options).await;

    for result in results.iter().filter(|r| !r.success) {
        let reason = result.error.as_deref().unwrap_or("unknown error");
        if let Err(e) = state
            .notifier
            .notify_tagging_failure(result.product_id, &result.title, reason)
            .await
        {
            tracing::warn!(error = %e, "failure notification not delivered");
        }
    }

    let summary = summarize(products.len(), results, options.dry_run);

    if let Err(e) = state.notifier.notify_run_summary(&summary).await {
        tracing::warn!(error = %e, "run summary notification not delivered");
    }

    tracing::info!(
        total = summary.total,
        tagged = summary.tagged,
        failed = summary.failed,
        "tag-all run complete"
    );

    Ok(Json(ApiResponse {
        data: summary,
        meta: ResponseMeta::new(req_id.0),
    }))
}
