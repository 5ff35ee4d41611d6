//! Sequential batch orchestration with per-item failure isolation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tagsmith_catalog::{CatalogClient, CatalogError, Product};
use tagsmith_tagger::{ModelClient, TaggerError};

use crate::error::PipelineError;
use crate::limiter::RateLimiter;
use crate::merge::{merge_tags, render_tags};
use crate::types::{AppliedResult, RunOptions, SingleTagOutcome};

/// Per-product tag generation. Implemented by [`ModelClient`]; tests
/// substitute scripted fakes.
pub trait TagSource: Send + Sync {
    fn generate(
        &self,
        product: &Product,
    ) -> impl Future<Output = Result<Vec<String>, TaggerError>> + Send;
}

/// Tag write-back. Implemented by [`CatalogClient`]; tests substitute
/// counting fakes to verify dry runs never write.
pub trait TagSink: Send + Sync {
    fn apply_tags(
        &self,
        product_id: i64,
        tags: &[String],
    ) -> impl Future<Output = Result<(), CatalogError>> + Send;
}

impl TagSource for ModelClient {
    fn generate(
        &self,
        product: &Product,
    ) -> impl Future<Output = Result<Vec<String>, TaggerError>> + Send {
        self.generate_tags(product)
    }
}

impl TagSink for CatalogClient {
    fn apply_tags(
        &self,
        product_id: i64,
        tags: &[String],
    ) -> impl Future<Output = Result<(), CatalogError>> + Send {
        async move {
            self.update_product_tags(product_id, tags).await?;
            Ok(())
        }
    }
}

impl<T: TagSource> TagSource for Arc<T> {
    fn generate(
        &self,
        product: &Product,
    ) -> impl Future<Output = Result<Vec<String>, TaggerError>> + Send {
        T::generate(self, product)
    }
}

impl<T: TagSink> TagSink for Arc<T> {
    fn apply_tags(
        &self,
        product_id: i64,
        tags: &[String],
    ) -> impl Future<Output = Result<(), CatalogError>> + Send {
        T::apply_tags(self, product_id, tags)
    }
}

/// Drives tag generation over a catalog snapshot.
///
/// Iteration is strictly sequential: one product's generation call
/// completes before the next begins, with the limiter's pause in between
/// as the sole backpressure against the model API.
/// A failure on one product (generation or write) is recorded in that
/// product's result and never aborts the rest of the run.
pub struct BatchOrchestrator<G, W, L> {
    generator: G,
    writer: W,
    limiter: L,
    /// Additional attempts for transient generation errors.
    max_retries: u32,
    retry_backoff_base_secs: u64,
}

impl<G, W, L> BatchOrchestrator<G, W, L>
where
    G: TagSource,
    W: TagSink,
    L: RateLimiter,
{
    pub fn new(
        generator: G,
        writer: W,
        limiter: L,
        max_retries: u32,
        retry_backoff_base_secs: u64,
    ) -> Self {
        Self {
            generator,
            writer,
            limiter,
            max_retries,
            retry_backoff_base_secs,
        }
    }

    /// Runs the batch over a catalog snapshot, returning exactly one
    /// [`AppliedResult`] per product, in input order.
    pub async fn run(&self, products: &[Product], options: RunOptions) -> Vec<AppliedResult> {
        let mut results = Vec::with_capacity(products.len());

        for (index, product) in products.iter().enumerate() {
            if index > 0 {
                self.limiter.acquire().await;
            }
            results.push(self.process_product(product, options).await);
        }

        results
    }

    /// Tags a single product outside a batch: generate, merge (or replace),
    /// and write back unconditionally. Unlike [`Self::run`], failures
    /// propagate; there are no sibling items to isolate them from.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Generation`] if the model call fails after
    /// retries, or [`PipelineError::Catalog`] if the write fails.
    pub async fn tag_product(
        &self,
        product: &Product,
        merge: bool,
    ) -> Result<SingleTagOutcome, PipelineError> {
        let generated = self.generate_with_retry(product).await?;

        let final_set = if merge {
            merge_tags(&product.tags, &generated)
        } else {
            generated.clone()
        };

        self.writer.apply_tags(product.id, &final_set).await?;

        Ok(SingleTagOutcome {
            product_id: product.id,
            title: product.title.clone(),
            previous_tags: product.tags.clone(),
            new_tags: render_tags(&final_set),
            ai_generated: generated,
        })
    }

    async fn process_product(&self, product: &Product, options: RunOptions) -> AppliedResult {
        let generated = match self.generate_with_retry(product).await {
            Ok(tags) => tags,
            Err(e) => {
                tracing::warn!(
                    product_id = product.id,
                    title = %product.title,
                    error = %e,
                    "tag generation failed; continuing with remaining products"
                );
                return AppliedResult {
                    product_id: product.id,
                    title: product.title.clone(),
                    tags: Vec::new(),
                    success: false,
                    error: Some(e.to_string()),
                    previous_tags: product.tags.clone(),
                    final_tags: product.tags.clone(),
                    applied: false,
                };
            }
        };

        let final_set = if options.merge {
            merge_tags(&product.tags, &generated)
        } else {
            generated.clone()
        };
        let final_tags = render_tags(&final_set);

        if options.dry_run {
            return AppliedResult {
                product_id: product.id,
                title: product.title.clone(),
                tags: generated,
                success: true,
                error: None,
                previous_tags: product.tags.clone(),
                final_tags,
                applied: false,
            };
        }

        match self.writer.apply_tags(product.id, &final_set).await {
            Ok(()) => AppliedResult {
                product_id: product.id,
                title: product.title.clone(),
                tags: generated,
                success: true,
                error: None,
                previous_tags: product.tags.clone(),
                final_tags,
                applied: true,
            },
            Err(e) => {
                tracing::warn!(
                    product_id = product.id,
                    title = %product.title,
                    error = %e,
                    "tag write failed; continuing with remaining products"
                );
                AppliedResult {
                    product_id: product.id,
                    title: product.title.clone(),
                    tags: generated,
                    success: false,
                    error: Some(e.to_string()),
                    previous_tags: product.tags.clone(),
                    final_tags,
                    applied: false,
                }
            }
        }
    }

    /// Bounded retry for transient generation errors (network, 429, 5xx).
    /// The model client itself never retries.
    async fn generate_with_retry(&self, product: &Product) -> Result<Vec<String>, TaggerError> {
        let mut attempt = 0u32;

        loop {
            let err = match self.generator.generate(product).await {
                Ok(tags) => return Ok(tags),
                Err(err) => {
                    if !err.is_transient() || attempt >= self.max_retries {
                        return Err(err);
                    }
                    err
                }
            };

            let delay_secs = self
                .retry_backoff_base_secs
                .saturating_mul(1u64 << attempt.min(62));
            tracing::warn!(
                product_id = product.id,
                attempt,
                max_retries = self.max_retries,
                delay_secs,
                error = %err,
                "transient generation error, retrying after backoff"
            );
            tokio::time::sleep(Duration::from_secs(delay_secs)).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
