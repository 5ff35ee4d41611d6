use thiserror::Error;

use tagsmith_catalog::CatalogError;
use tagsmith_tagger::TaggerError;

/// Pipeline-level failures: anything that aborts a run (or a single-product
/// tagging) as a whole, as opposed to per-item failures recorded in results.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Generation(#[from] TaggerError),

    #[error("product {product_id} not found in the catalog snapshot")]
    ProductNotFound { product_id: i64 },
}
