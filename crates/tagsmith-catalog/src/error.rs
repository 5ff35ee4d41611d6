use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {shop} (retry after {retry_after_secs}s)")]
    RateLimited { shop: String, retry_after_secs: u64 },

    #[error("product {product_id} not found in the catalog")]
    ProductNotFound { product_id: i64 },

    /// Any other non-success response; carries the upstream status and body.
    #[error("catalog returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("pagination limit reached for {shop}: exceeded {max_pages} pages")]
    PaginationLimit { shop: String, max_pages: usize },

    #[error("invalid shop domain \"{shop}\": {reason}")]
    InvalidShopDomain { shop: String, reason: String },
}
