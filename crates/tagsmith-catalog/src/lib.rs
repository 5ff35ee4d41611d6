//! Shopify Admin REST client for the product catalog.
//!
//! Provides paginated product retrieval (cursor-based via the `Link`
//! response header), single-product lookup, and tag write-back, with typed
//! errors and bounded retry on transient failures.

mod client;
mod error;
mod pagination;
mod retry;
mod types;

pub use client::CatalogClient;
pub use error::CatalogError;
pub use types::{Product, ProductImage, ProductVariant};
