//! Shopify Admin API wire types for the `products` resource.
//!
//! Unlike the public storefront `products.json` endpoint, the Admin REST
//! API stores and returns `tags` as a single comma-delimited string
//! (e.g. `"red, cotton, summer"`); splitting and normalizing that string
//! is the pipeline's job, not the wire layer's.

use serde::Deserialize;

/// Top-level response from `GET /admin/api/{version}/products.json`.
#[derive(Debug, Deserialize)]
pub(crate) struct ProductsResponse {
    pub products: Vec<Product>,
}

/// Response envelope for single-product endpoints (`GET`/`PUT .../products/{id}.json`).
#[derive(Debug, Deserialize)]
pub(crate) struct ProductResponse {
    pub product: Product,
}

/// A product as returned by the Admin REST API.
///
/// Read snapshot only: the pipeline never mutates these in place; updates
/// go through [`crate::CatalogClient::update_product_tags`].
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    /// Shopify numeric product ID.
    pub id: i64,

    pub title: String,

    /// Raw HTML product description. May be `null` or absent.
    #[serde(default)]
    pub body_html: Option<String>,

    #[serde(default)]
    pub vendor: Option<String>,

    /// Product category string; may be empty.
    #[serde(default)]
    pub product_type: Option<String>,

    /// Comma-delimited tag string as stored by the Admin API. Empty string
    /// when the product has no tags.
    #[serde(default)]
    pub tags: String,

    #[serde(default)]
    pub image: Option<ProductImage>,

    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

/// A purchasable variant of a [`Product`].
#[derive(Debug, Clone, Deserialize)]
pub struct ProductVariant {
    #[serde(default)]
    pub option1: Option<String>,

    #[serde(default)]
    pub option2: Option<String>,

    #[serde(default)]
    pub option3: Option<String>,

    /// Price as a decimal string (e.g. `"30.00"`); passed through as-is.
    #[serde(default)]
    pub price: Option<String>,
}

/// Primary product image.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductImage {
    #[serde(default)]
    pub src: Option<String>,
}
