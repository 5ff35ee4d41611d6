//! HTTP client for the Shopify Admin REST API.

mod fetch_all;

use std::time::Duration;

use reqwest::Client;

use crate::error::CatalogError;
use crate::pagination::next_page_cursor;
use crate::retry::retry_with_backoff;
use crate::types::{Product, ProductResponse, ProductsResponse};

/// Admin API version pinned by this client.
const API_VERSION: &str = "2024-10";

/// Maximum number of pages to fetch before returning an error.
/// Prevents infinite loops on cycling cursors.
pub(super) const MAX_PAGES: usize = 200;

/// Client for the Shopify Admin REST `products` resource.
///
/// Authenticates with a static per-shop access token
/// (`X-Shopify-Access-Token`). Transient errors (429, 5xx, network
/// failures) are retried with exponential backoff up to `max_retries`
/// additional attempts; everything else surfaces as a typed
/// [`CatalogError`] carrying the upstream status and body.
pub struct CatalogClient {
    client: Client,
    /// Store origin, e.g. `https://my-shop.myshopify.com`, without a
    /// trailing slash.
    base_url: String,
    /// Shop identifier used in error messages.
    shop: String,
    access_token: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl CatalogClient {
    /// Creates a client for the given shop domain
    /// (e.g. `my-shop.myshopify.com`).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidShopDomain`] if the domain does not
    /// form a valid HTTPS origin, or [`CatalogError::Http`] if the
    /// underlying `reqwest::Client` cannot be constructed.
    pub fn new(
        shop_domain: &str,
        access_token: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, CatalogError> {
        let origin = format!("https://{}", shop_domain.trim_end_matches('/'));
        reqwest::Url::parse(&origin).map_err(|e| CatalogError::InvalidShopDomain {
            shop: shop_domain.to_owned(),
            reason: e.to_string(),
        })?;
        Self::with_base_url(
            &origin,
            access_token,
            timeout_secs,
            max_retries,
            backoff_base_secs,
        )
    }

    /// Creates a client against an explicit base URL (for testing with a
    /// mock server).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        base_url: &str,
        access_token: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tagsmith/0.1 (catalog-enrichment)")
            .build()?;

        let base_url = base_url.trim_end_matches('/').to_owned();
        let shop = base_url
            .strip_prefix("https://")
            .or_else(|| base_url.strip_prefix("http://"))
            .unwrap_or(&base_url)
            .to_owned();

        Ok(Self {
            client,
            base_url,
            shop,
            access_token: access_token.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches one page of products, returning the page plus the opaque
    /// cursor for the next page (if any).
    ///
    /// # Errors
    ///
    /// - [`CatalogError::RateLimited`]: HTTP 429 after all retries exhausted.
    /// - [`CatalogError::UpstreamStatus`]: any other non-2xx status (5xx retried, 4xx not).
    /// - [`CatalogError::Http`]: network or TLS failure after all retries exhausted.
    /// - [`CatalogError::Deserialize`]: response body is not a products payload (not retried).
    pub async fn fetch_products_page(
        &self,
        limit: u32,
        page_info: Option<&str>,
    ) -> Result<(Vec<Product>, Option<String>), CatalogError> {
        let url = self.products_url(limit, page_info);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header("X-Shopify-Access-Token", &self.access_token)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?;

                let status = response.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    return Err(self.rate_limited(&response));
                }
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(CatalogError::UpstreamStatus {
                        status: status.as_u16(),
                        body,
                    });
                }

                // Extract the Link header before consuming the response body.
                let link_header = response
                    .headers()
                    .get(reqwest::header::LINK)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);

                let body = response.text().await?;
                let parsed = serde_json::from_str::<ProductsResponse>(&body).map_err(|e| {
                    CatalogError::Deserialize {
                        context: format!("products page from {}", self.shop),
                        source: e,
                    }
                })?;

                Ok((parsed.products, next_page_cursor(link_header.as_deref())))
            }
        })
        .await
    }

    /// Fetches a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] on 404; otherwise the same
    /// error surface as [`Self::fetch_products_page`].
    pub async fn fetch_product(&self, product_id: i64) -> Result<Product, CatalogError> {
        let url = self.resource_url(&format!("products/{product_id}.json"));

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header("X-Shopify-Access-Token", &self.access_token)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?;

                self.decode_product(response, product_id).await
            }
        })
        .await
    }

    /// Applies a tag set to a product and returns the updated product.
    ///
    /// The tags are rendered as a comma-and-space-joined string and sent as
    /// a full product update keyed by ID. No optimistic-concurrency headers
    /// are used, so concurrent external edits to the same product can be
    /// silently overwritten, a documented consistency gap.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] on 404; otherwise the same
    /// error surface as [`Self::fetch_products_page`].
    pub async fn update_product_tags(
        &self,
        product_id: i64,
        tags: &[String],
    ) -> Result<Product, CatalogError> {
        let url = self.resource_url(&format!("products/{product_id}.json"));
        let payload = serde_json::json!({
            "product": { "id": product_id, "tags": tags.join(", ") }
        });

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            let payload = payload.clone();
            async move {
                let response = self
                    .client
                    .put(&url)
                    .header("X-Shopify-Access-Token", &self.access_token)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .json(&payload)
                    .send()
                    .await?;

                self.decode_product(response, product_id).await
            }
        })
        .await
    }

    /// Shared status handling + body decode for single-product endpoints.
    async fn decode_product(
        &self,
        response: reqwest::Response,
        product_id: i64,
    ) -> Result<Product, CatalogError> {
        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(self.rate_limited(&response));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::ProductNotFound { product_id });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed =
            serde_json::from_str::<ProductResponse>(&body).map_err(|e| {
                CatalogError::Deserialize {
                    context: format!("product {product_id} from {}", self.shop),
                    source: e,
                }
            })?;

        Ok(parsed.product)
    }

    fn rate_limited(&self, response: &reqwest::Response) -> CatalogError {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);

        CatalogError::RateLimited {
            shop: self.shop.clone(),
            retry_after_secs,
        }
    }

    fn resource_url(&self, path: &str) -> String {
        format!("{}/admin/api/{API_VERSION}/{path}", self.base_url)
    }

    fn products_url(&self, limit: u32, page_info: Option<&str>) -> String {
        let mut url = format!("{}?limit={limit}", self.resource_url("products.json"));
        if let Some(cursor) = page_info {
            url.push_str("&page_info=");
            url.push_str(cursor);
        }
        url
    }
}
