//! Multi-page product retrieval for `CatalogClient`.

use std::time::Duration;

use crate::error::CatalogError;
use crate::types::Product;

use super::{CatalogClient, MAX_PAGES};

impl CatalogClient {
    /// Fetches every product in the catalog by following `Link`-header
    /// cursors until no `rel="next"` link remains.
    ///
    /// The first request uses `page_size`; later pages follow the opaque
    /// cursor supplied by the previous response. `inter_page_delay_ms` is
    /// slept between page requests (after every page except the first).
    ///
    /// All pages are accumulated into one in-memory `Vec` before returning:
    /// the batch stage needs the full set length up front for its summary,
    /// and a partial list would make the run totals lie.
    ///
    /// **All-or-nothing**: any page failure discards products from earlier
    /// pages and returns the error.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_products_page`], and returns
    /// [`CatalogError::PaginationLimit`] if the page count exceeds
    /// [`MAX_PAGES`].
    pub async fn fetch_all_products(
        &self,
        page_size: u32,
        inter_page_delay_ms: u64,
    ) -> Result<Vec<Product>, CatalogError> {
        let mut all_products: Vec<Product> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(CatalogError::PaginationLimit {
                    shop: self.shop.clone(),
                    max_pages: MAX_PAGES,
                });
            }

            if page_count > 1 && inter_page_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(inter_page_delay_ms)).await;
            }

            let (products, next_cursor) =
                self.fetch_products_page(page_size, cursor.as_deref()).await?;

            tracing::debug!(
                page = page_count,
                count = products.len(),
                has_next = next_cursor.is_some(),
                "fetched catalog page"
            );

            all_products.extend(products);

            cursor = next_cursor;
            if cursor.is_none() {
                break;
            }
        }

        Ok(all_products)
    }
}
