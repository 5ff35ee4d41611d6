//! Prompt construction for product tag generation.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use tagsmith_catalog::Product;

/// Fixed system instruction constraining the model's output contract.
pub(crate) const SYSTEM_PROMPT: &str = "\
You are a product tagging assistant for a Shopify store.
Given a product's title, description, vendor, product type, and other attributes,
generate a list of relevant tags that will help with search, filtering, and SEO.

Rules:
- Return ONLY a JSON object like {\"tags\": [\"tag1\", \"tag2\", ...]}
- All tags should be lowercase strings
- Include tags for: category, material, color, style, season, use-case, audience
- Keep tags concise (1-3 words each)
- Generate 5-15 tags per product
- Do not include the product title verbatim as a tag
- Focus on attributes that customers would search for";

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("HTML tag pattern is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Structured product payload embedded in the user message.
#[derive(Debug, Serialize)]
pub struct ProductInfo {
    pub title: String,
    /// `body_html` with markup stripped and whitespace collapsed.
    pub description: String,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub variants: Vec<VariantInfo>,
}

#[derive(Debug, Serialize)]
pub struct VariantInfo {
    pub option1: Option<String>,
    pub option2: Option<String>,
    pub option3: Option<String>,
    pub price: Option<String>,
}

impl ProductInfo {
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            description: strip_html(product.body_html.as_deref().unwrap_or_default()),
            vendor: product.vendor.clone(),
            product_type: product.product_type.clone(),
            variants: product
                .variants
                .iter()
                .map(|v| VariantInfo {
                    option1: v.option1.clone(),
                    option2: v.option2.clone(),
                    option3: v.option3.clone(),
                    price: v.price.clone(),
                })
                .collect(),
        }
    }
}

/// Replaces markup tags with single spaces and collapses runs of whitespace.
pub(crate) fn strip_html(html: &str) -> String {
    let without_tags = HTML_TAG.replace_all(html, " ");
    WHITESPACE.replace_all(&without_tags, " ").trim().to_owned()
}
