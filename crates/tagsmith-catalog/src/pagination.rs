//! Cursor extraction from the Shopify `Link` response header.
//!
//! The Admin API carries pagination state in a `Link` header whose
//! `rel="next"` URL holds an opaque `page_info` cursor:
//!
//! ```text
//! <https://shop/admin/api/2024-10/products.json?limit=50&page_info=CURSOR>; rel="next"
//! ```
//!
//! Cursors are opaque and must be followed as given; Shopify does not
//! guarantee stable ordering across pages by offset, so offsets are never
//! reconstructed.

/// Returns the `page_info` cursor for the next page, or `None` when the
/// header is absent, has no `rel="next"` segment (last page), or the next
/// URL carries no `page_info` parameter.
pub(crate) fn next_page_cursor(link_header: Option<&str>) -> Option<String> {
    for segment in link_header?.split(',') {
        let segment = segment.trim();
        if !segment.contains(r#"rel="next""#) {
            continue;
        }

        let start = segment.find('<')? + 1;
        let end = segment.find('>')?;
        if start >= end {
            return None;
        }

        return query_param(&segment[start..end], "page_info");
    }
    None
}

/// Extracts a named query parameter from a URL string. Shopify cursors are
/// base64url-encoded, so no percent-decoding is needed.
fn query_param(url: &str, name: &str) -> Option<String> {
    let query = &url[url.find('?')? + 1..];
    let needle = format!("{name}=");
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix(needle.as_str()))
        .map(|value| value.split('#').next().unwrap_or(value))
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}
