//! Product URL classification
//!
//! Listing pages link to plenty of navigation and promotional pages. These
//! checks decide whether a discovered URL is a product page of the category it
//! was found on.

use crate::url::category::segment_after;
use crate::url::normalize::normalize;
use std::collections::HashSet;
use url::Url;

/// Listing marker used for structured `/collections/<name>/products/<slug>` stores
pub const LISTING_MARKER: &str = "collections";

/// Segment that follows the listing name on structured product URLs
pub const PRODUCT_MARKER: &str = "products";

/// Path fragments that identify a product page in the generic nested-path check
pub const PRODUCT_INDICATORS: &[&str] = &["/products/", "/product/", "/item/", "/p/"];

/// Checks if a candidate URL is a product page belonging to the given category
///
/// # Rules
///
/// 1. The candidate is resolved against the category URL and trailing slashes
///    are stripped from both
/// 2. Different hosts (or ports) are rejected
/// 3. When both URLs contain `/collections/`, the candidate is accepted if it
///    contains `/collections/<name>/products/` for the category's listing name
/// 4. Otherwise it is accepted if its path is a strict sub-path of the
///    category path and contains one of [`PRODUCT_INDICATORS`]
///
/// # Examples
///
/// ```
/// use catalog_harvester::url::belongs_to_category;
///
/// let category = "https://site.example/collections/pillows";
/// assert!(belongs_to_category("https://site.example/collections/pillows/products/foo", category));
/// assert!(!belongs_to_category("https://site.example/collections/blankets/products/bar", category));
/// assert!(!belongs_to_category("https://other.example/collections/pillows/products/foo", category));
/// ```
pub fn belongs_to_category(candidate: &str, category: &str) -> bool {
    let Ok(product) = normalize(candidate, category) else {
        return false;
    };
    let product = product.trim_end_matches('/');
    let category = category.trim().trim_end_matches('/');

    let (Ok(product_url), Ok(category_url)) = (Url::parse(product), Url::parse(category)) else {
        return false;
    };

    if product_url.host_str() != category_url.host_str()
        || product_url.port() != category_url.port()
    {
        return false;
    }

    let marker = format!("/{}/", LISTING_MARKER);
    if category.contains(&marker) && product.contains(&marker) {
        if let Some(name) = segment_after(&category_url, LISTING_MARKER) {
            let expected = format!("/{}/{}/{}/", LISTING_MARKER, name, PRODUCT_MARKER);
            if product_url.path().contains(&expected) {
                return true;
            }
        }
    }

    is_nested_product(&product_url, &category_url)
}

/// Generic check: strict sub-path of the category carrying a product indicator
fn is_nested_product(product: &Url, category: &Url) -> bool {
    let category_path = category.path().trim_end_matches('/');
    let product_path = product.path();

    let nested = product_path.starts_with(&format!("{}/", category_path))
        && product_path.trim_end_matches('/') != category_path;
    if !nested {
        return false;
    }

    PRODUCT_INDICATORS
        .iter()
        .any(|indicator| product_path.contains(indicator))
}

/// Filters discovered URLs down to the product pages of one category
///
/// Each URL is resolved against the category URL; rejected URLs are logged,
/// never treated as errors. Discovery order is preserved and duplicates (after
/// resolution, ignoring a trailing slash) keep only their first occurrence.
pub fn filter_product_urls<S: AsRef<str>>(urls: &[S], category: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut filtered = Vec::new();

    for url in urls {
        let raw = url.as_ref();
        let normalized = match normalize(raw, category) {
            Ok(n) => n,
            Err(e) => {
                tracing::debug!("Skipping unresolvable URL {}: {}", raw, e);
                continue;
            }
        };

        if !belongs_to_category(&normalized, category) {
            tracing::debug!("Skipping non-category URL: {}", raw);
            continue;
        }

        if seen.insert(normalized.trim_end_matches('/').to_string()) {
            filtered.push(normalized);
        } else {
            tracing::debug!("Skipping duplicate product URL: {}", normalized);
        }
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    const PILLOWS: &str = "https://site.example/collections/pillows";

    #[test]
    fn test_collection_product_accepted() {
        assert!(belongs_to_category(
            "https://site.example/collections/pillows/products/foo",
            PILLOWS
        ));
    }

    #[test]
    fn test_other_collection_rejected() {
        assert!(!belongs_to_category(
            "https://site.example/collections/blankets/products/bar",
            PILLOWS
        ));
    }

    #[test]
    fn test_other_host_rejected() {
        assert!(!belongs_to_category(
            "https://other.example/collections/pillows/products/foo",
            PILLOWS
        ));
    }

    #[test]
    fn test_other_port_rejected() {
        assert!(!belongs_to_category(
            "https://site.example:8443/collections/pillows/products/foo",
            PILLOWS
        ));
    }

    #[test]
    fn test_relative_candidate_resolved() {
        assert!(belongs_to_category(
            "/collections/pillows/products/foo",
            PILLOWS
        ));
        assert!(belongs_to_category(
            "/collections/pillows/products/foo/",
            "https://site.example/collections/pillows/"
        ));
    }

    #[test]
    fn test_bare_product_path_rejected_for_collection() {
        // Shopify-style /products/<slug> is not nested under the collection
        assert!(!belongs_to_category(
            "https://site.example/products/foo",
            PILLOWS
        ));
    }

    #[test]
    fn test_collection_page_itself_rejected() {
        assert!(!belongs_to_category(PILLOWS, PILLOWS));
        assert!(!belongs_to_category(
            "https://site.example/collections/pillows/",
            PILLOWS
        ));
        // No product slug after the marker
        assert!(!belongs_to_category(
            "https://site.example/collections/pillows/products/",
            PILLOWS
        ));
    }

    #[test]
    fn test_generic_nested_product() {
        let category = "https://shop.example/bedding";
        assert!(belongs_to_category(
            "https://shop.example/bedding/item/42",
            category
        ));
        assert!(belongs_to_category(
            "https://shop.example/bedding/p/42",
            category
        ));
        assert!(belongs_to_category(
            "https://shop.example/bedding/product/duvet",
            category
        ));
    }

    #[test]
    fn test_generic_requires_indicator() {
        assert!(!belongs_to_category(
            "https://shop.example/bedding/about",
            "https://shop.example/bedding"
        ));
    }

    #[test]
    fn test_generic_requires_segment_boundary() {
        assert!(!belongs_to_category(
            "https://shop.example/beddingsale/p/1",
            "https://shop.example/bedding"
        ));
    }

    #[test]
    fn test_generic_not_nested_rejected() {
        assert!(!belongs_to_category(
            "https://shop.example/kitchen/p/1",
            "https://shop.example/bedding"
        ));
    }

    #[test]
    fn test_filter_keeps_order_and_resolves() {
        let urls = vec![
            "/collections/pillows/products/b",
            "https://site.example/pages/about",
            "https://site.example/collections/pillows/products/a",
            "https://site.example/collections/blankets/products/c",
        ];
        let filtered = filter_product_urls(&urls, PILLOWS);
        assert_eq!(
            filtered,
            vec![
                "https://site.example/collections/pillows/products/b",
                "https://site.example/collections/pillows/products/a",
            ]
        );
    }

    #[test]
    fn test_filter_drops_duplicates() {
        let urls = vec![
            "https://site.example/collections/pillows/products/a".to_string(),
            "/collections/pillows/products/a".to_string(),
        ];
        assert_eq!(filter_product_urls(&urls, PILLOWS).len(), 1);
    }

    #[test]
    fn test_filter_trailing_slash_is_duplicate() {
        let urls = vec![
            "https://site.example/collections/pillows/products/a",
            "https://site.example/collections/pillows/products/a/",
            "/collections/pillows/products/b/",
            "/collections/pillows/products/b",
        ];
        assert_eq!(
            filter_product_urls(&urls, PILLOWS),
            vec![
                "https://site.example/collections/pillows/products/a",
                "https://site.example/collections/pillows/products/b/",
            ]
        );
    }

    #[test]
    fn test_filter_empty_input() {
        let urls: Vec<String> = Vec::new();
        assert!(filter_product_urls(&urls, PILLOWS).is_empty());
    }
}
