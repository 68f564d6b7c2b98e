//! Category name derivation
//!
//! A category's folder name is derived from its URL by trying an ordered list
//! of strategies; the first one that yields a name wins.

use url::Url;

/// Path segments that introduce a listing name (`/collections/<name>`)
pub const LISTING_MARKERS: &[&str] = &["collections", "collection", "categories", "category"];

/// A single way of deriving a category name from a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryNameStrategy {
    /// Segment following a listing marker
    ListingMarker,
    /// Last non-empty path segment
    LastSegment,
    /// Host with dots replaced by underscores
    Host,
}

impl CategoryNameStrategy {
    /// Strategies in the order they are tried
    pub const ORDERED: [CategoryNameStrategy; 3] = [
        CategoryNameStrategy::ListingMarker,
        CategoryNameStrategy::LastSegment,
        CategoryNameStrategy::Host,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ListingMarker => "listing-marker",
            Self::LastSegment => "last-segment",
            Self::Host => "host",
        }
    }

    /// Applies this strategy, returning `None` when it does not match
    pub fn apply(&self, url: &Url) -> Option<String> {
        match self {
            Self::ListingMarker => LISTING_MARKERS
                .iter()
                .find_map(|marker| segment_after(url, marker)),
            Self::LastSegment => path_segments(url).last().map(|s| s.to_string()),
            Self::Host => url
                .host_str()
                .filter(|h| !h.is_empty())
                .map(|h| h.replace('.', "_")),
        }
    }
}

/// Extracts a readable category name from a category URL
///
/// # Examples
///
/// ```
/// use catalog_harvester::url::extract_category_name;
///
/// assert_eq!(
///     extract_category_name("https://shop.example/collections/all-pillows"),
///     "all-pillows"
/// );
/// assert_eq!(extract_category_name("https://shop.example/bedding/duvets/"), "duvets");
/// assert_eq!(extract_category_name("https://shop.example/"), "shop_example");
/// ```
pub fn extract_category_name(category_url: &str) -> String {
    let Ok(url) = Url::parse(category_url.trim()) else {
        return category_url
            .trim()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
    };

    for strategy in CategoryNameStrategy::ORDERED {
        if let Some(name) = strategy.apply(&url) {
            tracing::trace!("Category name '{}' from strategy {}", name, strategy.name());
            return name;
        }
    }

    "category".to_string()
}

/// Returns the path segment directly following `marker`, if any
pub(crate) fn segment_after(url: &Url, marker: &str) -> Option<String> {
    let segments = path_segments(url);
    segments
        .iter()
        .position(|s| *s == marker)
        .and_then(|i| segments.get(i + 1))
        .map(|s| s.to_string())
}

fn path_segments(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}
