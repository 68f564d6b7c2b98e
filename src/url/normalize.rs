use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves a possibly-relative URL into an absolute one
///
/// # Resolution Rules
///
/// 1. Protocol-relative (`//host/path`): adopt the base's scheme
/// 2. Root-relative (`/path`): resolve against the base's scheme and host
/// 3. Already absolute (has a scheme): returned unchanged
/// 4. Anything else: resolved as a relative reference against `base`
///
/// Surrounding whitespace is ignored.
///
/// # Arguments
///
/// * `url` - The URL or reference to resolve
/// * `base` - The absolute URL of the page the reference was found on
///
/// # Returns
///
/// * `Ok(String)` - Absolute URL
/// * `Err(UrlError)` - The base (or the resolved reference) could not be parsed
///
/// # Examples
///
/// ```
/// use catalog_harvester::url::normalize;
///
/// assert_eq!(normalize("/a/b", "https://x.com/y").unwrap(), "https://x.com/a/b");
/// assert_eq!(
///     normalize("//cdn.x.com/i.jpg", "https://x.com/y").unwrap(),
///     "https://cdn.x.com/i.jpg"
/// );
/// assert_eq!(
///     normalize("rel/path", "https://x.com/a/").unwrap(),
///     "https://x.com/a/rel/path"
/// );
/// ```
pub fn normalize(url: &str, base: &str) -> UrlResult<String> {
    let url = url.trim();

    if has_scheme(url) {
        return Ok(url.to_string());
    }

    let base = Url::parse(base.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", base, e)))?;

    if url.starts_with("//") {
        return Ok(format!("{}:{}", base.scheme(), url));
    }

    // Url::join handles both root-relative and path-relative references
    let joined = base
        .join(url)
        .map_err(|e| UrlError::Parse(format!("{}: {}", url, e)))?;

    Ok(joined.to_string())
}

/// Promotes a protocol-relative URL to https, leaving everything else as is
pub fn promote_protocol_relative(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{}", url)
    } else {
        url.to_string()
    }
}

fn has_scheme(url: &str) -> bool {
    !url.starts_with('/') && Url::parse(url).is_ok()
}
