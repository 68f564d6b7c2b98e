//! Page condensing for the LLM extractor
//!
//! Raw HTML is mostly markup the model does not need. This module reduces a
//! page to its title, resolved links, image sources and visible text, in a
//! plain layout the model can read.

use scraper::{Html, Node, Selector};
use std::collections::HashSet;
use url::Url;

/// Elements whose text is never shown to a visitor
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "svg"];

/// Attributes that commonly hold an image source on lazy-loading storefronts
const IMAGE_ATTRIBUTES: &[&str] = &["src", "data-src", "data-original", "data-zoom-image"];

/// The parts of a page the extractor forwards to the model
#[derive(Debug, Clone, Default)]
pub struct CondensedPage {
    pub title: Option<String>,
    /// Absolute link URLs with their anchor text
    pub links: Vec<(String, String)>,
    /// Absolute image URLs with their alt text
    pub images: Vec<(String, String)>,
    pub text: String,
}

impl CondensedPage {
    /// Renders the page as prompt text, truncated to `max_chars` characters
    pub fn render(&self, max_chars: usize) -> String {
        let mut out = String::new();

        if let Some(title) = &self.title {
            out.push_str(&format!("TITLE: {}\n\n", title));
        }

        out.push_str("LINKS:\n");
        for (url, text) in &self.links {
            out.push_str(&format!("{} | {}\n", url, text));
        }

        out.push_str("\nIMAGES:\n");
        for (url, alt) in &self.images {
            out.push_str(&format!("{} | {}\n", url, alt));
        }

        out.push_str("\nTEXT:\n");
        out.push_str(&self.text);

        truncate_chars(out, max_chars)
    }
}

/// Parses HTML and extracts the condensed view of a page
///
/// Links and images are resolved against `base_url`; `javascript:`,
/// `mailto:`, `tel:`, `data:` and fragment-only references are dropped, as
/// are duplicates.
pub fn condense_html(html: &str, base_url: &Url) -> CondensedPage {
    let document = Html::parse_document(html);

    CondensedPage {
        title: extract_title(&document),
        links: extract_links(&document, base_url),
        images: extract_images(&document, base_url),
        text: extract_visible_text(&document),
    }
}

fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

fn extract_links(document: &Html, base_url: &Url) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            if let Some(absolute) = resolve_reference(href, base_url) {
                if seen.insert(absolute.clone()) {
                    let text = collapse_whitespace(&element.text().collect::<String>());
                    links.push((absolute, text));
                }
            }
        }
    }

    links
}

fn extract_images(document: &Html, base_url: &Url) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    let mut images = Vec::new();

    if let Ok(img_selector) = Selector::parse("img") {
        for element in document.select(&img_selector) {
            let attrs = element.value();
            let alt = attrs.attr("alt").map(collapse_whitespace).unwrap_or_default();

            let mut sources: Vec<&str> = IMAGE_ATTRIBUTES
                .iter()
                .filter_map(|name| attrs.attr(name))
                .collect();
            if let Some(srcset) = attrs.attr("srcset").or_else(|| attrs.attr("data-srcset")) {
                sources.extend(largest_srcset_candidate(srcset));
            }

            for source in sources {
                if let Some(absolute) = resolve_reference(source, base_url) {
                    if seen.insert(absolute.clone()) {
                        images.push((absolute, alt.clone()));
                    }
                }
            }
        }
    }

    if let Ok(og_selector) = Selector::parse("meta[property='og:image'][content]") {
        for element in document.select(&og_selector) {
            if let Some(content) = element.value().attr("content") {
                if let Some(absolute) = resolve_reference(content, base_url) {
                    if seen.insert(absolute.clone()) {
                        images.push((absolute, "og:image".to_string()));
                    }
                }
            }
        }
    }

    images
}

/// Picks the last (conventionally widest) candidate of a `srcset` attribute
fn largest_srcset_candidate(srcset: &str) -> Option<&str> {
    srcset
        .split(',')
        .filter_map(|candidate| candidate.split_whitespace().next())
        .last()
}

fn extract_visible_text(document: &Html) -> String {
    let mut pieces = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|e| e.name().to_string()))
            .map(|name| HIDDEN_ELEMENTS.contains(&name.as_str()))
            .unwrap_or(false);
        if hidden {
            continue;
        }

        let collapsed = collapse_whitespace(text);
        if !collapsed.is_empty() {
            pieces.push(collapsed);
        }
    }

    pieces.join("\n")
}

/// Resolves an href/src against the page URL
///
/// Returns None for special schemes, fragment-only references, and anything
/// that is not http(s) after resolution.
fn resolve_reference(reference: &str, base_url: &Url) -> Option<String> {
    let reference = reference.trim();

    if reference.is_empty() || reference.starts_with('#') {
        return None;
    }

    if reference.starts_with("javascript:")
        || reference.starts_with("mailto:")
        || reference.starts_with("tel:")
        || reference.starts_with("data:")
    {
        return None;
    }

    match base_url.join(reference) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute.to_string())
        }
        _ => None,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://shop.example/collections/pillows").unwrap()
    }

    const PAGE: &str = r##"<html>
<head>
  <title>  Pillows |  Shop </title>
  <meta property="og:image" content="//cdn.shop.example/og.jpg">
  <style>.hidden { display: none }</style>
</head>
<body>
  <nav><a href="/pages/about">About us</a></nav>
  <a href="/collections/pillows/products/cloud">Cloud <b>Pillow</b></a>
  <a href="/collections/pillows/products/cloud">Cloud again</a>
  <a href="mailto:hi@shop.example">Mail</a>
  <a href="#top">Top</a>
  <img src="/img/cloud.jpg" alt="Cloud pillow">
  <img data-src="https://cdn.shop.example/lazy.png" srcset="a.jpg 300w, b.jpg 900w">
  <img src="data:image/gif;base64,R0lGOD">
  <script>var secret = "not visible";</script>
  <p>Soft   and
     supportive</p>
</body>
</html>"##;

    #[test]
    fn test_title_is_collapsed() {
        let page = condense_html(PAGE, &base_url());
        assert_eq!(page.title, Some("Pillows | Shop".to_string()));
    }

    #[test]
    fn test_links_resolved_and_deduplicated() {
        let page = condense_html(PAGE, &base_url());
        let urls: Vec<&str> = page.links.iter().map(|(u, _)| u.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://shop.example/pages/about",
                "https://shop.example/collections/pillows/products/cloud",
            ]
        );
        assert_eq!(page.links[1].1, "Cloud Pillow");
    }

    #[test]
    fn test_images_collected_from_all_sources() {
        let page = condense_html(PAGE, &base_url());
        let urls: Vec<&str> = page.images.iter().map(|(u, _)| u.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://shop.example/img/cloud.jpg",
                "https://cdn.shop.example/lazy.png",
                "https://shop.example/collections/b.jpg",
                "https://cdn.shop.example/og.jpg",
            ]
        );
    }

    #[test]
    fn test_hidden_text_excluded() {
        let page = condense_html(PAGE, &base_url());
        assert!(page.text.contains("Soft and supportive"));
        assert!(!page.text.contains("secret"));
        assert!(!page.text.contains("display: none"));
    }

    #[test]
    fn test_render_truncates_on_char_boundary() {
        let page = CondensedPage {
            title: Some("Oreiller très doux".to_string()),
            ..Default::default()
        };
        let rendered = page.render(16);
        assert_eq!(rendered.chars().count(), 16);
        assert!(rendered.starts_with("TITLE: Oreiller"));
    }

    #[test]
    fn test_largest_srcset_candidate() {
        assert_eq!(
            largest_srcset_candidate("small.jpg 300w, large.jpg 1200w"),
            Some("large.jpg")
        );
        assert_eq!(largest_srcset_candidate(""), None);
    }
}
