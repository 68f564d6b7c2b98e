//! Category list file handling
//!
//! The list is plain text with one category URL per line. Blank lines and
//! lines starting with `#` are ignored.

use crate::{ConfigError, ConfigResult};
use std::path::Path;
use url::Url;

const TEMPLATE: &str = "\
# Add your category/listing page URLs below (one per line)
# Example: https://www.silentnight.ae/collections/all-pillows
# Example: https://www.example.com/collections/bedding
";

/// Reads the category URLs to process
///
/// When the file does not exist a commented template is written in its place
/// and `ConfigError::TemplateCreated` is returned, so the operator can fill it
/// in before the next run. An empty list is also a configuration error.
pub fn load_category_urls(path: &Path) -> ConfigResult<Vec<String>> {
    if !path.exists() {
        write_template(path)?;
        return Err(ConfigError::TemplateCreated(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let urls = parse_category_list(&content)?;

    if urls.is_empty() {
        return Err(ConfigError::NoCategories(path.display().to_string()));
    }

    Ok(urls)
}

/// Parses category list content, rejecting lines that are not absolute http(s) URLs
pub fn parse_category_list(content: &str) -> ConfigResult<Vec<String>> {
    let mut urls = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parsed = Url::parse(line).map_err(|e| {
            ConfigError::InvalidUrl(format!("line {}: '{}' ({})", index + 1, line, e))
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "line {}: '{}' must use http or https",
                index + 1,
                line
            )));
        }

        urls.push(line.to_string());
    }

    Ok(urls)
}

fn write_template(path: &Path) -> ConfigResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, TEMPLATE)?;
    tracing::warn!(
        "Created '{}'. Add your category URLs to this file (one per line).",
        path.display()
    );
    Ok(())
}
