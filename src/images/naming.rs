//! File and folder naming for downloaded images

/// Extensions kept as-is; anything else is saved as `jpg`
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Longest product folder name, in characters
pub const MAX_FOLDER_NAME_CHARS: usize = 50;

/// Derives the file extension for an image URL
///
/// Only the path before any query string or fragment is considered, and the
/// extension is lower-cased. This is a naming heuristic; the bytes are not
/// inspected.
///
/// # Examples
///
/// ```
/// use catalog_harvester::images::image_extension;
///
/// assert_eq!(image_extension("https://cdn.example/a/photo.PNG?v=3"), "png");
/// assert_eq!(image_extension("https://cdn.example/a/photo.tiff"), "jpg");
/// assert_eq!(image_extension("https://cdn.example/a/photo"), "jpg");
/// ```
pub fn image_extension(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let last_segment = path.rsplit('/').next().unwrap_or_default();

    last_segment
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or_else(|| "jpg".to_string())
}

/// Sequential file name for the `index`-th (1-based) image of a product
pub fn image_filename(index: usize, url: &str) -> String {
    format!("image_{}.{}", index, image_extension(url))
}

/// Turns a product name into a filesystem-safe folder name
///
/// Keeps alphanumerics, spaces, underscores and hyphens, truncates to 50
/// characters, trims, then replaces spaces with underscores. May return an
/// empty string; callers substitute a placeholder.
pub fn sanitize_folder_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .take(MAX_FOLDER_NAME_CHARS)
        .collect();

    kept.trim().replace(' ', "_")
}
