use serde::Deserialize;

/// Main configuration structure for Catalog-Harvester
///
/// Every section is optional; missing values fall back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub pacing: PacingConfig,
    pub images: ImagesConfig,
    pub state: StateConfig,
    pub extractor: ExtractorConfig,
}

/// Locations of the input list and every generated artifact
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Plain-text file with one category URL per line
    #[serde(rename = "category-list")]
    pub category_list: String,

    /// Root folder for downloaded images
    #[serde(rename = "output-dir")]
    pub output_dir: String,

    /// Resumption log (JSON file or SQLite database, depending on backend)
    #[serde(rename = "state-file")]
    pub state_file: String,

    /// Plain-text run report
    #[serde(rename = "report-file")]
    pub report_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            category_list: "category_urls.txt".to_string(),
            output_dir: "scraped_products".to_string(),
            state_file: "processed_items.json".to_string(),
            report_file: "scraping_report.txt".to_string(),
        }
    }
}

/// Fixed delays inserted between sequential page visits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Delay between consecutive products of a category (milliseconds)
    #[serde(rename = "product-delay-ms")]
    pub product_delay_ms: u64,

    /// Delay between consecutive categories (milliseconds)
    #[serde(rename = "category-delay-ms")]
    pub category_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            product_delay_ms: 1000,
            category_delay_ms: 2000,
        }
    }
}

/// Image qualification and download settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Minimum width and height (pixels) an image needs to be downloaded
    #[serde(rename = "min-size")]
    pub min_size: u32,

    /// Timeout for a single image request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            min_size: 301,
            request_timeout_secs: 10,
        }
    }
}

/// Which store backs the resumption log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateBackend {
    #[default]
    Json,
    Sqlite,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    pub backend: StateBackend,
}

/// Settings for the LLM-backed page extractor
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Base URL of an OpenAI-compatible API (the `/chat/completions` suffix is appended)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Model identifier sent with every request
    pub model: String,

    pub temperature: f32,

    /// Name of the environment variable holding the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Upper bound on the condensed page text sent to the model
    #[serde(rename = "max-page-chars")]
    pub max_page_chars: usize,

    /// User agent used when fetching pages
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Timeout for page and completion requests (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            temperature: 0.0,
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            max_page_chars: 60_000,
            user_agent: concat!("catalog-harvester/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: 60,
        }
    }
}
