use crate::config::types::{Config, ExtractorConfig, ImagesConfig, PathsConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_paths(&config.paths)?;
    validate_images(&config.images)?;
    validate_extractor(&config.extractor)?;
    Ok(())
}

fn validate_paths(config: &PathsConfig) -> Result<(), ConfigError> {
    for (key, value) in [
        ("category-list", &config.category_list),
        ("output-dir", &config.output_dir),
        ("state-file", &config.state_file),
        ("report-file", &config.report_file),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", key)));
        }
    }

    if config.state_file == config.report_file {
        return Err(ConfigError::Validation(format!(
            "state-file and report-file must differ, both are '{}'",
            config.state_file
        )));
    }

    Ok(())
}

/// Validates image settings
pub fn validate_images(config: &ImagesConfig) -> Result<(), ConfigError> {
    if config.min_size < 1 {
        return Err(ConfigError::Validation(format!(
            "min-size must be >= 1, got {}",
            config.min_size
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "images request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

fn validate_extractor(config: &ExtractorConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid extractor base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "extractor base-url must be http(s), got '{}'",
            config.base_url
        )));
    }

    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation(
            "extractor model cannot be empty".to_string(),
        ));
    }

    if !(0.0..=2.0).contains(&config.temperature) {
        return Err(ConfigError::Validation(format!(
            "extractor temperature must be between 0 and 2, got {}",
            config.temperature
        )));
    }

    if config.api_key_env.trim().is_empty() {
        return Err(ConfigError::Validation(
            "extractor api-key-env cannot be empty".to_string(),
        ));
    }

    if config.max_page_chars < 1000 {
        return Err(ConfigError::Validation(format!(
            "extractor max-page-chars must be >= 1000, got {}",
            config.max_page_chars
        )));
    }

    Ok(())
}
