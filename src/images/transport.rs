//! Image transport and dimension decoding
//!
//! This module handles the raw image requests for the acquirer:
//! - The `ImageTransport` seam, so tests and alternative clients can stand in
//! - A reqwest-backed implementation
//! - Pixel dimension decoding from the fetched bytes

use crate::config::ImagesConfig;
use crate::HarvestError;
use async_trait::async_trait;
use image::ImageReader;
use reqwest::Client;
use std::io::Cursor;
use std::time::Duration;

/// Status and body of an image request
#[derive(Debug, Clone)]
pub struct FetchedImage {
    /// HTTP status code
    pub status: u16,
    /// Response body (empty for non-success responses)
    pub bytes: Vec<u8>,
}

impl FetchedImage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches image resources
#[async_trait]
pub trait ImageTransport: Send + Sync {
    /// Requests `url`; an `Err` means no response was received at all
    async fn fetch(&self, url: &str) -> Result<FetchedImage, HarvestError>;
}

/// Image transport over a shared reqwest client
pub struct HttpImageTransport {
    client: Client,
}

impl HttpImageTransport {
    /// Builds a transport with the configured timeout and user agent
    ///
    /// # Example
    ///
    /// ```no_run
    /// use catalog_harvester::config::ImagesConfig;
    /// use catalog_harvester::images::HttpImageTransport;
    ///
    /// let transport = HttpImageTransport::new(&ImagesConfig::default(), "catalog-harvester/1.0").unwrap();
    /// ```
    pub fn new(config: &ImagesConfig, user_agent: &str) -> Result<Self, HarvestError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ImageTransport for HttpImageTransport {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, HarvestError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| HarvestError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Ok(FetchedImage {
                status: status.as_u16(),
                bytes: Vec::new(),
            });
        }

        let bytes = response.bytes().await.map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(FetchedImage {
            status: status.as_u16(),
            bytes: bytes.to_vec(),
        })
    }
}

/// Reads the pixel dimensions of an encoded image
///
/// Only the header is decoded. Returns `None` for unknown formats and
/// truncated or corrupt data.
pub fn decode_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}
