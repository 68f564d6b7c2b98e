//! Image qualification and download
//!
//! The acquirer never fails: every problem becomes a skip outcome with a
//! reason that ends up in the run report.

use crate::images::transport::{decode_dimensions, ImageTransport};
use crate::url::promote_protocol_relative;
use std::path::{Path, PathBuf};

/// Result of acquiring a single image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// Image met the size threshold and was written to disk
    Downloaded {
        path: PathBuf,
        width: u32,
        height: u32,
    },

    /// Image was smaller than the threshold in at least one dimension
    /// (an image whose size could not be determined probes as 0x0)
    SkippedTooSmall { width: u32, height: u32 },

    /// Image qualified but could not be downloaded or saved
    SkippedError { reason: String },
}

impl AcquireOutcome {
    pub fn is_downloaded(&self) -> bool {
        matches!(self, Self::Downloaded { .. })
    }

    /// Reason recorded in the report for skipped images
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Downloaded { .. } => None,
            Self::SkippedTooSmall { width, height } => {
                Some(format!("too small ({}x{})", width, height))
            }
            Self::SkippedError { reason } => Some(reason.clone()),
        }
    }
}

/// Probes and downloads images through an [`ImageTransport`]
pub struct ImageAcquirer<T> {
    transport: T,
}

impl<T: ImageTransport> ImageAcquirer<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Determines an image's pixel dimensions
    ///
    /// Any failure (transport error, non-success status, undecodable bytes)
    /// reports `(0, 0)`, which fails every size check.
    pub async fn probe_size(&self, image_url: &str) -> (u32, u32) {
        let url = promote_protocol_relative(image_url);

        match self.transport.fetch(&url).await {
            Ok(fetched) if fetched.is_success() => decode_dimensions(&fetched.bytes)
                .unwrap_or_else(|| {
                    tracing::debug!("Could not decode image dimensions for {}", url);
                    (0, 0)
                }),
            Ok(fetched) => {
                tracing::debug!("Size probe for {} returned {}", url, fetched.status);
                (0, 0)
            }
            Err(e) => {
                tracing::warn!("Error checking image size for {}: {}", url, e);
                (0, 0)
            }
        }
    }

    /// Downloads an image to `folder/filename` if both dimensions reach `min_size`
    pub async fn acquire(
        &self,
        image_url: &str,
        folder: &Path,
        filename: &str,
        min_size: u32,
    ) -> AcquireOutcome {
        let url = promote_protocol_relative(image_url);

        let (width, height) = self.probe_size(&url).await;
        if width < min_size || height < min_size {
            tracing::info!("Skipping small image ({}x{}): {}", width, height, url);
            return AcquireOutcome::SkippedTooSmall { width, height };
        }

        let fetched = match self.transport.fetch(&url).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!("Error downloading {}: {}", url, e);
                return AcquireOutcome::SkippedError {
                    reason: e.to_string(),
                };
            }
        };

        if !fetched.is_success() {
            tracing::warn!("Failed to download ({}): {}", fetched.status, url);
            return AcquireOutcome::SkippedError {
                reason: format!("HTTP error {}", fetched.status),
            };
        }

        let path = folder.join(filename);
        if let Err(e) = write_image(folder, &path, &fetched.bytes).await {
            tracing::warn!("Error saving {} to {}: {}", url, path.display(), e);
            return AcquireOutcome::SkippedError {
                reason: format!("write failed: {}", e),
            };
        }

        tracing::info!("Downloaded: {} ({}x{})", filename, width, height);
        AcquireOutcome::Downloaded {
            path,
            width,
            height,
        }
    }
}

async fn write_image(folder: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(folder).await?;
    tokio::fs::write(path, bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::transport::test_support::{png_bytes, StaticTransport};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_probe_size() {
        let acquirer = ImageAcquirer::new(
            StaticTransport::default()
                .with("https://cdn.example/a.png", 200, png_bytes(640, 480))
                .with("https://cdn.example/b.png", 500, vec![])
                .with("https://cdn.example/c.png", 200, b"junk".to_vec()),
        );

        assert_eq!(acquirer.probe_size("https://cdn.example/a.png").await, (640, 480));
        assert_eq!(acquirer.probe_size("https://cdn.example/b.png").await, (0, 0));
        assert_eq!(acquirer.probe_size("https://cdn.example/c.png").await, (0, 0));
        assert_eq!(acquirer.probe_size("https://cdn.example/none.png").await, (0, 0));
    }

    #[tokio::test]
    async fn test_probe_promotes_protocol_relative() {
        let acquirer = ImageAcquirer::new(
            StaticTransport::default().with("https://cdn.example/a.png", 200, png_bytes(8, 8)),
        );
        assert_eq!(acquirer.probe_size("//cdn.example/a.png").await, (8, 8));
    }

    #[tokio::test]
    async fn test_small_image_skipped() {
        let dir = TempDir::new().unwrap();
        let acquirer = ImageAcquirer::new(
            StaticTransport::default().with("https://cdn.example/a.png", 200, png_bytes(80, 90)),
        );

        let outcome = acquirer
            .acquire("https://cdn.example/a.png", dir.path(), "image_1.png", 100)
            .await;

        assert_eq!(
            outcome,
            AcquireOutcome::SkippedTooSmall {
                width: 80,
                height: 90
            }
        );
        assert_eq!(outcome.failure_reason().unwrap(), "too small (80x90)");
        assert!(!dir.path().join("image_1.png").exists());
    }

    #[tokio::test]
    async fn test_one_small_dimension_is_enough_to_skip() {
        let dir = TempDir::new().unwrap();
        let acquirer = ImageAcquirer::new(
            StaticTransport::default().with("https://cdn.example/a.png", 200, png_bytes(1000, 99)),
        );

        let outcome = acquirer
            .acquire("https://cdn.example/a.png", dir.path(), "image_1.png", 100)
            .await;
        assert!(matches!(outcome, AcquireOutcome::SkippedTooSmall { .. }));
    }

    #[tokio::test]
    async fn test_qualifying_image_downloaded() {
        let dir = TempDir::new().unwrap();
        let folder = dir.path().join("pillows").join("Cloud_Pillow");
        let body = png_bytes(320, 320);
        let acquirer = ImageAcquirer::new(
            StaticTransport::default().with("https://cdn.example/a.png", 200, body.clone()),
        );

        let outcome = acquirer
            .acquire("//cdn.example/a.png", &folder, "image_1.png", 301)
            .await;

        // Size probe and download are separate requests
        assert_eq!(acquirer.transport.request_count(), 2);
        assert!(outcome.is_downloaded());
        assert_eq!(outcome.failure_reason(), None);
        assert_eq!(std::fs::read(folder.join("image_1.png")).unwrap(), body);
    }

    #[tokio::test]
    async fn test_unsizable_image_is_too_small() {
        let dir = TempDir::new().unwrap();
        let acquirer = ImageAcquirer::new(StaticTransport::default());

        let outcome = acquirer
            .acquire("https://cdn.example/gone.png", dir.path(), "image_1.png", 1)
            .await;

        assert_eq!(outcome.failure_reason().unwrap(), "too small (0x0)");
    }

    #[tokio::test]
    async fn test_write_failure_is_skip() {
        let dir = TempDir::new().unwrap();
        // A regular file where the folder should be
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"file").unwrap();

        let acquirer = ImageAcquirer::new(
            StaticTransport::default().with("https://cdn.example/a.png", 200, png_bytes(10, 10)),
        );

        let outcome = acquirer
            .acquire("https://cdn.example/a.png", &blocker, "image_1.png", 5)
            .await;

        assert!(matches!(outcome, AcquireOutcome::SkippedError { .. }));
        assert!(outcome.failure_reason().unwrap().starts_with("write failed"));
    }
}
