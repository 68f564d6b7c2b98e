//! Product page processing
//!
//! One product: look it up in the resumption log, extract its name and image
//! URLs, download qualifying images, record it.

use crate::crawler::driver::Harvester;
use crate::crawler::outcome::ProductOutcome;
use crate::extractor::{PageExtractor, PRODUCT_IMAGES_INSTRUCTION, PRODUCT_NAME_INSTRUCTION};
use crate::images::{image_filename, sanitize_folder_name, ImageTransport};
use crate::output::{FailedImage, ProductReport};
use crate::state::{ProcessedProductRecord, ProductStage, ResumableState};
use crate::url::{normalize, promote_protocol_relative};
use std::path::Path;

impl<E: PageExtractor, T: ImageTransport> Harvester<E, T> {
    /// Processes the `index`-th (1-based) product of a category
    ///
    /// # Arguments
    ///
    /// * `product_url` - Normalized product page URL
    /// * `index` - Discovery position within the category, used for placeholders
    /// * `category_folder` - Folder the product folder is created under
    /// * `state` - Resumption state; the product is recorded on success
    ///
    /// # Returns
    ///
    /// * `Ok(ProductOutcome)` - Product processed or reused from the log
    /// * `Err(HarvestError)` - An extractor call failed; nothing was recorded
    pub(crate) async fn process_product(
        &self,
        product_url: &str,
        index: usize,
        category_folder: &Path,
        state: &mut ResumableState,
    ) -> crate::Result<ProductOutcome> {
        tracing::info!("Processing product {}: {}", index, product_url);
        log_stage(index, ProductStage::CheckingDone);

        if let Some(record) = state.product(product_url) {
            log_stage(index, ProductStage::Skipped);
            tracing::info!(
                "Product already processed: {} ({} images)",
                record.name,
                record.images_downloaded
            );
            return Ok(ProductOutcome::reused(product_url, record));
        }

        log_stage(index, ProductStage::ExtractingName);
        let placeholder = format!("product_{}", index);
        let name = self
            .extractor
            .extract(product_url, PRODUCT_NAME_INSTRUCTION)
            .await?
            .into_text()
            .unwrap_or_else(|| {
                tracing::warn!("No product name found, using {}", placeholder);
                placeholder.clone()
            });
        tracing::info!("Product name: {}", name);

        let folder_name = match sanitize_folder_name(&name) {
            sanitized if sanitized.is_empty() => placeholder,
            sanitized => sanitized,
        };
        let product_folder = category_folder.join(folder_name);

        log_stage(index, ProductStage::ExtractingImages);
        let image_urls = self
            .extractor
            .extract(product_url, PRODUCT_IMAGES_INSTRUCTION)
            .await?
            .into_list_lenient();
        let image_urls = resolve_image_urls(image_urls, product_url);
        tracing::info!("Found {} images", image_urls.len());

        log_stage(index, ProductStage::Downloading);
        let mut images_downloaded = 0u32;
        let mut images_skipped = 0u32;
        let mut failures = Vec::new();

        for (i, image_url) in image_urls.iter().enumerate() {
            let filename = image_filename(i + 1, image_url);
            let outcome = self
                .acquirer
                .acquire(image_url, &product_folder, &filename, self.options.min_size)
                .await;

            if outcome.is_downloaded() {
                images_downloaded += 1;
                continue;
            }
            images_skipped += 1;
            if let Some(reason) = outcome.failure_reason() {
                failures.push(FailedImage {
                    url: promote_protocol_relative(image_url),
                    reason,
                });
            }
        }

        let images_found = image_urls.len() as u32;
        tracing::info!(
            "Downloaded {} images (skipped {} due to size or errors)",
            images_downloaded,
            images_skipped
        );

        state.record_product(
            product_url,
            ProcessedProductRecord::new(name.clone(), images_found, images_downloaded),
        );
        log_stage(index, ProductStage::Recorded);

        Ok(ProductOutcome {
            report: ProductReport {
                name,
                url: product_url.to_string(),
                images_found,
                images_downloaded,
                reused: false,
            },
            images_skipped,
            failures,
        })
    }
}

fn log_stage(index: usize, stage: ProductStage) {
    if stage.is_terminal() {
        tracing::info!("Product {} -> {}", index, stage);
    } else {
        tracing::debug!("Product {} -> {}", index, stage);
    }
}

/// Drops blank entries and resolves relative image references
///
/// Protocol-relative references are left for the acquirer, which promotes them
/// to https.
fn resolve_image_urls(urls: Vec<String>, product_url: &str) -> Vec<String> {
    urls.into_iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .map(|u| {
            if u.starts_with("//") {
                return u;
            }
            normalize(&u, product_url).unwrap_or_else(|e| {
                tracing::debug!("Keeping unresolvable image URL {}: {}", u, e);
                u
            })
        })
        .collect()
}
