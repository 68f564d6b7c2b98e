//! Category page processing

use crate::crawler::driver::Harvester;
use crate::crawler::outcome::CategoryOutcome;
use crate::extractor::{PageExtractor, PRODUCT_URLS_INSTRUCTION};
use crate::images::ImageTransport;
use crate::state::{CategoryStage, ProcessedCategoryRecord, ResumableState};
use crate::url::{extract_category_name, filter_product_urls};
use crate::HarvestError;

impl<E: PageExtractor, T: ImageTransport> Harvester<E, T> {
    /// Processes one category URL
    ///
    /// Never fails: problems before the product loop abort the category with
    /// zero products, and product failures are logged and skipped. Only a
    /// category that reaches the end of its product loop is recorded.
    pub(crate) async fn process_category(
        &self,
        category_url: &str,
        state: &mut ResumableState,
    ) -> CategoryOutcome {
        log_stage(category_url, CategoryStage::CheckingDone);

        if let Some(record) = state.category(category_url) {
            log_stage(category_url, CategoryStage::Skipped);
            tracing::info!(
                "Category already processed: {} ({})",
                record.name,
                record.processed_at.format("%Y-%m-%d %H:%M:%S")
            );
            tracing::info!("Use --force to reprocess or remove the entry from the resumption log");
            return CategoryOutcome::skipped(category_url, record);
        }

        let category_name = extract_category_name(category_url);
        tracing::info!("Using category name from URL: {}", category_name);

        log_stage(category_url, CategoryStage::Extracting);
        let category_folder = self.options.output_dir.join(&category_name);
        if let Err(e) = tokio::fs::create_dir_all(&category_folder).await {
            tracing::error!(
                "Could not create category folder {}: {}",
                category_folder.display(),
                e
            );
            return CategoryOutcome::aborted(&category_name, category_url);
        }

        let discovered = match self
            .extractor
            .extract(category_url, PRODUCT_URLS_INSTRUCTION)
            .await
            .and_then(|result| {
                let shape = result.shape();
                result.into_url_list().map_err(|detail| HarvestError::ExtractorShape {
                    url: category_url.to_string(),
                    shape: format!("{} ({})", shape, detail),
                })
            }) {
            Ok(urls) => urls,
            Err(e) => {
                tracing::error!("Could not list products for {}: {}", category_url, e);
                return CategoryOutcome::aborted(&category_name, category_url);
            }
        };
        tracing::info!("Found {} URLs before filtering", discovered.len());

        log_stage(category_url, CategoryStage::FilteringUrls);
        let product_urls = filter_product_urls(&discovered, category_url);
        tracing::info!(
            "Found {} product URLs after filtering (belonging to this category)",
            product_urls.len()
        );

        if product_urls.is_empty() {
            tracing::warn!(
                "No product URLs found for {}; check that the site structure matches the classification rules",
                category_url
            );
            log_stage(category_url, CategoryStage::Aborted);
            return CategoryOutcome::aborted(&category_name, category_url);
        }

        log_stage(category_url, CategoryStage::ProcessingProducts);
        let mut outcome = CategoryOutcome::new(&category_name, category_url);
        let last = product_urls.len() - 1;

        for (i, product_url) in product_urls.iter().enumerate() {
            match self
                .process_product(product_url, i + 1, &category_folder, state)
                .await
            {
                Ok(product) => outcome.push_product(product),
                Err(e) => tracing::warn!("Error processing product {}: {}", i + 1, e),
            }

            if i < last {
                self.pause(self.options.product_delay).await;
            }
        }

        state.record_category(
            category_url,
            ProcessedCategoryRecord::new(
                category_name,
                outcome.report.products_processed,
                outcome.report.images_downloaded,
            ),
        );
        outcome.stage = CategoryStage::Recorded;
        log_stage(category_url, CategoryStage::Recorded);

        outcome
    }
}

fn log_stage(url: &str, stage: CategoryStage) {
    if stage.is_terminal() {
        tracing::info!("Category {} -> {}", url, stage);
    } else {
        tracing::debug!("Category {} -> {}", url, stage);
    }
}
