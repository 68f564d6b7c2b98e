//! Integration tests for the harvester
//!
//! These tests serve images from wiremock mock servers and drive the
//! full category → product → image cycle end-to-end with a scripted
//! page extractor.

use async_trait::async_trait;
use catalog_harvester::config::ImagesConfig;
use catalog_harvester::crawler::{Harvester, RunOptions};
use catalog_harvester::extractor::{
    ExtractorResult, PageExtractor, PRODUCT_IMAGES_INSTRUCTION, PRODUCT_NAME_INSTRUCTION,
    PRODUCT_URLS_INSTRUCTION,
};
use catalog_harvester::images::HttpImageTransport;
use catalog_harvester::state::{JsonStateStore, SqliteStateStore, StateStore};
use catalog_harvester::HarvestError;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Extractor with canned answers keyed by (page, instruction)
#[derive(Default)]
struct CannedExtractor {
    answers: HashMap<(String, String), ExtractorResult>,
    calls: Arc<AtomicUsize>,
}

impl CannedExtractor {
    fn answer(mut self, page: &str, instruction: &str, result: ExtractorResult) -> Self {
        self.answers
            .insert((page.to_string(), instruction.to_string()), result);
        self
    }

    /// Shared call counter that outlives the move into a harvester
    fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl PageExtractor for CannedExtractor {
    async fn extract(
        &self,
        page_url: &str,
        instruction: &str,
    ) -> Result<ExtractorResult, HarvestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .get(&(page_url.to_string(), instruction.to_string()))
            .cloned()
            .ok_or_else(|| HarvestError::Extractor {
                url: page_url.to_string(),
                message: "no canned answer".to_string(),
            })
    }
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::new(width, height))
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("Failed to encode PNG");
    buffer.into_inner()
}

async fn serve_image(server: &MockServer, image_path: &str, width: u32, height: u32) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(width, height)))
        .mount(server)
        .await;
}

fn options(output_dir: &Path, min_size: u32, force: bool) -> RunOptions {
    RunOptions {
        output_dir: output_dir.to_path_buf(),
        min_size,
        force,
        product_delay: Duration::ZERO,
        category_delay: Duration::ZERO,
        category_list_hash: None,
    }
}

fn transport() -> HttpImageTransport {
    HttpImageTransport::new(&ImagesConfig::default(), "catalog-harvester-tests")
        .expect("Failed to build transport")
}

/// Shop with one pillow category holding two products
struct Shop {
    server: MockServer,
    category: String,
    cloud: String,
    stone: String,
}

impl Shop {
    async fn start() -> Self {
        let server = MockServer::start().await;
        let base = server.uri();

        serve_image(&server, "/cdn/cloud-front.png", 640, 640).await;
        serve_image(&server, "/cdn/cloud-side.jpg", 400, 350).await;
        serve_image(&server, "/cdn/swatch.png", 40, 40).await;
        serve_image(&server, "/cdn/stone.webp", 800, 600).await;

        Self {
            category: format!("{}/collections/pillows", base),
            cloud: format!("{}/collections/pillows/products/cloud", base),
            stone: format!("{}/collections/pillows/products/stone", base),
            server,
        }
    }

    fn extractor(&self) -> CannedExtractor {
        let base = self.server.uri();
        CannedExtractor::default()
            .answer(
                &self.category,
                PRODUCT_URLS_INSTRUCTION,
                ExtractorResult::List(vec![
                    "/collections/pillows/products/cloud".to_string(),
                    "/collections/blankets/products/wool".to_string(),
                    "/pages/shipping".to_string(),
                    self.stone.clone(),
                    "/collections/pillows/products/cloud".to_string(),
                ]),
            )
            .answer(
                &self.cloud,
                PRODUCT_NAME_INSTRUCTION,
                ExtractorResult::Scalar("Cloud Pillow (Large)".to_string()),
            )
            .answer(
                &self.cloud,
                PRODUCT_IMAGES_INSTRUCTION,
                ExtractorResult::List(vec![
                    format!("{}/cdn/cloud-front.png", base),
                    "/cdn/cloud-side.jpg".to_string(),
                    format!("{}/cdn/swatch.png", base),
                    format!("{}/cdn/missing.png", base),
                ]),
            )
            .answer(
                &self.stone,
                PRODUCT_NAME_INSTRUCTION,
                ExtractorResult::Scalar("Stone".to_string()),
            )
            .answer(
                &self.stone,
                PRODUCT_IMAGES_INSTRUCTION,
                ExtractorResult::Scalar(format!("{}/cdn/stone.webp?v=2", base)),
            )
    }
}

#[tokio::test]
async fn test_full_harvest_single_category() {
    let shop = Shop::start().await;
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("scraped_products");
    let store = JsonStateStore::new(dir.path().join("processed_items.json"));

    let harvester = Harvester::new(shop.extractor(), transport(), options(&out, 301, false));
    let report = harvester
        .run(&[shop.category.clone()], &store)
        .await
        .expect("Run failed");

    // Two products survive filtering and dedup
    assert_eq!(report.total_products, 2);
    assert_eq!(report.total_images_found, 5);
    assert_eq!(report.total_images_downloaded, 3);
    assert_eq!(report.total_images_skipped, 2);

    let category = &report.categories[0];
    assert_eq!(category.name, "pillows");
    assert_eq!(category.products[0].name, "Cloud Pillow (Large)");
    assert_eq!(category.products[1].name, "Stone");

    let cloud_folder = out.join("pillows").join("Cloud_Pillow_Large");
    assert!(cloud_folder.join("image_1.png").exists());
    assert!(cloud_folder.join("image_2.jpg").exists());
    assert!(!cloud_folder.join("image_3.png").exists());
    assert!(out.join("pillows").join("Stone").join("image_1.webp").exists());

    let reasons: Vec<_> = report.failed_images.iter().map(|f| f.reason.as_str()).collect();
    assert_eq!(reasons, vec!["too small (40x40)", "too small (0x0)"]);

    let state = store.load();
    assert!(state.is_category_done(&shop.category));
    assert_eq!(state.product(&shop.cloud).unwrap().images_downloaded, 2);
    assert_eq!(state.category(&shop.category).unwrap().images_downloaded, 3);

    let report_path = dir.path().join("scraping_report.txt");
    report.write_report(&report_path).unwrap();
    let text = std::fs::read_to_string(&report_path).unwrap();
    assert!(text.contains("- Total Images Downloaded: 3"));
    assert!(text.contains("## FAILED IMAGES"));
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let shop = Shop::start().await;
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("scraped_products");
    let store = JsonStateStore::new(dir.path().join("processed_items.json"));

    Harvester::new(shop.extractor(), transport(), options(&out, 301, false))
        .run(&[shop.category.clone()], &store)
        .await
        .unwrap();
    let requests_after_first = shop.server.received_requests().await.unwrap().len();

    let extractor = CannedExtractor::default();
    let calls = extractor.call_counter();
    let second = Harvester::new(extractor, transport(), options(&out, 301, false));
    let report = second.run(&[shop.category.clone()], &store).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        shop.server.received_requests().await.unwrap().len(),
        requests_after_first
    );
    assert!(report.categories[0].skipped);
    assert!(report.categories[0].products.is_empty());
    assert_eq!(report.total_products, 2);
    assert_eq!(report.total_images_downloaded, 3);
}

#[tokio::test]
async fn test_force_reprocesses_everything() {
    let shop = Shop::start().await;
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("scraped_products");
    let store = JsonStateStore::new(dir.path().join("processed_items.json"));

    Harvester::new(shop.extractor(), transport(), options(&out, 301, false))
        .run(&[shop.category.clone()], &store)
        .await
        .unwrap();

    let extractor = shop.extractor();
    let forced = Harvester::new(extractor, transport(), options(&out, 301, true));
    let report = forced.run(&[shop.category.clone()], &store).await.unwrap();

    assert!(!report.categories[0].skipped);
    assert_eq!(report.categories[0].products.len(), 2);
    assert!(report.categories[0].products.iter().all(|p| !p.reused));
    assert_eq!(report.total_images_found, 5);
}

#[tokio::test]
async fn test_corrupt_log_starts_fresh() {
    let shop = Shop::start().await;
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("processed_items.json");
    std::fs::write(&log, "{\"processed_categories\": [").unwrap();
    let store = JsonStateStore::new(&log);

    let extractor = shop.extractor();
    let report = Harvester::new(extractor, transport(), options(&dir.path().join("out"), 301, false))
        .run(&[shop.category.clone()], &store)
        .await
        .unwrap();

    assert_eq!(report.total_products, 2);
    // The corrupt log was replaced by a valid one
    assert!(store.load().is_category_done(&shop.category));
}

#[tokio::test]
async fn test_min_size_threshold() {
    let shop = Shop::start().await;
    let dir = TempDir::new().unwrap();
    let store = JsonStateStore::new(dir.path().join("processed_items.json"));

    // Only the 640x640 front image reaches 601 in both dimensions
    let report = Harvester::new(
        shop.extractor(),
        transport(),
        options(&dir.path().join("out"), 601, false),
    )
    .run(&[shop.category.clone()], &store)
    .await
    .unwrap();

    assert_eq!(report.total_images_downloaded, 1);
    assert_eq!(report.categories[0].products[0].images_downloaded, 1);
    assert_eq!(report.categories[0].products[1].images_downloaded, 0);
    assert!(report
        .failed_images
        .iter()
        .any(|f| f.reason == "too small (800x600)"));
}

#[tokio::test]
async fn test_download_error_after_successful_probe() {
    let server = MockServer::start().await;
    let base = server.uri();
    let category = format!("{}/collections/lamps", base);
    let product = format!("{}/collections/lamps/products/arc", base);

    // First request (the size probe) succeeds, the download then fails
    Mock::given(method("GET"))
        .and(path("/cdn/arc.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(500, 500)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cdn/arc.png"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let extractor = CannedExtractor::default()
        .answer(&category, PRODUCT_URLS_INSTRUCTION, ExtractorResult::List(vec![product.clone()]))
        .answer(&product, PRODUCT_NAME_INSTRUCTION, ExtractorResult::Scalar("Arc".to_string()))
        .answer(
            &product,
            PRODUCT_IMAGES_INSTRUCTION,
            ExtractorResult::List(vec![format!("{}/cdn/arc.png", base)]),
        );

    let dir = TempDir::new().unwrap();
    let store = JsonStateStore::new(dir.path().join("processed_items.json"));
    let report = Harvester::new(extractor, transport(), options(&dir.path().join("out"), 301, false))
        .run(&[category.clone()], &store)
        .await
        .unwrap();

    assert_eq!(report.total_images_found, 1);
    assert_eq!(report.total_images_downloaded, 0);
    assert_eq!(report.total_images_skipped, 1);
    assert_eq!(report.failed_images[0].reason, "HTTP error 500");

    // The product still completed and is recorded
    let record = store.load();
    assert_eq!(record.product(&product).unwrap().images_found, 1);
    assert_eq!(record.product(&product).unwrap().images_downloaded, 0);
}

#[tokio::test]
async fn test_aborted_category_not_recorded() {
    let shop = Shop::start().await;
    let dir = TempDir::new().unwrap();
    let store = JsonStateStore::new(dir.path().join("processed_items.json"));
    let broken = format!("{}/collections/broken", shop.server.uri());

    let extractor = shop.extractor().answer(
        &broken,
        PRODUCT_URLS_INSTRUCTION,
        ExtractorResult::Malformed("object without content field (3 keys)".to_string()),
    );
    let report = Harvester::new(extractor, transport(), options(&dir.path().join("out"), 301, false))
        .run(&[broken.clone(), shop.category.clone()], &store)
        .await
        .unwrap();

    assert_eq!(report.categories.len(), 2);
    assert_eq!(report.categories[0].name, "broken");
    assert_eq!(report.categories[0].products_processed, 0);
    assert_eq!(report.categories[1].products_processed, 2);

    let state = store.load();
    assert!(!state.is_category_done(&broken));
    assert!(state.is_category_done(&shop.category));
}

#[tokio::test]
async fn test_sqlite_backend_resumes() {
    let shop = Shop::start().await;
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let store = SqliteStateStore::new(dir.path().join("state.db"));

    Harvester::new(shop.extractor(), transport(), options(&out, 301, false))
        .run(&[shop.category.clone()], &store)
        .await
        .unwrap();

    let extractor = CannedExtractor::default();
    let second = Harvester::new(extractor, transport(), options(&out, 301, false));
    let report = second.run(&[shop.category.clone()], &store).await.unwrap();

    assert!(report.categories[0].skipped);
    assert_eq!(report.total_products, 2);
    assert_eq!(store.load().product_count(), 2);
}
