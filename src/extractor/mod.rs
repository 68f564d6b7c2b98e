//! Page extraction
//!
//! The crawler never parses pages itself. It asks a [`PageExtractor`] to
//! answer an instruction about a page and works with the [`ExtractorResult`]
//! it gets back.

mod llm;
mod page;
mod result;

pub use llm::{parse_completion, LlmExtractor};
pub use page::{condense_html, CondensedPage};
pub use result::ExtractorResult;

use crate::HarvestError;
use async_trait::async_trait;

/// Instruction sent for category pages
pub const PRODUCT_URLS_INSTRUCTION: &str =
    "Extract all product URLs from this category/listing page. Return as a JSON array of strings.";

/// Instruction sent for a product's display name
pub const PRODUCT_NAME_INSTRUCTION: &str = "Extract only the product name/title as plain text.";

/// Instruction sent for a product's images
pub const PRODUCT_IMAGES_INSTRUCTION: &str =
    "Extract all product image URLs from this page. Return as a JSON array.";

/// Turns a page into structured data according to an instruction
#[async_trait]
pub trait PageExtractor: Send + Sync {
    /// Answers `instruction` about the page at `page_url`
    ///
    /// An `Err` means the page or the extraction backend could not be reached;
    /// a reachable backend with an unusable answer yields
    /// [`ExtractorResult::Malformed`] instead.
    async fn extract(
        &self,
        page_url: &str,
        instruction: &str,
    ) -> Result<ExtractorResult, HarvestError>;
}
