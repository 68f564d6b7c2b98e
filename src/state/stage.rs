//! Processing stages for categories and products
//!
//! Stages are transient: they drive progress logging and are never persisted.
//! Only the final records reach the resumption log.
use std::fmt;

/// Where a category currently is in its processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryStage {
    // ===== Active Stages =====
    /// Category has been read from the list but not looked at yet
    NotStarted,

    /// Looking the category up in the resumption log
    CheckingDone,

    /// Asking the extractor for the category's product URLs
    Extracting,

    /// Classifying discovered URLs against the category
    FilteringUrls,

    /// Running the product processor for each accepted URL
    ProcessingProducts,

    // ===== Terminal Stages =====
    /// Already recorded by an earlier run
    Skipped,

    /// Finished and written into the resumption log
    Recorded,

    /// Gave up before any product ran; retried next run
    Aborted,
}

impl CategoryStage {
    /// Returns true if no further processing happens after this stage
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Skipped | Self::Recorded | Self::Aborted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::CheckingDone => "checking_done",
            Self::Extracting => "extracting",
            Self::FilteringUrls => "filtering_urls",
            Self::ProcessingProducts => "processing_products",
            Self::Skipped => "skipped",
            Self::Recorded => "recorded",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for CategoryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a product currently is in its processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductStage {
    NotStarted,
    CheckingDone,
    ExtractingName,
    ExtractingImages,
    Downloading,
    Skipped,
    Recorded,
}

impl ProductStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Skipped | Self::Recorded)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::CheckingDone => "checking_done",
            Self::ExtractingName => "extracting_name",
            Self::ExtractingImages => "extracting_images",
            Self::Downloading => "downloading",
            Self::Skipped => "skipped",
            Self::Recorded => "recorded",
        }
    }
}

impl fmt::Display for ProductStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
