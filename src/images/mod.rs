//! Image acquisition
//!
//! This module contains everything between an image URL and a file on disk:
//! - `ImageTransport`: fetching raw bytes (reqwest-backed by default)
//! - Dimension probing against the configured minimum size
//! - `ImageAcquirer`: probe, download, and save, resolved into an `AcquireOutcome`
//! - File and folder naming heuristics

mod acquirer;
mod naming;
mod transport;

pub use acquirer::{AcquireOutcome, ImageAcquirer};
pub use naming::{
    image_extension, image_filename, sanitize_folder_name, ALLOWED_EXTENSIONS,
    MAX_FOLDER_NAME_CHARS,
};
pub use transport::{decode_dimensions, FetchedImage, HttpImageTransport, ImageTransport};

#[cfg(test)]
pub(crate) use transport::test_support;
