//! imgpdf - Turn a directory of images into a paginated PDF
//!
//! This crate provides:
//! - Directory scanning for `.png`, `.jpg` and `.jpeg` files
//! - Alpha-aware preprocessing (bounding-box crop)
//! - JPEG re-encoding at a chosen compression level
//! - Page layout (fit within margins, centered)
//! - The end-to-end generator writing one image per page
//!
//! # Example
//!
//! ```ignore
//! use imgpdf::{generate_pdf, GeneratorConfig};
//!
//! let config = GeneratorConfig {
//!     input_dir: "input_images".into(),
//!     output_pdf: "output.pdf".into(),
//!     ..Default::default()
//! };
//! let report = generate_pdf(&config)?;
//! println!("{} pages", report.pages.len());
//! ```

pub mod compress;
pub mod config;
pub mod generator;
pub mod layout;
pub mod preprocess;
pub mod scan;

pub use compress::{compress_image, encoder_quality, jpeg_quality, DEFAULT_COMPRESSION_LEVEL};
pub use config::{GeneratorConfig, PageSpec};
pub use generator::{generate_pdf, GenerationReport, PageReport};
pub use layout::{PageLayout, Placement, DEFAULT_MARGIN};
pub use preprocess::{content_bounds, preprocess_image, Bounds};
pub use scan::{is_supported_image, list_images, IMAGE_EXTENSIONS};

pub use pdf_core::PageSize;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating a PDF from images
#[derive(Debug, Error)]
pub enum ImgPdfError {
    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode JPEG {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_core::PdfError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for imgpdf operations
pub type Result<T> = std::result::Result<T, ImgPdfError>;
