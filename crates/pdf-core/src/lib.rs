//! PDF Core - Low-level PDF writing
//!
//! This crate provides functionality for:
//! - Creating empty PDF documents with a fixed page size
//! - Appending blank pages
//! - Embedding JPEG images and drawing them at specific coordinates
//! - Writing document metadata and saving the result
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{PageSize, PdfDocument};
//!
//! let mut doc = PdfDocument::new(PageSize::A4);
//! let page = doc.add_page()?;
//! doc.insert_jpeg(&jpeg_bytes, page, 50.0, 50.0, 200.0, 100.0)?;
//! doc.save("output.pdf")?;
//! ```

mod document;
mod image;
mod page;

pub use crate::document::{DocumentInfo, PdfDocument};
pub use crate::image::{detect_format, generate_image_operators, ImageFormat, ImageXObject};
pub use crate::page::PageSize;

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("PDF structure error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;
