//! Alpha-aware preprocessing
//!
//! Crops an image to the bounding box of its visible pixels. The returned
//! raster is a white canvas of the cropped size: cropped pixel content is
//! not carried over, and only the extent is used downstream for layout.

use crate::{ImgPdfError, Result};
use image::{imageops, DynamicImage, ImageReader, Rgb, RgbImage, RgbaImage};
use std::path::Path;
use tracing::debug;

/// Axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Decode an image file, detecting the format from its content
pub(crate) fn decode_image(path: &Path) -> Result<DynamicImage> {
    let decode_error = |source| ImgPdfError::Decode {
        path: path.to_path_buf(),
        source,
    };

    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(decode_error)
}

/// Smallest rectangle enclosing every pixel with alpha > 0
///
/// Returns `None` for a fully transparent image.
pub fn content_bounds(image: &RgbaImage) -> Option<Bounds> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }

    bounds.map(|(min_x, min_y, max_x, max_y)| Bounds {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

/// Crop an image to its visible content and flatten it to opaque RGB
///
/// Images without an alpha channel are treated as fully opaque, so their
/// extent is unchanged. A fully transparent image keeps its original extent.
///
/// # Errors
/// Returns [`ImgPdfError::Decode`] if the file cannot be decoded.
pub fn preprocess_image<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let path = path.as_ref();
    let rgba = decode_image(path)?.into_rgba8();

    let cropped = match content_bounds(&rgba) {
        Some(b) => {
            debug!(
                path = %path.display(),
                x = b.x,
                y = b.y,
                width = b.width,
                height = b.height,
                "Cropping to visible content"
            );
            imageops::crop_imm(&rgba, b.x, b.y, b.width, b.height).to_image()
        }
        None => {
            debug!(path = %path.display(), "Image fully transparent, keeping original extent");
            rgba
        }
    };

    // The white canvas replaces the cropped pixels rather than compositing them
    Ok(RgbImage::from_pixel(
        cropped.width(),
        cropped.height(),
        Rgb([255, 255, 255]),
    ))
}
