//! JPEG re-encoding

use crate::preprocess::decode_image;
use crate::{ImgPdfError, Result};
use image::codecs::jpeg::JpegEncoder;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Compression level used when none is given
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 5;

/// Lowest and highest quality the JPEG encoder accepts
const ENCODER_QUALITY_RANGE: (i32, i32) = (1, 100);

/// JPEG quality for a compression level: `95 - 10 * level`
///
/// Level 0 gives 95, level 9 gives 5. Levels outside 0-9 are not
/// rejected and yield values outside the encoder's range.
pub fn jpeg_quality(level: i32) -> i32 {
    95i32.saturating_sub(level.saturating_mul(10))
}

/// Quality actually handed to the encoder, clamped to 1-100
pub fn encoder_quality(level: i32) -> u8 {
    let (min, max) = ENCODER_QUALITY_RANGE;
    let quality = jpeg_quality(level);
    let clamped = quality.clamp(min, max);

    if !(0..=9).contains(&level) {
        warn!(level, quality, clamped, "Compression level outside 0-9");
    }

    clamped as u8
}

/// Re-encode an image as JPEG
///
/// The source is decoded, converted to opaque RGB (alpha is dropped, not
/// composited) and written to `output_path`, replacing any existing file.
///
/// # Arguments
/// * `input_path` - Source image
/// * `output_path` - Destination JPEG
/// * `compression_level` - 0 (best) to 9 (smallest)
///
/// # Returns
/// The destination path
pub fn compress_image<P, Q>(
    input_path: P,
    output_path: Q,
    compression_level: i32,
) -> Result<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let input_path = input_path.as_ref();
    let output_path = output_path.as_ref();

    let rgb = decode_image(input_path)?.into_rgb8();
    let quality = encoder_quality(compression_level);

    let mut writer = BufWriter::new(File::create(output_path)?);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|source| ImgPdfError::Encode {
            path: output_path.to_path_buf(),
            source,
        })?;
    writer.flush()?;

    debug!(
        input = %input_path.display(),
        output = %output_path.display(),
        quality,
        "Compressed image"
    );

    Ok(output_path.to_path_buf())
}
