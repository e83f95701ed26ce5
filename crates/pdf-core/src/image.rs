//! Image handling for PDF documents

use crate::{PdfError, Result};
use lopdf::{Dictionary, Object, Stream};

/// Detected image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// Detect image format from magic bytes
pub fn detect_format(data: &[u8]) -> Result<ImageFormat> {
    if data.len() < 8 {
        return Err(PdfError::ImageError("Image data too short".to_string()));
    }

    // JPEG starts with FF D8 FF
    if data[..3] == [0xFF, 0xD8, 0xFF] {
        return Ok(ImageFormat::Jpeg);
    }

    // PNG starts with 89 50 4E 47 0D 0A 1A 0A
    if data[..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
        return Ok(ImageFormat::Png);
    }

    Err(PdfError::ImageError("Unknown image format".to_string()))
}

/// Frame header fields read from a JPEG SOF segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct JpegInfo {
    width: u32,
    height: u32,
    bits_per_component: u8,
    num_components: u8,
}

/// Scan JPEG markers until the first start-of-frame segment
///
/// SOF segment layout after the marker:
/// length (2), precision (1), height (2), width (2), components (1)
fn get_jpeg_info(data: &[u8]) -> Result<JpegInfo> {
    let mut i = 2;
    while i + 9 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }

        let marker = data[i + 1];

        // Fill bytes before a marker
        if marker == 0xFF {
            i += 1;
            continue;
        }

        // SOF0..SOF15 except DHT (C4), JPG (C8) and DAC (CC)
        if (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Ok(JpegInfo {
                width,
                height,
                bits_per_component: data[i + 4],
                num_components: data[i + 9],
            });
        }

        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if length < 2 {
            break;
        }
        i += 2 + length;
    }

    Err(PdfError::ImageError("Could not parse JPEG info".to_string()))
}

/// Image XObject for PDF embedding
#[derive(Debug, Clone)]
pub struct ImageXObject {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Color space ("DeviceRGB", "DeviceGray", "DeviceCMYK")
    pub color_space: String,
    /// Bits per component
    pub bits_per_component: u8,
    /// Compressed image bytes, embedded as-is with DCTDecode
    pub data: Vec<u8>,
}

impl ImageXObject {
    /// Create XObject from JPEG data
    ///
    /// JPEG streams are embedded without re-encoding.
    pub fn from_jpeg(data: &[u8]) -> Result<Self> {
        match detect_format(data)? {
            ImageFormat::Jpeg => {}
            ImageFormat::Png => {
                return Err(PdfError::ImageError(
                    "Expected JPEG data, got PNG".to_string(),
                ))
            }
        }

        let info = get_jpeg_info(data)?;
        let color_space = match info.num_components {
            1 => "DeviceGray",
            3 => "DeviceRGB",
            4 => "DeviceCMYK",
            n => {
                return Err(PdfError::ImageError(format!(
                    "Unsupported JPEG component count: {n}"
                )))
            }
        };

        Ok(Self {
            width: info.width,
            height: info.height,
            color_space: color_space.to_string(),
            bits_per_component: info.bits_per_component,
            data: data.to_vec(),
        })
    }

    /// Convert to lopdf Stream object
    pub fn to_pdf_stream(&self) -> Stream {
        let mut dict = Dictionary::new();

        dict.set("Type", Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", Object::Name(b"Image".to_vec()));
        dict.set("Width", self.width as i64);
        dict.set("Height", self.height as i64);
        dict.set(
            "ColorSpace",
            Object::Name(self.color_space.as_bytes().to_vec()),
        );
        dict.set("BitsPerComponent", self.bits_per_component as i64);
        dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
        dict.set("Length", self.data.len() as i64);

        // Already DCT-compressed; keep lopdf from running Flate over it
        Stream::new(dict, self.data.clone()).with_compression(false)
    }
}

/// Format a coordinate for a content stream
///
/// Four decimal places, trailing zeros trimmed, no exponent.
fn format_number(value: f64) -> String {
    let formatted = format!("{value:.4}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Generate operators to draw image at position
///
/// # Arguments
/// * `image_name` - Image resource name (e.g., "Im1")
/// * `x` - X coordinate of the lower-left corner in points
/// * `y` - Y coordinate of the lower-left corner in points (from bottom)
/// * `width` - Drawn width in points
/// * `height` - Drawn height in points
pub fn generate_image_operators(
    image_name: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<u8> {
    format!(
        "q\n{} 0 0 {} {} {} cm\n/{image_name} Do\nQ\n",
        format_number(width),
        format_number(height),
        format_number(x),
        format_number(y),
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal JPEG header with a baseline SOF0 segment
    fn sof_jpeg(width: u16, height: u16, components: u8) -> Vec<u8> {
        let mut jpeg = vec![
            0xFF, 0xD8, // SOI
            0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, // APP0 stub
            0xFF, 0xC0, // SOF0
            0x00, 0x11, // Length
            0x08, // Precision
        ];
        jpeg.extend_from_slice(&height.to_be_bytes());
        jpeg.extend_from_slice(&width.to_be_bytes());
        jpeg.push(components);
        jpeg.extend_from_slice(&[0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01]);
        jpeg.extend_from_slice(&[0xFF, 0xD9]); // EOI
        jpeg
    }

    #[test]
    fn test_detect_jpeg() {
        let jpeg_header = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        assert_eq!(detect_format(&jpeg_header).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_detect_png() {
        let png_header = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(detect_format(&png_header).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_detect_unknown_and_short() {
        assert!(detect_format(&[0u8; 8]).is_err());
        assert!(detect_format(&[0xFF, 0xD8, 0xFF]).is_err());
    }

    #[test]
    fn test_get_jpeg_info_skips_app_segments() {
        let info = get_jpeg_info(&sof_jpeg(200, 100, 3)).unwrap();
        assert_eq!(
            info,
            JpegInfo {
                width: 200,
                height: 100,
                bits_per_component: 8,
                num_components: 3,
            }
        );
    }

    #[test]
    fn test_get_jpeg_info_without_sof() {
        let data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, 0xFF, 0xD9, 0x00, 0x00];
        assert!(get_jpeg_info(&data).is_err());
    }

    #[test]
    fn test_from_jpeg_color_spaces() {
        let rgb = ImageXObject::from_jpeg(&sof_jpeg(16, 8, 3)).unwrap();
        assert_eq!(rgb.color_space, "DeviceRGB");
        assert_eq!((rgb.width, rgb.height), (16, 8));

        let gray = ImageXObject::from_jpeg(&sof_jpeg(16, 8, 1)).unwrap();
        assert_eq!(gray.color_space, "DeviceGray");

        let cmyk = ImageXObject::from_jpeg(&sof_jpeg(16, 8, 4)).unwrap();
        assert_eq!(cmyk.color_space, "DeviceCMYK");

        assert!(ImageXObject::from_jpeg(&sof_jpeg(16, 8, 2)).is_err());
    }

    #[test]
    fn test_from_jpeg_rejects_png() {
        let png_header = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        let err = ImageXObject::from_jpeg(&png_header).unwrap_err();
        assert!(err.to_string().contains("got PNG"));
    }

    #[test]
    fn test_image_xobject_to_pdf_stream() {
        let xobject = ImageXObject {
            width: 100,
            height: 50,
            color_space: "DeviceRGB".to_string(),
            bits_per_component: 8,
            data: vec![1, 2, 3, 4, 5],
        };

        let stream = xobject.to_pdf_stream();
        let dict = &stream.dict;

        assert_eq!(dict.get(b"Type").unwrap().as_name().unwrap(), b"XObject");
        assert_eq!(dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Image");
        assert_eq!(dict.get(b"Width").unwrap().as_i64().unwrap(), 100);
        assert_eq!(dict.get(b"Height").unwrap().as_i64().unwrap(), 50);
        assert_eq!(
            dict.get(b"ColorSpace").unwrap().as_name().unwrap(),
            b"DeviceRGB"
        );
        assert_eq!(dict.get(b"BitsPerComponent").unwrap().as_i64().unwrap(), 8);
        assert_eq!(
            dict.get(b"Filter").unwrap().as_name().unwrap(),
            b"DCTDecode"
        );
        assert_eq!(stream.content, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_generate_image_operators() {
        let ops = generate_image_operators("Im1", 100.0, 200.0, 50.0, 75.0);
        let ops_str = String::from_utf8(ops).unwrap();

        assert_eq!(ops_str, "q\n50 0 0 75 100 200 cm\n/Im1 Do\nQ\n");
    }

    #[test]
    fn test_generate_image_operators_fractional() {
        let ops = generate_image_operators("Im2", 50.0, 297.12598, 495.2755905, 247.63779);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("495.2756 0 0 247.6378 50 297.126 cm"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.00001), "0");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(-3.25), "-3.25");
        assert_eq!(format_number(1e9), "1000000000");
    }
}
