//! End-to-end PDF generation

use crate::compress::compress_image;
use crate::config::GeneratorConfig;
use crate::layout::{PageLayout, Placement};
use crate::preprocess::preprocess_image;
use crate::scan::list_images;
use crate::Result;
use chrono::Utc;
use pdf_core::{DocumentInfo, PdfDocument};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Prefix for per-image JPEG artifacts
const ARTIFACT_PREFIX: &str = "imgpdf-";

/// What was drawn on one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageReport {
    /// Page number (1-indexed)
    pub page: usize,
    /// Source file name within the input directory
    pub file_name: String,
    /// Size of the visible-content crop, used for layout
    pub content_width: u32,
    pub content_height: u32,
    /// Where the image was drawn
    pub placement: Placement,
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub output: PathBuf,
    pub pages: Vec<PageReport>,
}

/// Convert every image in the input directory into one PDF page each
///
/// Images are processed in ascending file name order. For each image the
/// visible-content crop determines the drawn size, while the drawn pixels
/// come from a JPEG re-encode of the whole, uncropped source. Any error
/// aborts the run; the output file is only written once all pages succeed.
///
/// # Errors
/// Fails on invalid configuration, a missing input directory, any image
/// that cannot be decoded or encoded, or when the PDF cannot be written.
pub fn generate_pdf(config: &GeneratorConfig) -> Result<GenerationReport> {
    config.validate()?;
    let layout = config.layout()?;
    let temp_dir = config.temp_dir();

    let image_files = list_images(&config.input_dir)?;
    info!(
        input = %config.input_dir.display(),
        count = image_files.len(),
        "Generating PDF"
    );

    let mut doc = PdfDocument::new(layout.page);
    doc.set_info(DocumentInfo {
        title: config.title.clone(),
        author: config.author.clone(),
        creator: Some(env!("CARGO_PKG_NAME").to_string()),
        producer: Some(format!("imgpdf {}", env!("CARGO_PKG_VERSION"))),
        creation_date: Some(Utc::now()),
        ..Default::default()
    });

    let mut pages = Vec::with_capacity(image_files.len());
    for file_name in image_files {
        let image_path = config.input_dir.join(&file_name);
        let report = render_page(
            &mut doc,
            &layout,
            &image_path,
            file_name,
            &temp_dir,
            config.compression_level,
        )?;
        pages.push(report);
    }

    doc.save(&config.output_pdf)?;
    info!(
        output = %config.output_pdf.display(),
        pages = pages.len(),
        "PDF written"
    );

    Ok(GenerationReport {
        output: config.output_pdf.clone(),
        pages,
    })
}

/// Preprocess, compress and draw one image on a new page
fn render_page(
    doc: &mut PdfDocument,
    layout: &PageLayout,
    image_path: &Path,
    file_name: String,
    temp_dir: &Path,
    compression_level: i32,
) -> Result<PageReport> {
    let (content_width, content_height) = preprocess_image(image_path)?.dimensions();

    // Removed on drop, including when a later step returns early
    let artifact = tempfile::Builder::new()
        .prefix(ARTIFACT_PREFIX)
        .suffix(".jpg")
        .tempfile_in(temp_dir)?;
    let compressed_path = compress_image(image_path, artifact.path(), compression_level)?;
    let jpeg = fs::read(&compressed_path)?;

    let placement = layout.fit(content_width, content_height);
    let page = doc.add_page()?;
    doc.insert_jpeg(
        &jpeg,
        page,
        placement.x,
        placement.y,
        placement.width,
        placement.height,
    )?;

    artifact.close()?;

    info!(page, file = %file_name, "Added page");
    debug!(
        page,
        content_width,
        content_height,
        scale = placement.scale,
        x = placement.x,
        y = placement.y,
        width = placement.width,
        height = placement.height,
        "Placed image"
    );

    Ok(PageReport {
        page,
        file_name,
        content_width,
        content_height,
        placement,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn config_for(dir: &Path) -> GeneratorConfig {
        let input_dir = dir.join("in");
        let temp_dir = dir.join("tmp");
        fs::create_dir_all(&input_dir).unwrap();
        fs::create_dir_all(&temp_dir).unwrap();
        GeneratorConfig {
            input_dir,
            output_pdf: dir.join("out.pdf"),
            temp_dir: Some(temp_dir),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_page_cleans_up_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());
        let path = config.input_dir.join("one.png");
        RgbaImage::from_pixel(10, 10, Rgba([9, 9, 9, 255]))
            .save(&path)
            .unwrap();

        let mut doc = PdfDocument::new(pdf_core::PageSize::A4);
        let layout = config.layout().unwrap();
        let temp_dir = config.temp_dir();
        let report =
            render_page(&mut doc, &layout, &path, "one.png".to_string(), &temp_dir, 5).unwrap();

        assert_eq!(report.page, 1);
        assert_eq!(doc.page_count(), 1);
        assert_eq!(fs::read_dir(&temp_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_render_page_decode_failure_adds_no_page() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path());
        let path = config.input_dir.join("broken.png");
        fs::write(&path, b"garbage").unwrap();

        let mut doc = PdfDocument::new(pdf_core::PageSize::A4);
        let layout = config.layout().unwrap();
        let temp_dir = config.temp_dir();
        let result = render_page(
            &mut doc,
            &layout,
            &path,
            "broken.png".to_string(),
            &temp_dir,
            5,
        );
        assert!(result.is_err());

        assert_eq!(doc.page_count(), 0);
        assert_eq!(fs::read_dir(&temp_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_invalid_config_fails_before_scanning() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            input_dir: dir.path().join("missing"),
            output_pdf: dir.path().join("out.pdf"),
            margin: 1000.0,
            ..Default::default()
        };

        let err = generate_pdf(&config).unwrap_err();
        assert!(matches!(err, crate::ImgPdfError::Config(_)));
        assert!(!config.output_pdf.exists());
    }
}
