//! Generator configuration

use crate::compress::DEFAULT_COMPRESSION_LEVEL;
use crate::layout::{PageLayout, DEFAULT_MARGIN};
use crate::{ImgPdfError, Result};
use pdf_core::PageSize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Page size as written in a config file
///
/// Either a preset name (`"a4"`, `"letter"`, ...) or explicit points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageSpec {
    Named(String),
    Custom { width: f64, height: f64 },
}

impl PageSpec {
    /// Resolve to a concrete page size
    pub fn resolve(&self) -> Result<PageSize> {
        match self {
            PageSpec::Named(name) => PageSize::from_name(name)
                .ok_or_else(|| ImgPdfError::Config(format!("Unknown page size: {name}"))),
            PageSpec::Custom { width, height } => Ok(PageSize::new(*width, *height)),
        }
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        PageSpec::Named("a4".to_string())
    }
}

/// Everything needed for one generator run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Directory scanned for images
    pub input_dir: PathBuf,

    /// Destination PDF
    pub output_pdf: PathBuf,

    /// Page size for every page
    pub page_size: PageSpec,

    /// Force landscape (`true`) or portrait (`false`); unset keeps the page as given
    pub landscape: Option<bool>,

    /// Margin on every side, in points
    pub margin: f64,

    /// JPEG compression level, 0 (best) to 9 (smallest)
    pub compression_level: i32,

    /// Where per-image JPEG artifacts are created (system temp dir if unset)
    pub temp_dir: Option<PathBuf>,

    /// Document title for the Info dictionary
    pub title: Option<String>,

    /// Document author for the Info dictionary
    pub author: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input_images"),
            output_pdf: PathBuf::from("output.pdf"),
            page_size: PageSpec::default(),
            landscape: None,
            margin: DEFAULT_MARGIN,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            temp_dir: None,
            title: None,
            author: None,
        }
    }
}

impl GeneratorConfig {
    /// Parse a config from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The page size after applying `landscape`
    pub fn page_size(&self) -> Result<PageSize> {
        let size = self.page_size.resolve()?;
        Ok(match self.landscape {
            Some(true) => size.landscape(),
            Some(false) => size.portrait(),
            None => size,
        })
    }

    /// Page geometry for layout
    pub fn layout(&self) -> Result<PageLayout> {
        Ok(PageLayout::new(self.page_size()?, self.margin))
    }

    /// Directory for temporary artifacts
    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Reject geometry that cannot hold an image
    pub fn validate(&self) -> Result<()> {
        let page = self.page_size()?;
        if !(page.width.is_finite() && page.height.is_finite())
            || page.width <= 0.0
            || page.height <= 0.0
        {
            return Err(ImgPdfError::Config(format!(
                "Page size must be positive, got {} x {}",
                page.width, page.height
            )));
        }

        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ImgPdfError::Config(format!(
                "Margin must be a non-negative number, got {}",
                self.margin
            )));
        }

        let layout = PageLayout::new(page, self.margin);
        if layout.available_width() <= 0.0 || layout.available_height() <= 0.0 {
            return Err(ImgPdfError::Config(format!(
                "Margin {} leaves no drawable area on a {} x {} page",
                self.margin, page.width, page.height
            )));
        }

        Ok(())
    }
}
