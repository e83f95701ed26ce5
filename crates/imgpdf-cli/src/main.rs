//! imgpdf CLI - Convert a directory of images into a PDF, one image per page.

use anyhow::{Context, Result};
use clap::Parser;
use imgpdf::{generate_pdf, GeneratorConfig, PageSpec};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "imgpdf")]
#[command(author, version, about = "Convert a directory of images into a PDF", long_about = None)]
struct Args {
    /// Directory containing .png/.jpg/.jpeg files (created if missing)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output PDF file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Page size: a3, a4, a5, letter or legal
    #[arg(short, long)]
    page_size: Option<String>,

    /// Use landscape orientation
    #[arg(long, conflicts_with = "portrait")]
    landscape: bool,

    /// Use portrait orientation, overriding a config file's landscape setting
    #[arg(long)]
    portrait: bool,

    /// Margin on every side, in points
    #[arg(short, long)]
    margin: Option<f64>,

    /// JPEG compression level, 0 (best quality) to 9 (smallest)
    #[arg(short = 'l', long, allow_negative_numbers = true)]
    compression_level: Option<i32>,

    /// Document title
    #[arg(long)]
    title: Option<String>,

    /// Document author
    #[arg(long)]
    author: Option<String>,

    /// JSON config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Overlay explicitly given flags onto a base config
    fn apply_to(&self, mut config: GeneratorConfig) -> GeneratorConfig {
        if let Some(input) = &self.input {
            config.input_dir = input.clone();
        }
        if let Some(output) = &self.output {
            config.output_pdf = output.clone();
        }
        if let Some(page_size) = &self.page_size {
            config.page_size = PageSpec::Named(page_size.clone());
        }
        if self.landscape {
            config.landscape = Some(true);
        } else if self.portrait {
            config.landscape = Some(false);
        }
        if let Some(margin) = self.margin {
            config.margin = margin;
        }
        if let Some(level) = self.compression_level {
            config.compression_level = level;
        }
        if let Some(title) = &self.title {
            config.title = Some(title.clone());
        }
        if let Some(author) = &self.author {
            config.author = Some(author.clone());
        }
        config
    }
}

fn log_filter(verbose: u8) -> EnvFilter {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.verbose))
        .with_target(false)
        .init();

    let base = match &args.config {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    let config = args.apply_to(base);

    std::fs::create_dir_all(&config.input_dir).with_context(|| {
        format!(
            "Failed to create input directory: {}",
            config.input_dir.display()
        )
    })?;

    let report = generate_pdf(&config).context("Failed to generate PDF")?;

    for page in &report.pages {
        info!(
            "Page {}: {} ({}x{} -> {:.1}x{:.1} pt at {:.1},{:.1})",
            page.page,
            page.file_name,
            page.content_width,
            page.content_height,
            page.placement.width,
            page.placement.height,
            page.placement.x,
            page.placement.y,
        );
    }

    println!(
        "Wrote {} page(s) to {}",
        report.pages.len(),
        report.output.display()
    );

    Ok(())
}
