//! Input directory scanning

use crate::{ImgPdfError, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// File name suffixes accepted as images (case-sensitive)
pub const IMAGE_EXTENSIONS: [&str; 3] = [".png", ".jpg", ".jpeg"];

/// Check whether a file name ends with one of [`IMAGE_EXTENSIONS`]
pub fn is_supported_image(name: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// List image file names in `dir`, sorted ascending
///
/// Only direct children are considered. Entries that match by name but are
/// not regular files, or whose names are not valid UTF-8, are skipped.
///
/// # Errors
/// Returns [`ImgPdfError::ReadDir`] if the directory cannot be read.
pub fn list_images<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
    let dir = dir.as_ref();
    let read_dir_error = |source| ImgPdfError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;

        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                warn!(name = ?raw, "Skipping entry with non UTF-8 name");
                continue;
            }
        };

        if !is_supported_image(&name) {
            continue;
        }

        // Follows symlinks, so a link to an image still counts
        if !entry.path().is_file() {
            warn!(%name, "Skipping non-file entry with image extension");
            continue;
        }

        names.push(name);
    }

    names.sort();
    debug!(dir = %dir.display(), count = names.len(), "Scanned input directory");
    Ok(names)
}
