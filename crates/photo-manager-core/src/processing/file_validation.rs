use image::io::Reader as ImageReader;
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Error, Result};
use crate::log_file_error;
use crate::types::{ImageFormat, ImageInfo};

/// Get file extension as lowercase string
pub fn get_file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Returns if the given path has an allowed image extension
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ImageFormat::from_extension(ext).is_allowed())
        .unwrap_or(false)
}

/// Check the input has an allowed extension and is an existing regular file
pub fn validate_input(path: &Path) -> Result<ImageFormat> {
    if !is_image_path(path) {
        return Err(Error::Validation(format!(
            "{} is not a supported image file (.jpg .jpeg .png .gif .bmp .webp .svg)",
            path.display()
        )));
    }

    let metadata = std::fs::metadata(path).map_err(|e| {
        log_file_error!(path, "metadata", e);
        Error::file(path, e)
    })?;

    if !metadata.is_file() {
        return Err(Error::Validation(format!(
            "{} is not a regular file",
            path.display()
        )));
    }

    Ok(ImageFormat::from_extension(&get_file_extension(path)))
}

/// Image reader whose format is sniffed from the file contents, falling back
/// to the extension when the header is not recognised
pub(crate) fn open_image(path: &Path) -> Result<ImageReader<BufReader<File>>> {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| Error::file(path, e))
}

/// Read file size and pixel dimensions without decoding the whole image
pub fn inspect_image(path: &Path) -> Result<ImageInfo> {
    let metadata = std::fs::metadata(path).map_err(|e| Error::file(path, e))?;
    let (width, height) = open_image(path)?
        .into_dimensions()
        .map_err(|e| Error::decode(path, e))?;

    let info = ImageInfo {
        size_kb: metadata.len() / 1024,
        width,
        height,
    };
    debug!("Inspected {}: {:?}", path.display(), info);
    Ok(info)
}
