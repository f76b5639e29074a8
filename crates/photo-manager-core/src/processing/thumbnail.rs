use image::imageops::FilterType;
use image::DynamicImage;
use std::path::{Path, PathBuf};

use super::file_validation::{get_file_extension, open_image};
use crate::error::{Error, Result};
use crate::log_fs_modification;

/// Tag inserted before the extension of thumbnail file names
pub const THUMB_TAG: &str = "thumb";

/// `name.1a2b3c4d.jpg` -> `name.1a2b3c4d.thumb.jpg`, in the same directory
pub fn thumbnail_path(renamed: &Path) -> PathBuf {
    let file_name = renamed
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let thumb_name = match file_name.rsplit_once('.') {
        Some((stem, ext)) => format!("{}.{}.{}", stem, THUMB_TAG, ext),
        None => format!("{}.{}", file_name, THUMB_TAG),
    };

    renamed.with_file_name(thumb_name)
}

/// Height that keeps the aspect ratio at `target_width`, at least one pixel
pub fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    if width == 0 {
        return 1;
    }
    let scaled = (height as f64 * target_width as f64 / width as f64).round() as u32;
    scaled.max(1)
}

/// Write a `target_width` wide Lanczos-resampled copy of `renamed` next to
/// it and return the thumbnail path. The source file is left untouched.
pub fn make_thumbnail(renamed: &Path, target_width: u32) -> Result<PathBuf> {
    if target_width == 0 {
        return Err(Error::Validation(
            "Thumbnail width must be greater than zero".to_string(),
        ));
    }

    let thumb_path = thumbnail_path(renamed);

    let img = open_image(renamed)?
        .decode()
        .map_err(|e| Error::decode(renamed, e))?;
    let height = scaled_height(img.width(), img.height(), target_width);
    let mut thumb = img.resize_exact(target_width, height, FilterType::Lanczos3);

    // JPEG has no alpha channel
    if matches!(get_file_extension(&thumb_path).as_str(), "jpg" | "jpeg") {
        thumb = DynamicImage::ImageRgb8(thumb.to_rgb8());
    }

    thumb.save(&thumb_path).map_err(|e| match e {
        image::ImageError::IoError(io) => Error::file(&thumb_path, io),
        other => Error::decode(&thumb_path, other),
    })?;

    log_fs_modification!(
        "create_thumbnail",
        thumb_path,
        format!("{}x{}", target_width, height)
    );
    Ok(thumb_path)
}
