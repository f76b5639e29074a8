use image::{ImageBuffer, Rgb};
use std::path::{Path, PathBuf};

/// 2025-08-15 12:00:00 UTC
pub const AUG_2025: i64 = 1_755_259_200;

/// Write a gradient image; the format follows the extension of `name`
pub fn create_test_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
    .save(&path)
    .unwrap();
    path
}

/// Byte-for-byte copy of `src` under a new name in the same directory
pub fn copy_as(src: &Path, name: &str) -> PathBuf {
    let dest = src.with_file_name(name);
    std::fs::copy(src, &dest).unwrap();
    dest
}
