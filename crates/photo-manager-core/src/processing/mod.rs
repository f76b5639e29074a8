// Core modules
mod crypto_hash;
pub mod file_validation;
pub mod thumbnail;

// Expose fingerprinting
pub use crypto_hash::*;

// Reexport core functionality
pub use file_validation::{inspect_image, is_image_path, validate_input};
pub use thumbnail::{make_thumbnail, thumbnail_path, THUMB_TAG};
