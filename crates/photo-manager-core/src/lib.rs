//! Core functionality for ingesting photos into an uploaded photo library.
//!
//! One run takes a single local image through:
//! - Content fingerprinting and dedup against earlier imports
//! - Deterministic, collision-checked renaming
//! - Thumbnail generation
//! - Upload through an external tool
//! - Append to a per-month JSON record shard

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use config::Config;
pub use error::{Error, Result, Stage};
pub use persistence::{PhotoRecord, RecordQuery, RecordStore, StoreError};
pub use pipeline::{IngestOutcome, Ingester};
pub use types::*;
pub use upload::{CommandUploader, UploadItem, UploadRole, UploadedFile, Uploader};

// -- Public Modules --
pub mod config;
pub mod logging;
pub mod persistence;
pub mod pipeline;
pub mod processing;
pub mod rename;
pub mod types;
pub mod upload;
