use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Image formats accepted as ingest input
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Webp,
    Svg,
    Other(String),
}

impl ImageFormat {
    /// Determine format from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            "gif" => Self::Gif,
            "bmp" => Self::Bmp,
            "webp" => Self::Webp,
            "svg" => Self::Svg,
            other => Self::Other(other.to_string()),
        }
    }

    /// Check if format is on the ingest allow-list
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

/// Size and dimensions of the original image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub size_kb: u64,
    pub width: u32,
    pub height: u32,
}

/// One image to ingest, plus the user-supplied metadata for its record
#[derive(Debug, Clone, Default)]
pub struct IngestRequest {
    /// Path to the image file
    pub path: PathBuf,

    /// Tags in the order given
    pub tags: Vec<String>,

    /// Free text description
    pub desc: String,
}

impl IngestRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }
}
