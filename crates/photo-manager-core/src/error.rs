use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::persistence::StoreError;

pub type Result<T> = core::result::Result<T, Error>;

/// Pipeline stage in which an ingest failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Fingerprint,
    DedupCheck,
    Inspect,
    Rename,
    Thumbnail,
    Upload,
    Record,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Fingerprint => "fingerprint",
            Self::DedupCheck => "dedup-check",
            Self::Inspect => "inspect",
            Self::Rename => "rename",
            Self::Thumbnail => "thumbnail",
            Self::Upload => "upload",
            Self::Record => "record",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Custom error types for the photo-manager library
#[derive(Error, Debug)]
pub enum Error {
    /// Input path or extension rejected
    #[error("Invalid input: {0}")]
    Validation(String),

    /// File could not be opened, read or stat'ed
    #[error("File error on {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rename target already exists
    #[error("Rename target already exists: {0}")]
    Collision(PathBuf),

    /// Unsupported or corrupt image data
    #[error("Cannot decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Record store read or write failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// External uploader failed or produced unusable output
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A pipeline stage failed; carries the stage and the underlying cause
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::File {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn decode(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Error::Decode {
            path: path.into(),
            source,
        }
    }

    /// Wrap this error with the stage it occurred in
    pub fn at(self, stage: Stage) -> Self {
        match self {
            // keep the innermost stage
            already @ Error::Stage { .. } => already,
            other => Error::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The failing stage, if this error came out of the pipeline
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The underlying cause with any stage wrapper removed
    pub fn cause(&self) -> &Error {
        match self {
            Error::Stage { source, .. } => source.cause(),
            other => other,
        }
    }
}
