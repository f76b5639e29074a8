//! Sequential ingest of one image.
//!
//! validate -> fingerprint -> dedup check -> inspect -> rename -> thumbnail
//! -> upload -> record. Each stage runs only if the previous one succeeded.
//! A hash already present in the store ends the run before anything on disk
//! is touched. Any failure is reported as [`Error::Stage`]; side effects of
//! earlier stages are kept unless `rollback_on_failure` is set.
use chrono::Utc;
use log::{info, warn};
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::{Error, Result, Stage};
use crate::persistence::{PhotoRecord, RecordStore};
use crate::processing::{fingerprint, inspect_image, make_thumbnail, validate_input};
use crate::rename::{rename_photo, restore_name};
use crate::types::IngestRequest;
use crate::upload::{CommandUploader, UploadItem, UploadRole, UploadedFile, Uploader};
use crate::log_fs_modification;

/// How an ingest run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The content was already recorded; nothing was changed
    Duplicate(PhotoRecord),

    /// The image was renamed, thumbnailed, uploaded and recorded
    Done {
        record: PhotoRecord,
        shard_path: PathBuf,
    },
}

/// Files created or moved by the current run
#[derive(Debug)]
struct Written {
    original: PathBuf,
    renamed: PathBuf,
    thumbnail: Option<PathBuf>,
}

/// Main entry point for the ingest process
pub struct Ingester<U = CommandUploader> {
    config: Config,
    store: RecordStore,
    uploader: U,
}

impl Ingester<CommandUploader> {
    /// Create an ingester that uploads through the configured executable
    pub fn new(config: Config) -> Result<Self> {
        let uploader = CommandUploader::from_config(&config);
        Self::with_uploader(config, uploader)
    }
}

impl<U: Uploader> Ingester<U> {
    pub fn with_uploader(config: Config, uploader: U) -> Result<Self> {
        config.validate()?;
        let store = RecordStore::new(&config.record_dir);

        Ok(Self {
            config,
            store,
            uploader,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Run one image through the pipeline, stamped with the current time
    pub fn ingest(&self, request: &IngestRequest) -> Result<IngestOutcome> {
        self.ingest_at(request, Utc::now().timestamp())
    }

    /// Run one image through the pipeline with an explicit `created_at`
    pub fn ingest_at(&self, request: &IngestRequest, created_at: i64) -> Result<IngestOutcome> {
        let source = request.path.as_path();
        info!("Ingesting {}", source.display());

        validate_input(source).map_err(|e| e.at(Stage::Validate))?;
        self.store
            .shard_path(created_at)
            .map_err(|e| Error::from(e).at(Stage::Validate))?;

        let mut record = PhotoRecord {
            path: source.to_string_lossy().into_owned(),
            created_at,
            tags: request.tags.clone(),
            desc: request.desc.clone(),
            ..Default::default()
        };

        record.hash = fingerprint(source).map_err(|e| e.at(Stage::Fingerprint))?;
        info!("Fingerprint {}", record.hash);

        if let Some(existing) = self
            .store
            .exists_by_hash(&record.hash)
            .map_err(|e| Error::from(e).at(Stage::DedupCheck))?
        {
            info!(
                "Hash {} already recorded as {}",
                record.hash, existing.filename
            );
            return Ok(IngestOutcome::Duplicate(existing));
        }

        let image_info = inspect_image(source).map_err(|e| e.at(Stage::Inspect))?;
        record.size_kb = image_info.size_kb;
        record.width = image_info.width;
        record.height = image_info.height;

        let (renamed, filename) =
            rename_photo(source, &record.hash).map_err(|e| e.at(Stage::Rename))?;
        record.filename = filename;
        record.rename_path = renamed.to_string_lossy().into_owned();

        let mut written = Written {
            original: source.to_path_buf(),
            renamed,
            thumbnail: None,
        };

        match self.finish(&mut record, &mut written) {
            Ok(shard_path) => {
                info!("Recorded {} in {}", record.filename, shard_path.display());
                Ok(IngestOutcome::Done { record, shard_path })
            }
            Err(e) => {
                if self.config.rollback_on_failure {
                    roll_back(&written);
                } else {
                    warn!(
                        "Ingest failed after rename; leaving {} in place",
                        written.renamed.display()
                    );
                }
                Err(e)
            }
        }
    }

    fn finish(&self, record: &mut PhotoRecord, written: &mut Written) -> Result<PathBuf> {
        let thumbnail = make_thumbnail(&written.renamed, self.config.thumb_width)
            .map_err(|e| e.at(Stage::Thumbnail))?;
        written.thumbnail = Some(thumbnail.clone());
        record.thumb_path = thumbnail.to_string_lossy().into_owned();
        record.thumb_name = thumbnail
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let items = [
            UploadItem::new(&written.renamed, UploadRole::Original),
            UploadItem::new(&thumbnail, UploadRole::Thumbnail),
        ];
        let uploaded = self
            .uploader
            .upload(&items)
            .map_err(|e| e.at(Stage::Upload))?;
        assign_urls(record, &uploaded).map_err(|e| e.at(Stage::Upload))?;

        self.store
            .append(record)
            .map_err(|e| Error::from(e).at(Stage::Record))
    }
}

/// Copy uploaded URLs onto the record by role
pub fn assign_urls(record: &mut PhotoRecord, uploaded: &[UploadedFile]) -> Result<()> {
    if uploaded.is_empty() {
        return Err(Error::Upload("uploader returned no results".to_string()));
    }

    for file in uploaded {
        match file.role {
            UploadRole::Original => record.url = file.url.clone(),
            UploadRole::Thumbnail => record.thumb_url = file.url.clone(),
        }
    }

    if record.url.is_empty() {
        return Err(Error::Upload("no URL returned for the original".to_string()));
    }
    if record.thumb_url.is_empty() {
        return Err(Error::Upload("no URL returned for the thumbnail".to_string()));
    }
    Ok(())
}

fn roll_back(written: &Written) {
    if let Some(thumbnail) = &written.thumbnail {
        match fs::remove_file(thumbnail) {
            Ok(()) => log_fs_modification!("remove_thumbnail", thumbnail, "rollback"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Rollback could not remove {}: {}",
                thumbnail.display(),
                e
            ),
        }
    }

    if let Err(e) = restore_name(&written.renamed, &written.original) {
        warn!(
            "Rollback could not restore {} to {}: {}",
            written.renamed.display(),
            written.original.display(),
            e
        );
    }
}
