use chrono::{DateTime, Datelike, Local};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::{StoreError, StoreResult};
use super::models::PhotoRecord;
use crate::log_fs_modification;

/// Append-only set of per-month JSON shards in one directory
#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Shard a record created at `created_at` belongs to, `{YYYY}-{MM}.json`
    pub fn shard_path(&self, created_at: i64) -> StoreResult<PathBuf> {
        Ok(self.dir.join(shard_file_name(created_at)?))
    }

    /// Shard files in lexicographic order. A missing directory is an empty store.
    pub fn shards(&self) -> StoreResult<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut shards = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| StoreError::io(&self.dir, io::Error::from(e)))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.file_name().to_str().is_some_and(is_shard_name) {
                shards.push(entry.into_path());
            }
        }

        Ok(shards)
    }

    /// Find the record carrying `hash`.
    ///
    /// Shards are visited in name order and the first match wins. Unreadable
    /// or malformed shards are skipped. An element whose `hash` matches but
    /// whose other fields do not decode still counts as a match.
    pub fn exists_by_hash(&self, hash: &str) -> StoreResult<Option<PhotoRecord>> {
        for shard in self.shards()? {
            let elements = match read_elements(&shard) {
                Ok(elements) => elements,
                Err(e) => {
                    warn!("Skipping unreadable shard {}: {}", shard.display(), e);
                    continue;
                }
            };

            let Some(element) = elements
                .into_iter()
                .find(|element| element.get("hash").and_then(Value::as_str) == Some(hash))
            else {
                continue;
            };

            debug!("Hash {} found in {}", hash, shard.display());
            let record = match PhotoRecord::deserialize(&element) {
                Ok(record) => record,
                Err(e) => {
                    warn!(
                        "Record with hash {} in {} only partly decodes: {}",
                        hash,
                        shard.display(),
                        e
                    );
                    PhotoRecord::from_raw(&element)
                }
            };
            return Ok(Some(record));
        }

        Ok(None)
    }

    /// Append `record` to the shard for its `created_at`, creating the
    /// directory and shard as needed. Returns the shard path.
    pub fn append(&self, record: &PhotoRecord) -> StoreResult<PathBuf> {
        let shard = self.shard_path(record.created_at)?;

        let mut records = read_shard(&shard)?;
        records.push(record.clone());

        let json = serde_json::to_vec_pretty(&records).map_err(StoreError::Serialize)?;

        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;
        write_replace(&shard, &json)?;

        log_fs_modification!(
            "append_record",
            shard,
            format!("hash={} records={}", record.hash, records.len())
        );
        Ok(shard)
    }

    /// Every record in every shard, shard by shard in name order
    pub fn read_all(&self) -> StoreResult<Vec<PhotoRecord>> {
        let mut all = Vec::new();
        for shard in self.shards()? {
            all.extend(read_shard(&shard)?);
        }
        Ok(all)
    }
}

/// Read one shard. A missing or empty file holds no records.
pub fn read_shard(path: &Path) -> StoreResult<Vec<PhotoRecord>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StoreError::io(path, e)),
    };

    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    serde_json::from_slice(&data).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_elements(path: &Path) -> StoreResult<Vec<Value>> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write to a sibling temp file, flush to disk, then rename over `path`.
/// The shard is either fully replaced or left as it was.
pub(super) fn write_replace(path: &Path, contents: &[u8]) -> StoreResult<()> {
    let tmp = path.with_extension("json.tmp");

    let result = File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(contents)?;
            file.sync_all()
        })
        .and_then(|_| fs::rename(&tmp, path));

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(StoreError::io(path, e));
    }
    Ok(())
}

/// `{YYYY}-{MM}.json` for the local calendar month of `created_at`.
/// Years that do not have exactly four digits are rejected, so every shard
/// written is one `is_shard_name` accepts.
pub fn shard_file_name(created_at: i64) -> StoreResult<String> {
    let utc = DateTime::from_timestamp(created_at, 0)
        .ok_or(StoreError::InvalidTimestamp(created_at))?;
    let local = utc.with_timezone(&Local);
    if !(1000..=9999).contains(&local.year()) {
        return Err(StoreError::InvalidTimestamp(created_at));
    }
    Ok(format!("{}-{:02}.json", local.year(), local.month()))
}

/// Whether a file name looks like `{YYYY}-{MM}.json`
pub fn is_shard_name(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(".json") else {
        return false;
    };
    let Some((year, month)) = stem.split_once('-') else {
        return false;
    };
    year.len() == 4
        && month.len() == 2
        && year.bytes().all(|b| b.is_ascii_digit())
        && month.bytes().all(|b| b.is_ascii_digit())
}
