use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::{log_file_error, log_fs_modification};

/// Number of fingerprint characters embedded in renamed files
pub const SHORT_HASH_LEN: usize = 8;

/// `photo.png` + `abcd1234ef...` -> `photo.abcd1234.png`.
///
/// The name is split at its last `.`; a name without one gets no extension
/// (`scan` -> `scan.abcd1234`).
pub fn renamed_file_name(original_name: &str, hash: &str) -> Result<String> {
    let short = hash
        .get(..SHORT_HASH_LEN)
        .ok_or_else(|| Error::Validation(format!("Fingerprint too short: {:?}", hash)))?;

    Ok(match original_name.rsplit_once('.') {
        Some((stem, ext)) => format!("{}.{}.{}", stem, short, ext),
        None => format!("{}.{}", original_name, short),
    })
}

/// Move `original` to its fingerprinted name in the same directory.
///
/// Fails with `Collision` instead of overwriting an existing file. Returns
/// the new path and file name.
pub fn rename_photo(original: &Path, hash: &str) -> Result<(PathBuf, String)> {
    let original_name = original
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            Error::Validation(format!("{} has no valid file name", original.display()))
        })?;

    let new_name = renamed_file_name(original_name, hash)?;
    let new_path = original.with_file_name(&new_name);

    if fs::symlink_metadata(&new_path).is_ok() {
        return Err(Error::Collision(new_path));
    }

    fs::rename(original, &new_path).map_err(|e| {
        log_file_error!(original, "rename", e);
        Error::file(original, e)
    })?;

    log_fs_modification!(
        "rename",
        original,
        format!("-> {}", new_path.display())
    );
    Ok((new_path, new_name))
}

/// Move a renamed file back to where it came from, refusing to overwrite
pub fn restore_name(renamed: &Path, original: &Path) -> Result<()> {
    if fs::symlink_metadata(original).is_ok() {
        return Err(Error::Collision(original.to_path_buf()));
    }

    fs::rename(renamed, original).map_err(|e| Error::file(renamed, e))?;

    log_fs_modification!(
        "restore_name",
        renamed,
        format!("-> {}", original.display())
    );
    Ok(())
}
