//! Content fingerprinting.
//!
//! The file is streamed through a Blake3 hasher in fixed-size chunks, so
//! memory use does not grow with file size. The digest is rendered as
//! lowercase hex and serves both as the dedup key in the record store and as
//! the disambiguator in renamed file names.
use crate::error::{Error, Result};
use crate::log_hash_error;

use std::{fs::File, io::Read, path::Path};

/// Length of the hex fingerprint
pub const FINGERPRINT_LEN: usize = 64;

/// Compute the lowercase hex Blake3 fingerprint of a file
pub fn fingerprint<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    compute_fingerprint(path).map_err(|e| {
        log_hash_error!(path, e);
        Error::file(path, e)
    })
}

fn compute_fingerprint(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = blake3::Hasher::new();

    let mut buffer = [0; 8192]; // 8KB buffer
    loop {
        let bytes_read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}
