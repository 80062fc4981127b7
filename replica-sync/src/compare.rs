//! Content comparator: byte equality of two regular files.
//!
//! Files of different lengths are unequal without reading either one.
//! Otherwise both are streamed through SHA-256 and the digests compared, so
//! neither file is ever held in memory whole.

use std::fs::File;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{io_err, SyncError};

/// `true` when `a` and `b` hold identical bytes.
///
/// Both paths must name existing regular files. A file that cannot be read
/// (permission denied, removed since listing) is an error, never `false`.
pub fn files_equal(a: &Path, b: &Path) -> Result<bool, SyncError> {
    let len_a = std::fs::metadata(a).map_err(|e| io_err(a, e))?.len();
    let len_b = std::fs::metadata(b).map_err(|e| io_err(b, e))?.len();
    if len_a != len_b {
        return Ok(false);
    }
    Ok(file_digest(a)? == file_digest(b)?)
}

/// Hex-encoded SHA-256 of the file at `path`, read in chunks.
pub fn file_digest(path: &Path) -> Result<String, SyncError> {
    let mut file = File::open(path).map_err(|e| io_err(path, e))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher).map_err(|e| io_err(path, e))?;
    Ok(hex::encode(hasher.finalize()))
}
