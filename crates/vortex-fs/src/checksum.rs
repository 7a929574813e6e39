//! SHA-256 checksums for drift detection
//!
//! Unit files are rewritten only when their rendered content differs from
//! what is on disk; these helpers make that comparison.

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::{Error, Result};

const PREFIX: &str = "sha256:";

/// Checksum of in-memory content in the form `sha256:<hex>`.
pub fn content_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Checksum of a file, or `None` if the file does not exist.
pub fn file_checksum(path: &Path) -> Result<Option<String>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(content_checksum(&bytes))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}
