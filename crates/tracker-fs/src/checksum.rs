//! SHA-256 checksum utilities
//!
//! Provides a single canonical digest format (`sha256:<hex>`) for package
//! records and stored images.

use sha2::{Digest, Sha256};

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum over a sequence of byte slices.
///
/// Each part is length-prefixed so that moving bytes between parts
/// changes the result. Returns `"sha256:<hex>"`.
pub fn compute_checksum(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Hex SHA-256 of `content` without the prefix, usable as a file name.
pub fn content_hex(content: &[u8]) -> String {
    format!("{:x}", Sha256::digest(content))
}
