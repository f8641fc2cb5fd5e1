//! Content-derived versions for configuration values
//!
//! A version is a short hex digest over the compact JSON encoding of a value. Two
//! values share a version exactly when they serialize identically, so versions work
//! both as optimistic-lock tokens and as identifiers for list entries that carry no
//! natural key.

use crate::error::ConfigError;
use crate::types::Version;
use serde::Serialize;

/// Number of digest bytes kept in a version string.
const VERSION_BYTES: usize = 16;

/// Compute the version of any serializable configuration value.
pub fn version_of<T: Serialize + ?Sized>(value: &T) -> Result<Version, ConfigError> {
    let mut hasher = blake3::Hasher::new();
    serde_json::to_writer(&mut hasher, value)?;
    let digest = hasher.finalize();
    Ok(hex::encode(&digest.as_bytes()[..VERSION_BYTES]))
}

/// Find the position of the entry whose computed version equals `version`.
pub(crate) fn position_by_version<T: Serialize>(
    entries: &[T],
    version: &str,
) -> Result<Option<usize>, ConfigError> {
    for (index, entry) in entries.iter().enumerate() {
        if version_of(entry)? == version {
            return Ok(Some(index));
        }
    }
    Ok(None)
}
