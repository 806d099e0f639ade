//! TTL check for cache artifacts.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};

/// Where a cache artifact stands against its TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactState {
    Absent,
    Fresh,
    Stale,
}

/// Inspect `path` at instant `now`.
///
/// `ttl_seconds` of `None`, zero or less means always stale.
///
/// # Errors
///
/// Returns the I/O error if the artifact exists but its metadata cannot be read.
pub fn inspect(path: &Path, ttl_seconds: Option<i64>, now: DateTime<Utc>) -> io::Result<ArtifactState> {
    let modified = match fs::metadata(path) {
        Ok(meta) => meta.modified()?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ArtifactState::Absent),
        Err(e) => return Err(e),
    };

    Ok(classify(DateTime::<Utc>::from(modified), ttl_seconds, now))
}

/// Fresh only while `0 <= now - modified < ttl`. A modification time in the
/// future (clock skew, restored backups) is stale.
pub fn classify(modified: DateTime<Utc>, ttl_seconds: Option<i64>, now: DateTime<Utc>) -> ArtifactState {
    let Some(ttl) = ttl_seconds.filter(|&s| s > 0).and_then(TimeDelta::try_seconds) else {
        return ArtifactState::Stale;
    };

    let age = now.signed_duration_since(modified);
    if age >= TimeDelta::zero() && age < ttl { ArtifactState::Fresh } else { ArtifactState::Stale }
}
