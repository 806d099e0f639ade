//! Cache artifact materialization.
//!
//! Per request: check the artifact against its TTL, and when it is absent or
//! stale, splice the next rotated fragment into the source page and write the
//! result. Failures never propagate; they become `CacheResult::Failed` and the
//! host serves the original resource.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use super::freshness::{self, ArtifactState};
use super::outcome::{CacheResult, SkipReason};
use super::splice::{KeepPolicy, splice};
use super::write::write_atomic;
use crate::Error;
use crate::config::InterscribeConfig;
use crate::filter::RotationPool;
use crate::render::render_fragment;
use crate::rotation::RotationCursor;

/// Substitution and expiry settings taken from the configuration.
#[derive(Debug, Clone)]
pub struct MaterializerSettings {
    pub ttl_seconds: Option<i64>,
    pub insertion_target: String,
    pub keep: KeepPolicy,
    pub background: String,
}

impl From<&InterscribeConfig> for MaterializerSettings {
    fn from(config: &InterscribeConfig) -> Self {
        Self {
            ttl_seconds: config.cache_duration,
            insertion_target: config.insertion_target.clone(),
            keep: config.keep_target,
            background: config.background.clone(),
        }
    }
}

/// Result of a render attempt that did not fail.
enum Rendered {
    Written(usize),
    Skipped(SkipReason),
}

/// Materializes cache artifacts from the pool and cursor.
#[derive(Debug, Clone, Copy)]
pub struct CacheMaterializer<'a> {
    settings: &'a MaterializerSettings,
    pool: &'a RotationPool,
    cursor: &'a RotationCursor,
}

impl<'a> CacheMaterializer<'a> {
    pub fn new(settings: &'a MaterializerSettings, pool: &'a RotationPool, cursor: &'a RotationCursor) -> Self {
        Self { settings, pool, cursor }
    }

    /// Materialize `artifact` from `source` as of now.
    pub fn materialize(&self, source: &Path, artifact: &Path) -> CacheResult {
        self.materialize_at(source, artifact, Utc::now())
    }

    /// Materialize `artifact` from `source`, judging freshness at `now`.
    pub fn materialize_at(&self, source: &Path, artifact: &Path, now: DateTime<Utc>) -> CacheResult {
        let state = match freshness::inspect(artifact, self.settings.ttl_seconds, now) {
            Ok(state) => state,
            Err(e) => {
                let err = Error::CacheWrite(format!("{}: {e}", artifact.display()));
                tracing::warn!(error = %err, "cannot inspect cache artifact");
                return CacheResult::Failed { reason: err.to_string() };
            }
        };

        if state == ArtifactState::Fresh {
            tracing::debug!(artifact = %artifact.display(), "cache artifact is fresh");
            return CacheResult::Used;
        }

        match self.render(source, artifact) {
            Ok(Rendered::Written(index)) if state == ArtifactState::Absent => {
                tracing::debug!(artifact = %artifact.display(), index, "cache artifact created");
                CacheResult::Created { index }
            }
            Ok(Rendered::Written(index)) => {
                tracing::debug!(artifact = %artifact.display(), index, "cache artifact recreated");
                CacheResult::Recreated { index }
            }
            Ok(Rendered::Skipped(reason)) => {
                tracing::debug!(source = %source.display(), ?reason, "not interscribed");
                CacheResult::NotApplicable { reason }
            }
            Err(e) => {
                tracing::warn!(error = %e, "interscribe failed; serving original");
                CacheResult::Failed { reason: e.to_string() }
            }
        }
    }

    fn render(&self, source: &Path, artifact: &Path) -> Result<Rendered, Error> {
        let text = fs::read_to_string(source).map_err(|e| Error::SourceIo(format!("{}: {e}", source.display())))?;

        let target = self.settings.insertion_target.as_str();
        if target.is_empty() || !text.contains(target) {
            return Ok(Rendered::Skipped(SkipReason::NoInsertionPoint));
        }

        let Some(index) = self.cursor.advance(self.pool.size()) else {
            return Ok(Rendered::Skipped(SkipReason::EmptyPool));
        };

        let fragment = render_fragment(self.pool.at(index), &self.settings.background);
        let Some(payload) = splice(&text, target, &fragment, self.settings.keep) else {
            return Ok(Rendered::Skipped(SkipReason::NoInsertionPoint));
        };

        write_atomic(artifact, payload.as_bytes())
            .map_err(|e| Error::CacheWrite(format!("{}: {e}", artifact.display())))?;

        Ok(Rendered::Written(index))
    }
}
