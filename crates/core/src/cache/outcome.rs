//! Per-request cache decisions reported to the host.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Why a request falls back to the original resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The source page has no insertion target.
    NoInsertionPoint,
    /// No document is eligible for rotation.
    EmptyPool,
    /// The cache directory failed its startup checks.
    CacheDisabled,
    /// The public resource does not exist; the host's not-found handling applies.
    SourceMissing,
    /// A `.blue` resource has no rendered HTML counterpart yet.
    DynamicMissing,
}

/// Outcome of one materialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CacheResult {
    /// A fresh artifact was served unchanged.
    Used,
    /// No artifact existed; one was written using pool entry `index`.
    Created { index: usize },
    /// The artifact had expired and was rewritten using pool entry `index`.
    Recreated { index: usize },
    /// Serve the original resource.
    NotApplicable { reason: SkipReason },
    /// Rendering failed; serve the original resource.
    Failed { reason: String },
}

impl CacheResult {
    /// Whether the host should serve from the cache.
    pub fn is_served(&self) -> bool {
        matches!(self, CacheResult::Used | CacheResult::Created { .. } | CacheResult::Recreated { .. })
    }

    /// Informational response header for a served artifact.
    pub fn header(&self) -> Option<&'static str> {
        match self {
            CacheResult::Used => Some("rw-interscribe-cache-used"),
            CacheResult::Created { .. } => Some("rw-interscribe-cache-created"),
            CacheResult::Recreated { .. } => Some("rw-interscribe-cache-recreated"),
            CacheResult::NotApplicable { .. } | CacheResult::Failed { .. } => None,
        }
    }
}
