//! File-backed cache of interscribed pages.
//!
//! Each cache artifact is the source page with its first insertion target
//! replaced by one rendered fragment. Artifacts are keyed by resource path
//! and expire by modification time:
//!
//! - absent: render and write (created)
//! - stale: render and overwrite (recreated)
//! - fresh: serve as is (used)

pub mod freshness;
pub mod materializer;
pub mod outcome;
pub mod splice;
mod write;

pub use freshness::ArtifactState;
pub use materializer::{CacheMaterializer, MaterializerSettings};
pub use outcome::{CacheResult, SkipReason};
pub use splice::{KeepPolicy, splice};
pub use write::write_atomic;
