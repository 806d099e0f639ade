//! Configuration validation rules.
//!
//! This module provides validation logic for `InterscribeConfig` values
//! after they have been loaded from environment, files, or defaults, plus the
//! startup checks on the cache and restart paths. Path problems never stop the
//! server; they are logged and the cache is reported as disabled.

use std::fs;
use std::path::Path;

use crate::config::InterscribeConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl InterscribeConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `hostname` is empty, and
    /// `ConfigError::Invalid` if:
    /// - `insertion_target` is empty
    /// - `snr_grades` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hostname.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "hostname".into(),
                hint: "Set INTERSCRIBE_HOSTNAME environment variable".into(),
            });
        }

        if self.insertion_target.is_empty() {
            return Err(ConfigError::Invalid {
                field: "insertion_target".into(),
                reason: "must not be empty".into(),
            });
        }

        if self.snr_grades.is_empty() {
            return Err(ConfigError::Invalid { field: "snr_grades".into(), reason: "must list at least one grade".into() });
        }

        if self.cache_duration.is_none_or(|secs| secs <= 0) {
            tracing::warn!(
                cache_duration = ?self.cache_duration,
                "cache_duration is not positive; every request will re-render"
            );
        }

        Ok(())
    }

    /// Check the cache directory and restart file at startup.
    ///
    /// Returns `true` when the cache directory is usable. Every problem is
    /// logged; none of them is fatal.
    pub fn verify_paths(&self) -> bool {
        let cache_ok = verify_cache_dir(&self.interscribe_cache);
        verify_restart_file(&self.restart_path());
        cache_ok
    }
}

fn verify_cache_dir(dir: &Path) -> bool {
    if dir.as_os_str().is_empty() {
        tracing::warn!("missing 'interscribe_cache' definition");
        return false;
    }

    match fs::metadata(dir) {
        Err(e) => {
            tracing::warn!(path = %dir.display(), error = %e, "'interscribe_cache' does not exist");
            false
        }
        Ok(meta) if !meta.is_dir() => {
            tracing::warn!(path = %dir.display(), "'interscribe_cache' is not a directory");
            false
        }
        Ok(meta) if meta.permissions().readonly() => {
            tracing::warn!(path = %dir.display(), "'interscribe_cache' write permission denied");
            false
        }
        Ok(_) => true,
    }
}

fn verify_restart_file(path: &Path) {
    match fs::metadata(path) {
        Err(_) => {
            tracing::info!(path = %path.display(), "'snrfilter_restart' does not exist yet; rotation starts from the top");
        }
        Ok(meta) if meta.permissions().readonly() => {
            tracing::warn!(path = %path.display(), "'snrfilter_restart' write permission denied; rotation position will not survive restarts");
        }
        Ok(_) => {}
    }
}
