//! Plugin lifecycle: startup, per-request processing, shutdown.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::cache::{CacheMaterializer, CacheResult, MaterializerSettings, SkipReason};
use crate::config::InterscribeConfig;
use crate::filter::{AcceptanceRule, RotationPool, load_pool};
use crate::render::render_fragment;
use crate::request::ResourceLocations;
use crate::rotation::{RestartFile, RotationCursor};

/// Where the host serves a cache artifact from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ServeLocation {
    /// The cache directory.
    pub cache_root: PathBuf,
    /// The artifact's path below `cache_root`.
    pub proxy_path: String,
}

/// Decision for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProcessOutcome {
    pub resource_path: String,
    pub result: CacheResult,
    /// Set only when the host should serve from the cache.
    pub location: Option<ServeLocation>,
}

/// Rotation and cache state at a glance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Status {
    pub hostname: String,
    pub pool_size: usize,
    pub total_references: usize,
    pub discarded_references: usize,
    /// Index last handed out, if any.
    pub cursor: Option<usize>,
    pub cache_enabled: bool,
}

/// One serving host's rotation pool, cursor and cache.
#[derive(Debug)]
pub struct Interscriber {
    config: InterscribeConfig,
    settings: MaterializerSettings,
    pool: RotationPool,
    cursor: RotationCursor,
    restart: RestartFile,
    cache_enabled: bool,
}

impl Interscriber {
    /// Check paths, load the filter file and restore the cursor.
    ///
    /// Never fails: every problem is logged and degrades to an empty pool, an
    /// unset cursor or a disabled cache.
    pub fn startup(config: InterscribeConfig) -> Self {
        tracing::info!(hostname = %config.hostname, "interscribe version {}", env!("CARGO_PKG_VERSION"));

        let cache_enabled = config.verify_paths();
        let pool = load_pool(&config.snrfilter_file, &AcceptanceRule::from_config(&config));
        let cursor = RotationCursor::new();
        RestartFile::new(config.restart_path()).restore_into(&cursor);

        Self::from_parts(config, pool, cursor, cache_enabled)
    }

    /// Assemble from an already built pool and cursor.
    pub fn from_parts(
        config: InterscribeConfig, pool: RotationPool, cursor: RotationCursor, cache_enabled: bool,
    ) -> Self {
        Self {
            settings: MaterializerSettings::from(&config),
            restart: RestartFile::new(config.restart_path()),
            config,
            pool,
            cursor,
            cache_enabled,
        }
    }

    /// Decide how to serve `resource_path`, materializing its artifact if needed.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` only for malformed resource paths; every
    /// other failure is reported in the outcome.
    pub fn process(&self, resource_path: &str) -> Result<ProcessOutcome, Error> {
        self.process_at(resource_path, Utc::now())
    }

    /// Like `process`, judging artifact freshness at `now`.
    pub fn process_at(&self, resource_path: &str, now: DateTime<Utc>) -> Result<ProcessOutcome, Error> {
        let locations = ResourceLocations::resolve(&self.config, resource_path)?;
        let result = self.decide(&locations, now);

        let location = result.is_served().then(|| ServeLocation {
            cache_root: self.config.interscribe_cache.clone(),
            proxy_path: locations.proxy_path.clone(),
        });

        Ok(ProcessOutcome { resource_path: resource_path.to_string(), result, location })
    }

    fn decide(&self, locations: &ResourceLocations, now: DateTime<Utc>) -> CacheResult {
        if !self.cache_enabled {
            return CacheResult::NotApplicable { reason: SkipReason::CacheDisabled };
        }
        if !locations.public.exists() {
            return CacheResult::NotApplicable { reason: SkipReason::SourceMissing };
        }
        if locations.is_blue() && !locations.dynamic.exists() {
            return CacheResult::NotApplicable { reason: SkipReason::DynamicMissing };
        }

        CacheMaterializer::new(&self.settings, &self.pool, &self.cursor).materialize_at(
            locations.source(),
            &locations.artifact,
            now,
        )
    }

    /// Render the fragment for pool entry `index` without touching the cursor.
    pub fn preview(&self, index: usize) -> Option<String> {
        self.pool.get(index).map(|doc| render_fragment(doc, &self.settings.background))
    }

    /// Write the cursor to the restart file now.
    ///
    /// # Errors
    ///
    /// Returns `Error::RestartIo` if the restart file cannot be written.
    pub fn persist(&self) -> Result<(), Error> {
        self.restart.save(&self.cursor)
    }

    /// Persist the cursor before exit. Failures are logged.
    pub fn shutdown(&self) {
        tracing::debug!(hostname = %self.config.hostname, "shutting down");
        if let Err(e) = self.persist() {
            tracing::warn!(error = %e, "rotation index not saved");
        }
    }

    pub fn status(&self) -> Status {
        Status {
            hostname: self.config.hostname.clone(),
            pool_size: self.pool.size(),
            total_references: self.pool.total(),
            discarded_references: self.pool.discarded(),
            cursor: self.cursor.position(),
            cache_enabled: self.cache_enabled,
        }
    }

    pub fn config(&self) -> &InterscribeConfig {
        &self.config
    }

    pub fn pool(&self) -> &RotationPool {
        &self.pool
    }

    pub fn cursor(&self) -> &RotationCursor {
        &self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const FILTER: &str = "\
!url https://one.org/a
!host https://one.org
!rwt:title First
!snr:grade A
!bestwords alpha,beta,gamma,delta,epsilon,zeta,eta

!url https://example.com/self
!host https://example.com
!snr:grade A

!url https://two.org/b
!host https://two.org
!snrScore 5
!rwt:title Second
";

    const PAGE: &str = "<html><body><div id=interscribe-target></div></body></html>";

    struct Site {
        dir: TempDir,
        config: InterscribeConfig,
    }

    impl Site {
        fn root(&self) -> &Path {
            self.dir.path()
        }

        fn write(&self, rel: &str, contents: &str) {
            let path = self.root().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
    }

    fn site(ttl: Option<i64>) -> Site {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for sub in ["public", "dynamic-cache", "interscribe-cache", "etc"] {
            fs::create_dir_all(root.join(sub)).unwrap();
        }
        fs::write(root.join("etc/snrfilter"), FILTER).unwrap();

        let config = InterscribeConfig {
            hostname: "example.com".into(),
            document_root: root.join("public"),
            dynamic_cache: root.join("dynamic-cache"),
            interscribe_cache: root.join("interscribe-cache"),
            snrfilter_file: root.join("etc/snrfilter"),
            cache_duration: ttl,
            ..Default::default()
        };
        Site { dir, config }
    }

    #[test]
    fn test_startup_loads_pool_and_restores_cursor() {
        let site = site(Some(60));
        site.write("etc/snrfilter-index", "1");

        let interscriber = Interscriber::startup(site.config.clone());
        let status = interscriber.status();
        assert_eq!(status.pool_size, 2);
        assert_eq!(status.total_references, 3);
        assert_eq!(status.discarded_references, 1);
        assert_eq!(status.cursor, Some(1));
        assert!(status.cache_enabled);
    }

    #[test]
    fn test_process_html_created_then_used() {
        let site = site(Some(60));
        site.write("public/index.html", PAGE);
        let interscriber = Interscriber::startup(site.config.clone());

        let outcome = interscriber.process("/index.html").unwrap();
        assert_eq!(outcome.result, CacheResult::Created { index: 0 });
        let location = outcome.location.unwrap();
        assert_eq!(location.proxy_path, "/index.html");
        assert_eq!(location.cache_root, site.config.interscribe_cache);

        let artifact = site.root().join("interscribe-cache/index.html");
        assert!(fs::read_to_string(&artifact).unwrap().contains("First"));

        let outcome = interscriber.process("/index.html").unwrap();
        assert_eq!(outcome.result, CacheResult::Used);
        assert_eq!(interscriber.cursor().position(), Some(0));
    }

    #[test]
    fn test_process_stale_rotates() {
        let site = site(Some(60));
        site.write("public/index.html", PAGE);
        let interscriber = Interscriber::startup(site.config.clone());

        interscriber.process("/index.html").unwrap();
        let later = Utc::now() + TimeDelta::seconds(120);
        let outcome = interscriber.process_at("/index.html", later).unwrap();
        assert_eq!(outcome.result, CacheResult::Recreated { index: 1 });

        let artifact = site.root().join("interscribe-cache/index.html");
        assert!(fs::read_to_string(&artifact).unwrap().contains("Second"));
    }

    #[test]
    fn test_process_blue_uses_dynamic_counterpart() {
        let site = site(Some(60));
        site.write("public/docs/page.blue", "!blue source");

        let interscriber = Interscriber::startup(site.config.clone());
        let outcome = interscriber.process("/docs/page.blue").unwrap();
        assert_eq!(outcome.result, CacheResult::NotApplicable { reason: SkipReason::DynamicMissing });
        assert!(outcome.location.is_none());

        site.write("dynamic-cache/docs/page.html", PAGE);
        let outcome = interscriber.process("/docs/page.blue").unwrap();
        assert_eq!(outcome.result, CacheResult::Created { index: 0 });
        assert_eq!(outcome.location.unwrap().proxy_path, "/docs/page.html");
        assert!(site.root().join("interscribe-cache/docs/page.html").exists());
    }

    #[test]
    fn test_process_missing_public_file() {
        let site = site(Some(60));
        let interscriber = Interscriber::startup(site.config.clone());

        let outcome = interscriber.process("/missing.html").unwrap();
        assert_eq!(outcome.result, CacheResult::NotApplicable { reason: SkipReason::SourceMissing });
        assert_eq!(interscriber.cursor().position(), None);
    }

    #[test]
    fn test_process_with_disabled_cache() {
        let mut site = site(Some(60));
        site.write("public/index.html", PAGE);
        site.config.interscribe_cache = site.root().join("does-not-exist");

        let interscriber = Interscriber::startup(site.config.clone());
        let outcome = interscriber.process("/index.html").unwrap();
        assert_eq!(outcome.result, CacheResult::NotApplicable { reason: SkipReason::CacheDisabled });
    }

    #[test]
    fn test_process_with_missing_filter_file() {
        let mut site = site(Some(60));
        site.write("public/index.html", PAGE);
        site.config.snrfilter_file = site.root().join("etc/absent");

        let interscriber = Interscriber::startup(site.config.clone());
        let outcome = interscriber.process("/index.html").unwrap();
        assert_eq!(outcome.result, CacheResult::NotApplicable { reason: SkipReason::EmptyPool });
        assert!(!site.root().join("interscribe-cache/index.html").exists());
    }

    #[test]
    fn test_process_rejects_traversal() {
        let site = site(Some(60));
        let interscriber = Interscriber::startup(site.config.clone());
        assert!(matches!(interscriber.process("/../secret.html"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_shutdown_persists_cursor_for_next_run() {
        let site = site(Some(0));
        site.write("public/index.html", PAGE);

        let first = Interscriber::startup(site.config.clone());
        first.process("/index.html").unwrap();
        first.process("/index.html").unwrap();
        first.shutdown();
        assert_eq!(fs::read_to_string(site.root().join("etc/snrfilter-index")).unwrap(), "1");

        let second = Interscriber::startup(site.config.clone());
        let outcome = second.process("/index.html").unwrap();
        assert_eq!(outcome.result, CacheResult::Recreated { index: 0 });
    }

    #[test]
    fn test_preview_does_not_advance() {
        let site = site(Some(60));
        let interscriber = Interscriber::startup(site.config.clone());

        let html = interscriber.preview(1).unwrap();
        assert!(html.contains("Second"));
        assert!(interscriber.preview(2).is_none());
        assert_eq!(interscriber.cursor().position(), None);
    }
}
