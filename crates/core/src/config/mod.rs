//! Plugin configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (INTERSCRIBE_*)
//! 2. TOML config file (if INTERSCRIBE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::cache::KeepPolicy;

mod validation;

pub use validation::ConfigError;

/// File name of the persisted rotation index when none is configured.
pub const DEFAULT_RESTART_FILE_NAME: &str = "snrfilter-index";

/// Plugin configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (INTERSCRIBE_*)
/// 2. TOML config file (if INTERSCRIBE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterscribeConfig {
    /// Host name this server answers for. Filter entries pointing back at it
    /// are never rotated.
    ///
    /// Set via INTERSCRIBE_HOSTNAME environment variable.
    #[serde(default = "default_hostname")]
    pub hostname: String,

    /// Root of the public (original) resources.
    #[serde(default = "default_document_root")]
    pub document_root: PathBuf,

    /// Root of the pre-rendered HTML counterparts of `.blue` resources.
    #[serde(default = "default_dynamic_cache")]
    pub dynamic_cache: PathBuf,

    /// Directory holding the materialized cache artifacts.
    #[serde(default = "default_interscribe_cache")]
    pub interscribe_cache: PathBuf,

    /// Lifetime of a cache artifact in seconds.
    ///
    /// Missing, zero or negative values mean every request re-renders.
    #[serde(default)]
    pub cache_duration: Option<i64>,

    /// Filter file listing the rotation candidates.
    #[serde(default = "default_snrfilter_file")]
    pub snrfilter_file: PathBuf,

    /// File holding the persisted rotation index.
    ///
    /// Defaults to `snrfilter-index` next to the filter file.
    #[serde(default)]
    pub snrfilter_restart: Option<PathBuf>,

    /// Grades accepted from `!snr:grade`.
    ///
    /// Set via INTERSCRIBE_SNR_GRADES environment variable (comma-separated).
    #[serde(default = "default_snr_grades", deserialize_with = "deserialize_grades")]
    pub snr_grades: Vec<String>,

    /// Lowest score accepted from `!snrScore`.
    #[serde(default)]
    pub snr_min_score: i64,

    /// Literal text marking where the fragment is spliced in.
    #[serde(default = "default_insertion_target")]
    pub insertion_target: String,

    /// What happens to the insertion target text around the fragment.
    #[serde(default)]
    pub keep_target: KeepPolicy,

    /// Background color handed to the rendered fragment.
    #[serde(default = "default_background")]
    pub background: String,
}

fn default_hostname() -> String {
    "localhost".into()
}

fn default_document_root() -> PathBuf {
    PathBuf::from("./public")
}

fn default_dynamic_cache() -> PathBuf {
    PathBuf::from("./dynamic-cache")
}

fn default_interscribe_cache() -> PathBuf {
    PathBuf::from("./interscribe-cache")
}

fn default_snrfilter_file() -> PathBuf {
    PathBuf::from("./etc/snrfilter")
}

fn default_snr_grades() -> Vec<String> {
    ["A", "B", "C", "D"].into_iter().map(String::from).collect()
}

fn default_insertion_target() -> String {
    "<div id=interscribe-target>".into()
}

fn default_background() -> String {
    "#777".into()
}

/// Grades arrive either as a TOML array or as a comma-separated string.
fn deserialize_grades<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum GradeList {
        List(Vec<String>),
        Csv(String),
    }

    let grades = match GradeList::deserialize(deserializer)? {
        GradeList::List(list) => list,
        GradeList::Csv(csv) => csv.split(',').map(String::from).collect(),
    };

    Ok(grades
        .into_iter()
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect())
}

impl Default for InterscribeConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            document_root: default_document_root(),
            dynamic_cache: default_dynamic_cache(),
            interscribe_cache: default_interscribe_cache(),
            cache_duration: None,
            snrfilter_file: default_snrfilter_file(),
            snrfilter_restart: None,
            snr_grades: default_snr_grades(),
            snr_min_score: 0,
            insertion_target: default_insertion_target(),
            keep_target: KeepPolicy::default(),
            background: default_background(),
        }
    }
}

impl InterscribeConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `INTERSCRIBE_`
    /// 2. TOML file from `INTERSCRIBE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var_os("INTERSCRIBE_CONFIG_FILE").map(PathBuf::from);
        Self::load_from(config_path.as_deref())
    }

    /// Like [`load`](Self::load), reading the TOML layer from `config_path`
    /// instead of `INTERSCRIBE_CONFIG_FILE`.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_path) = config_path {
            figment = figment.merge(Toml::file(config_path));
        }

        figment = figment.merge(
            Env::prefixed("INTERSCRIBE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Path of the persisted rotation index.
    pub fn restart_path(&self) -> PathBuf {
        match &self.snrfilter_restart {
            Some(path) => path.clone(),
            None => self.snrfilter_file.with_file_name(DEFAULT_RESTART_FILE_NAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InterscribeConfig::default();
        assert_eq!(config.hostname, "localhost");
        assert_eq!(config.interscribe_cache, PathBuf::from("./interscribe-cache"));
        assert_eq!(config.cache_duration, None);
        assert_eq!(config.snr_grades, vec!["A", "B", "C", "D"]);
        assert_eq!(config.snr_min_score, 0);
        assert_eq!(config.insertion_target, "<div id=interscribe-target>");
        assert_eq!(config.keep_target, KeepPolicy::Before);
        assert_eq!(config.background, "#777");
        assert!(config.snrfilter_restart.is_none());
    }

    #[test]
    fn test_restart_path_defaults_next_to_filter() {
        let config = InterscribeConfig { snrfilter_file: PathBuf::from("/srv/data/snrfilter"), ..Default::default() };
        assert_eq!(config.restart_path(), PathBuf::from("/srv/data/snrfilter-index"));
    }

    #[test]
    fn test_restart_path_explicit() {
        let config =
            InterscribeConfig { snrfilter_restart: Some(PathBuf::from("/var/lib/restart")), ..Default::default() };
        assert_eq!(config.restart_path(), PathBuf::from("/var/lib/restart"));
    }

    #[test]
    fn test_grades_from_csv() {
        let config: InterscribeConfig =
            Figment::from(Serialized::defaults(InterscribeConfig::default()))
                .merge(Toml::string(r#"snr_grades = "A, B,,C""#))
                .extract()
                .unwrap();
        assert_eq!(config.snr_grades, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_grades_from_array_and_keep_policy() {
        let config: InterscribeConfig =
            Figment::from(Serialized::defaults(InterscribeConfig::default()))
                .merge(Toml::string(
                    r#"
                    snr_grades = ["A"]
                    keep_target = "discard"
                    cache_duration = 60
                    "#,
                ))
                .extract()
                .unwrap();
        assert_eq!(config.snr_grades, vec!["A"]);
        assert_eq!(config.keep_target, KeepPolicy::Discard);
        assert_eq!(config.cache_duration, Some(60));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interscribe.toml");
        std::fs::write(
            &path,
            r#"
            hostname = "example.com"
            snrfilter_file = "/srv/example.com/etc/snrfilter"
            snr_min_score = 3
            "#,
        )
        .unwrap();

        let config = InterscribeConfig::load_from(Some(&path)).unwrap();
        assert_eq!(config.hostname, "example.com");
        assert_eq!(config.snr_min_score, 3);
        assert_eq!(config.cache_duration, None);
        assert_eq!(config.restart_path(), PathBuf::from("/srv/example.com/etc/snrfilter-index"));
    }
}
