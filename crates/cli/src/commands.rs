//! Subcommand handlers. Each returns the text printed on stdout.

use std::fmt::Write as _;

use anyhow::{Context, Result, bail};
use interscribe_core::filter::read_pool;
use interscribe_core::{AcceptanceRule, InterscribeConfig, Interscriber};

pub fn pool(config: &InterscribeConfig, json: bool) -> Result<String> {
    let pool = read_pool(&config.snrfilter_file, &AcceptanceRule::from_config(config))
        .with_context(|| format!("reading {}", config.snrfilter_file.display()))?;

    if json {
        let entries: Vec<_> = pool.iter().collect();
        return Ok(serde_json::to_string_pretty(&entries)?);
    }

    let mut out = String::new();
    for (index, doc) in pool.iter().enumerate() {
        writeln!(out, "{index:>4}  {}  {}", doc.url, doc.attribution_title)?;
    }
    write!(out, "{} kept, {} discarded, {} total", pool.kept(), pool.discarded(), pool.total())?;
    Ok(out)
}

pub fn preview(config: InterscribeConfig, index: usize) -> Result<String> {
    let interscriber = Interscriber::startup(config);
    match interscriber.preview(index) {
        Some(fragment) => Ok(fragment),
        None => bail!("index {index} is outside the pool (size {})", interscriber.pool().size()),
    }
}

pub fn resolve(config: InterscribeConfig, path: &str) -> Result<String> {
    let interscriber = Interscriber::startup(config);
    let outcome = interscriber.process(path)?;
    interscriber.shutdown();
    Ok(serde_json::to_string_pretty(&outcome)?)
}

pub fn status(config: InterscribeConfig) -> Result<String> {
    let interscriber = Interscriber::startup(config);
    Ok(serde_json::to_string_pretty(&interscriber.status())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const FILTER: &str = "\
!url https://one.org/a
!host https://one.org
!rwt:title First
!snr:grade A

!url https://two.org/b
!host https://two.org
!snr:grade F
";

    fn site() -> (TempDir, InterscribeConfig) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for sub in ["public", "interscribe-cache", "etc"] {
            fs::create_dir_all(root.join(sub)).unwrap();
        }
        fs::write(root.join("etc/snrfilter"), FILTER).unwrap();
        fs::write(root.join("public/index.html"), "<p><div id=interscribe-target></div></p>").unwrap();

        let config = InterscribeConfig {
            hostname: "example.com".into(),
            document_root: root.join("public"),
            dynamic_cache: root.join("dynamic-cache"),
            interscribe_cache: root.join("interscribe-cache"),
            snrfilter_file: root.join("etc/snrfilter"),
            ..Default::default()
        };
        (dir, config)
    }

    #[test]
    fn test_pool_listing() {
        let (_dir, config) = site();
        let out = pool(&config, false).unwrap();
        assert!(out.contains("https://one.org/a  First"));
        assert!(!out.contains("two.org"));
        assert!(out.ends_with("1 kept, 1 discarded, 2 total"));
    }

    #[test]
    fn test_pool_missing_filter() {
        let (dir, mut config) = site();
        config.snrfilter_file = dir.path().join("absent");
        assert!(pool(&config, true).is_err());
    }

    #[test]
    fn test_preview_out_of_range() {
        let (_dir, config) = site();
        assert!(preview(config.clone(), 0).unwrap().contains("First"));
        assert!(preview(config, 1).is_err());
    }

    #[test]
    fn test_resolve_persists_cursor() {
        let (dir, config) = site();
        let out = resolve(config, "/index.html").unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["result"]["status"], "created");
        assert_eq!(fs::read_to_string(dir.path().join("etc/snrfilter-index")).unwrap(), "0");
    }
}
