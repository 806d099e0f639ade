//! File locations derived from a request's resource path.

use std::path::{Component, Path, PathBuf};

use crate::Error;
use crate::config::InterscribeConfig;

/// Extension of resources whose HTML lives in the dynamic cache.
pub const BLUE_EXTENSION: &str = "blue";

/// Where a resource's files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocations {
    /// `document_root/path/to/page.blue`
    pub public: PathBuf,
    /// `dynamic_cache/path/to/page.html`
    pub dynamic: PathBuf,
    /// `interscribe_cache/path/to/page.html`
    pub artifact: PathBuf,
    /// `/path/to/page.html`, relative to the cache root
    pub proxy_path: String,
    is_blue: bool,
}

impl ResourceLocations {
    /// Resolve `resource_path` (e.g. `/path/to/page.blue`) against the
    /// configured roots.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the path is empty or has `..`
    /// components.
    pub fn resolve(config: &InterscribeConfig, resource_path: &str) -> Result<Self, Error> {
        let relative = relative_path(resource_path)?;
        let is_blue = relative.extension().is_some_and(|ext| ext == BLUE_EXTENSION);
        let as_html = relative.with_extension("html");

        let proxy_path = format!("/{}", as_html.to_string_lossy().replace('\\', "/"));

        Ok(Self {
            public: config.document_root.join(&relative),
            dynamic: config.dynamic_cache.join(&as_html),
            artifact: config.interscribe_cache.join(&as_html),
            proxy_path,
            is_blue,
        })
    }

    pub fn is_blue(&self) -> bool {
        self.is_blue
    }

    /// The file the artifact is spliced from.
    pub fn source(&self) -> &Path {
        if self.is_blue { &self.dynamic } else { &self.public }
    }
}

fn relative_path(resource_path: &str) -> Result<PathBuf, Error> {
    let mut relative = PathBuf::new();
    for component in Path::new(resource_path).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) => {
                return Err(Error::InvalidInput(format!("resource path escapes its root: {resource_path}")));
            }
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(Error::InvalidInput("resource path is empty".into()));
    }
    Ok(relative)
}
