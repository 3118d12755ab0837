//! Client configuration: base URL, timeout, user agent.
//!
//! Values come from (highest first) explicit overrides, the environment,
//! an optional TOML file, and built-in defaults.

use crate::error::{CatalogError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default catalog API location.
pub const DEFAULT_BASE_URL: &str = "https://example.com/api";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "BOOKSHELF_BASE_URL";

/// Environment variable overriding the timeout, in whole seconds.
pub const TIMEOUT_ENV: &str = "BOOKSHELF_TIMEOUT_SECS";

/// Settings used to build a [`crate::CatalogClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub user_agent: String,
}

/// On-disk shape of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
                .to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults with the environment applied on top.
    pub fn from_env() -> Result<Self> {
        Self::default().merge_env(|key| std::env::var(key).ok())
    }

    /// `<config dir>/bookshelf/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("bookshelf").join("config.toml"))
    }

    /// Defaults with a TOML config file applied on top.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::default().merge_toml(&text)
    }

    /// Config file, then the environment, on top of defaults.
    ///
    /// An explicit `path` must exist. Without one, the file at
    /// [`Self::default_path`] is used if present and skipped otherwise.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::load(p)?,
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::load(&p)?,
                _ => Self::default(),
            },
        };
        config.merge_env(|key| std::env::var(key).ok())
    }

    /// Override the base URL, validating it.
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        self.base_url = parse_base_url(url)?;
        Ok(self)
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn merge_toml(mut self, text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text)
            .map_err(|e| CatalogError::Config(format!("invalid config file: {}", e)))?;
        if let Some(url) = file.base_url {
            self.base_url = parse_base_url(&url)?;
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout = timeout_from_secs(secs, "timeout_secs")?;
        }
        Ok(self)
    }

    fn merge_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.is_empty()) {
            self.base_url = parse_base_url(&url)?;
        }
        if let Some(secs) = lookup(TIMEOUT_ENV).filter(|v| !v.is_empty()) {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                CatalogError::Config(format!("{} must be a whole number of seconds", TIMEOUT_ENV))
            })?;
            self.timeout = timeout_from_secs(secs, TIMEOUT_ENV)?;
        }
        Ok(self)
    }
}

/// A zero timeout would fail every request immediately.
fn timeout_from_secs(secs: u64, source: &str) -> Result<Duration> {
    if secs == 0 {
        return Err(CatalogError::Config(format!(
            "{} must be at least 1 second",
            source
        )));
    }
    Ok(Duration::from_secs(secs))
}

/// Parse and validate a base URL: absolute http(s), able to take path segments.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| CatalogError::Config(format!("invalid base URL {:?}: {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CatalogError::Config(format!(
            "base URL must be http or https, got {:?}",
            url.scheme()
        )));
    }
    if url.cannot_be_a_base() {
        return Err(CatalogError::Config(format!(
            "base URL cannot carry a path: {}",
            raw
        )));
    }
    Ok(url)
}
