//! Site configuration loading and normalization.
//!
//! # Responsibility
//! - Describe where content lives, how it is served and where the durable
//!   tier is stored.
//! - Load configuration from JSON and apply `PPEAK_*` environment overrides.
//!
//! # Invariants
//! - A validated `base_path` always starts and ends with `/`.
//! - `namespace` is non-empty and limited to `[a-z0-9_-]`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_NAMESPACE: &str = "ppeak";
const DEFAULT_CONTENT_ROOT: &str = "public";
const DEFAULT_DB_PATH: &str = "ppeak.sqlite3";

pub const ENV_NAMESPACE: &str = "PPEAK_NAMESPACE";
pub const ENV_BASE_PATH: &str = "PPEAK_BASE_PATH";
pub const ENV_CONTENT_ROOT: &str = "PPEAK_CONTENT_ROOT";
pub const ENV_DB_PATH: &str = "PPEAK_DB_PATH";

static NAMESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_-]+$").expect("valid namespace regex"));

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    InvalidNamespace(String),
    InvalidBasePath(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::InvalidNamespace(value) => {
                write!(f, "namespace `{value}` must match [a-z0-9_-]+")
            }
            Self::InvalidBasePath(value) => {
                write!(f, "base_path `{value}` must not contain `..`, `?` or `#`")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidNamespace(_) | Self::InvalidBasePath(_) => None,
        }
    }
}

/// Deployment configuration for one site instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Durable key prefix (`<namespace>-cache-*`, `<namespace>-world`).
    pub namespace: String,
    /// Deployment sub-path prepended to root-relative content paths.
    pub base_path: String,
    /// Directory served as static assets.
    pub content_root: PathBuf,
    /// SQLite file backing the durable tier.
    pub db_path: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            base_path: "/".to_string(),
            content_root: PathBuf::from(DEFAULT_CONTENT_ROOT),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

impl SiteConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(ConfigError::Parse)?;
        config.validated()
    }

    /// Reads a JSON config file, applies environment overrides and validates.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(ConfigError::Parse)?;
        config.with_overrides(|name| std::env::var(name).ok()).validated()
    }

    /// Default config with process environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default()
            .with_overrides(|name| std::env::var(name).ok())
            .validated()
    }

    /// Applies overrides looked up through `lookup` (normally `std::env::var`).
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = lookup(ENV_NAMESPACE) {
            self.namespace = value;
        }
        if let Some(value) = lookup(ENV_BASE_PATH) {
            self.base_path = value;
        }
        if let Some(value) = lookup(ENV_CONTENT_ROOT) {
            self.content_root = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_DB_PATH) {
            self.db_path = PathBuf::from(value);
        }
        self
    }

    /// Checks invariants and normalizes `base_path`.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.namespace = self.namespace.trim().to_string();
        if !NAMESPACE_RE.is_match(&self.namespace) {
            return Err(ConfigError::InvalidNamespace(self.namespace));
        }
        self.base_path = normalize_base_path(&self.base_path)?;
        Ok(self)
    }
}

fn normalize_base_path(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.contains("..") || trimmed.contains(['?', '#']) {
        return Err(ConfigError::InvalidBasePath(value.to_string()));
    }

    let inner = trimmed.trim_matches('/');
    if inner.is_empty() {
        return Ok("/".to_string());
    }
    Ok(format!("/{inner}/"))
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, SiteConfig, ENV_BASE_PATH, ENV_NAMESPACE};
    use std::path::PathBuf;

    #[test]
    fn empty_document_yields_defaults() {
        let config = SiteConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.base_path, "/");
    }

    #[test]
    fn base_path_is_normalized() {
        let config = SiteConfig::from_json_str(r#"{"base_path":"portfolio"}"#).unwrap();
        assert_eq!(config.base_path, "/portfolio/");

        let config = SiteConfig::from_json_str(r#"{"base_path":"/a/b//"}"#).unwrap();
        assert_eq!(config.base_path, "/a/b/");
    }

    #[test]
    fn rejects_unknown_fields_and_bad_values() {
        assert!(matches!(
            SiteConfig::from_json_str(r#"{"cache_ttl":5}"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SiteConfig::from_json_str(r#"{"namespace":"Has Space"}"#),
            Err(ConfigError::InvalidNamespace(_))
        ));
        assert!(matches!(
            SiteConfig::from_json_str(r#"{"base_path":"/../x"}"#),
            Err(ConfigError::InvalidBasePath(_))
        ));
    }

    #[test]
    fn overrides_replace_file_values() {
        let config = SiteConfig::default()
            .with_overrides(|name| match name {
                n if n == ENV_NAMESPACE => Some("staging".to_string()),
                n if n == ENV_BASE_PATH => Some("/preview".to_string()),
                _ => None,
            })
            .validated()
            .unwrap();

        assert_eq!(config.namespace, "staging");
        assert_eq!(config.base_path, "/preview/");
        assert_eq!(config.content_root, PathBuf::from("public"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.json");
        std::fs::write(&path, r#"{"content_root":"dist","db_path":"cache/site.db"}"#).unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.content_root, PathBuf::from("dist"));
        assert_eq!(config.db_path, PathBuf::from("cache/site.db"));
    }
}
