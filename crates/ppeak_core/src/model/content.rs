//! Content cache domain model.
//!
//! # Responsibility
//! - Derive the normalized cache key shared by the memory and durable tiers.
//! - Define the diagnostic record appended for failed loads.
//!
//! # Invariants
//! - `CacheKey::from_path` is a pure function of its input.
//! - Distinct paths may normalize to the same key (`/a-b.json` and
//!   `/a_b.json`); callers detect this through the cache diagnostics.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

static NON_ALNUM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").expect("valid cache key regex"));

/// Separator substituted for every non-alphanumeric character.
pub const CACHE_KEY_SEPARATOR: &str = "-";

/// Normalized key indexing both cache tiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn from_path(path: &str) -> Self {
        Self(
            NON_ALNUM_RE
                .replace_all(path, CACHE_KEY_SEPARATOR)
                .into_owned(),
        )
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Durable-tier storage key: `<namespace>-cache-<key>`.
    pub fn durable_key(&self, namespace: &str) -> String {
        format!("{namespace}-cache-{}", self.0)
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Diagnostic entry describing one failed content load attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentError {
    /// Logical path exactly as passed to the loader.
    pub file: String,
    pub message: String,
    /// Unix epoch milliseconds at the time of failure.
    pub timestamp_ms: i64,
}

impl ContentError {
    pub fn new(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            message: message.into(),
            timestamp_ms: now_epoch_ms(),
        }
    }
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{CacheKey, ContentError};

    #[test]
    fn key_replaces_each_non_alphanumeric_char() {
        let key = CacheKey::from_path("/content/works.json");
        assert_eq!(key.as_str(), "-content-works-json");
        assert_eq!(CacheKey::from_path("AbC123").as_str(), "AbC123");
        assert_eq!(CacheKey::from_path("a  b").as_str(), "a--b");
    }

    #[test]
    fn key_is_pure_function_of_path() {
        let path = "/data/news/2024 spring.json";
        assert_eq!(CacheKey::from_path(path), CacheKey::from_path(path));
    }

    #[test]
    fn distinct_paths_can_collide() {
        assert_eq!(
            CacheKey::from_path("/a-b.json"),
            CacheKey::from_path("/a_b.json")
        );
    }

    #[test]
    fn durable_key_carries_namespace_prefix() {
        let key = CacheKey::from_path("/content/about.json");
        assert_eq!(key.durable_key("ppeak"), "ppeak-cache--content-about-json");
    }

    #[test]
    fn content_error_is_timestamped() {
        let error = ContentError::new("/x.json", "HTTP 404");
        assert_eq!(error.file, "/x.json");
        assert_eq!(error.message, "HTTP 404");
        assert!(error.timestamp_ms > 0);
    }
}
