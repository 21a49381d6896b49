//! Two-tier content cache use-case service.
//!
//! # Responsibility
//! - Resolve logical content paths to parsed JSON documents.
//! - Keep a process-lifetime memory tier and a best-effort durable tier.
//! - Degrade to the last durable copy when the network path fails.
//!
//! # Invariants
//! - A memory-tier hit never touches the fetcher or the durable store.
//! - `load_content` never returns an error; every failure ends in a value
//!   or `None`.
//! - Every fetch/status/parse failure appends exactly one `ContentError`.
//! - Durable-tier failures never append a `ContentError`; they are counted
//!   in `CacheDiagnostics` and reported to the optional failure hook.
//! - No eviction, TTL or in-flight coalescing.

use crate::config::SiteConfig;
use crate::fetch::{ContentFetcher, FetchError};
use crate::model::content::{CacheKey, ContentError};
use crate::repo::local_store::DurableStore;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why a network load produced no value.
#[derive(Debug)]
pub enum ContentLoadError {
    Transport(FetchError),
    Status(u16),
    Parse(serde_json::Error),
}

impl Display for ContentLoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "{err}"),
            Self::Status(status) => write!(f, "HTTP {status}"),
            Self::Parse(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContentLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Status(_) => None,
            Self::Parse(err) => Some(err),
        }
    }
}

/// Durable-tier operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurableOp {
    Read,
    Write,
}

/// Report passed to the durable failure hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurableFailure {
    pub op: DurableOp,
    pub key: String,
    pub message: String,
}

/// Counters for failures the cache swallows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheDiagnostics {
    pub durable_write_failures: u64,
    pub durable_read_failures: u64,
    /// Memory hits where the stored entry came from a different path that
    /// normalizes to the same key.
    pub key_collisions: u64,
}

/// Cache construction options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentCacheOptions {
    /// Prefix for durable keys: `<namespace>-cache-<key>`.
    pub namespace: String,
    /// Deployment sub-path; always starts and ends with `/`.
    pub base_path: String,
}

impl Default for ContentCacheOptions {
    fn default() -> Self {
        Self {
            namespace: crate::config::DEFAULT_NAMESPACE.to_string(),
            base_path: "/".to_string(),
        }
    }
}

impl From<&SiteConfig> for ContentCacheOptions {
    fn from(config: &SiteConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            base_path: config.base_path.clone(),
        }
    }
}

struct MemoryEntry {
    path: String,
    value: Value,
}

type FailureHook = Box<dyn FnMut(&DurableFailure)>;

/// Memory + durable content cache with network fallback.
pub struct ContentCache<F: ContentFetcher, S: DurableStore> {
    fetcher: F,
    store: S,
    options: ContentCacheOptions,
    memory: HashMap<CacheKey, MemoryEntry>,
    errors: Vec<ContentError>,
    diagnostics: CacheDiagnostics,
    failure_hook: Option<FailureHook>,
}

impl<F: ContentFetcher, S: DurableStore> ContentCache<F, S> {
    pub fn new(fetcher: F, store: S, options: ContentCacheOptions) -> Self {
        Self {
            fetcher,
            store,
            options,
            memory: HashMap::new(),
            errors: Vec::new(),
            diagnostics: CacheDiagnostics::default(),
            failure_hook: None,
        }
    }

    /// Loads one JSON document by logical path.
    ///
    /// Returns `None` only when the network path failed and no durable copy
    /// was recoverable; callers render an empty state in that case.
    pub fn load_content(&mut self, path: &str) -> Option<Value> {
        let key = CacheKey::from_path(path);

        if let Some(value) = self.memory_hit(&key, path) {
            return Some(value);
        }

        match self.fetch_json(path) {
            Ok(value) => {
                info!("event=content_load module=content status=ok source=network key={key}");
                self.write_durable(&key, &value);
                self.remember(key, path, value.clone());
                Some(value)
            }
            Err(err) => {
                warn!(
                    "event=content_load module=content status=error source=network key={} error={}",
                    key, err
                );
                self.errors.push(ContentError::new(path, err.to_string()));

                let recovered = self.read_durable(&key)?;
                info!("event=content_load module=content status=ok source=durable key={key}");
                self.remember(key, path, recovered.clone());
                Some(recovered)
            }
        }
    }

    /// Loads a document and deserializes it into `T`.
    ///
    /// A document whose shape does not match `T` records one `ContentError`
    /// and yields `None`; the raw value stays cached.
    pub fn load_as<T: DeserializeOwned>(&mut self, path: &str) -> Option<T> {
        let value = self.load_content(path)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(err) => {
                warn!("event=content_decode module=content status=error path={path} error={err}");
                self.errors.push(ContentError::new(
                    path,
                    format!("unexpected content shape: {err}"),
                ));
                None
            }
        }
    }

    /// Accumulated load failures, oldest first.
    pub fn errors(&self) -> &[ContentError] {
        &self.errors
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    pub fn diagnostics(&self) -> CacheDiagnostics {
        self.diagnostics
    }

    /// Installs a callback invoked for every swallowed durable-tier failure.
    pub fn set_durable_failure_hook(&mut self, hook: impl FnMut(&DurableFailure) + 'static) {
        self.failure_hook = Some(Box::new(hook));
    }

    /// Whether the memory tier holds an entry for `path`'s key.
    pub fn contains(&self, path: &str) -> bool {
        self.memory.contains_key(&CacheKey::from_path(path))
    }

    /// Memory-tier keys, sorted.
    pub fn cached_keys(&self) -> Vec<&CacheKey> {
        let mut keys: Vec<&CacheKey> = self.memory.keys().collect();
        keys.sort();
        keys
    }

    pub fn options(&self) -> &ContentCacheOptions {
        &self.options
    }

    /// Resolves a logical path against the configured base path.
    ///
    /// Root-relative paths (`/content/a.json`) are re-rooted under the base
    /// path; anything else is passed through unchanged.
    pub fn resolve_url(&self, path: &str) -> String {
        match path.strip_prefix('/') {
            Some(rest) => format!("{}{}", self.options.base_path, rest),
            None => path.to_string(),
        }
    }

    fn memory_hit(&mut self, key: &CacheKey, path: &str) -> Option<Value> {
        let entry = self.memory.get(key)?;
        if entry.path != path {
            self.diagnostics.key_collisions += 1;
            warn!(
                "event=cache_key_collision module=content status=warn key={} cached_path={} requested_path={}",
                key, entry.path, path
            );
        }
        debug!("event=content_load module=content status=ok source=memory key={key}");
        Some(entry.value.clone())
    }

    fn fetch_json(&self, path: &str) -> Result<Value, ContentLoadError> {
        let url = self.resolve_url(path);
        let response = self
            .fetcher
            .fetch(url.as_str())
            .map_err(ContentLoadError::Transport)?;
        if !response.is_ok() {
            return Err(ContentLoadError::Status(response.status));
        }
        serde_json::from_str(response.body.as_str()).map_err(ContentLoadError::Parse)
    }

    fn remember(&mut self, key: CacheKey, path: &str, value: Value) {
        self.memory.insert(
            key,
            MemoryEntry {
                path: path.to_string(),
                value,
            },
        );
    }

    fn write_durable(&mut self, key: &CacheKey, value: &Value) {
        let durable_key = key.durable_key(&self.options.namespace);
        let result = serde_json::to_string(value)
            .map_err(|err| err.to_string())
            .and_then(|text| {
                self.store
                    .set_item(durable_key.as_str(), text.as_str())
                    .map_err(|err| err.to_string())
            });

        if let Err(message) = result {
            self.diagnostics.durable_write_failures += 1;
            self.report_durable_failure(DurableOp::Write, durable_key, message);
        }
    }

    /// Reads and parses the durable copy; corrupt or unreadable entries count
    /// as absent. A stored JSON `null` is treated as absent too.
    fn read_durable(&mut self, key: &CacheKey) -> Option<Value> {
        let durable_key = key.durable_key(&self.options.namespace);
        let text = match self.store.get_item(durable_key.as_str()) {
            Ok(Some(text)) if !text.is_empty() => text,
            Ok(_) => return None,
            Err(err) => {
                self.diagnostics.durable_read_failures += 1;
                self.report_durable_failure(DurableOp::Read, durable_key, err.to_string());
                return None;
            }
        };

        match serde_json::from_str::<Value>(text.as_str()) {
            Ok(Value::Null) => None,
            Ok(value) => Some(value),
            Err(err) => {
                self.diagnostics.durable_read_failures += 1;
                self.report_durable_failure(DurableOp::Read, durable_key, err.to_string());
                None
            }
        }
    }

    fn report_durable_failure(&mut self, op: DurableOp, key: String, message: String) {
        debug!(
            "event=durable_store module=content status=ignored op={:?} key={} error={}",
            op, key, message
        );
        if let Some(hook) = self.failure_hook.as_mut() {
            hook(&DurableFailure { op, key, message });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ContentCache, ContentCacheOptions};
    use crate::db::open_db_in_memory;
    use crate::fetch::{ContentFetcher, FetchResponse, FetchResult};
    use crate::repo::local_store::SqliteLocalStore;
    use std::cell::RefCell;

    struct RecordingFetcher {
        urls: RefCell<Vec<String>>,
    }

    impl ContentFetcher for RecordingFetcher {
        fn fetch(&self, url: &str) -> FetchResult<FetchResponse> {
            self.urls.borrow_mut().push(url.to_string());
            Ok(FetchResponse::new(200, "{}"))
        }
    }

    #[test]
    fn resolve_url_reroots_absolute_paths_under_base() {
        let conn = open_db_in_memory().unwrap();
        let fetcher = RecordingFetcher {
            urls: RefCell::new(Vec::new()),
        };
        let mut cache = ContentCache::new(
            &fetcher,
            SqliteLocalStore::new(&conn),
            ContentCacheOptions {
                namespace: "ppeak".to_string(),
                base_path: "/portfolio/".to_string(),
            },
        );

        assert_eq!(
            cache.resolve_url("/content/works.json"),
            "/portfolio/content/works.json"
        );
        assert_eq!(cache.resolve_url("content/works.json"), "content/works.json");

        cache.load_content("/content/works.json").unwrap();
        assert_eq!(
            fetcher.urls.borrow().as_slice(),
            ["/portfolio/content/works.json".to_string()]
        );
    }
}
