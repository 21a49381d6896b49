//! Core logic for the ppeak composer site.
//! This crate owns content caching, world/theme state and the decorative
//! animation controllers; host surfaces only wire browser facilities in.

pub mod anim;
pub mod config;
pub mod db;
pub mod dom;
pub mod fetch;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, SiteConfig};
pub use dom::{AttributeMap, DocumentRoot, ATTR_AESTHETIC, ATTR_THEME};
pub use fetch::{ContentFetcher, FetchError, FetchResponse, FetchResult, StaticAssetFetcher};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::content::{CacheKey, ContentError};
pub use model::world::{ColorScheme, ThemeState, World};
pub use repo::local_store::{DurableStore, SqliteLocalStore, StoreError, StoreResult};
pub use service::content_service::{
    CacheDiagnostics, ContentCache, ContentCacheOptions, ContentLoadError, DurableFailure,
    DurableOp,
};
pub use service::theme_service::{world_storage_key, SubscriptionId, ThemeStore};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
