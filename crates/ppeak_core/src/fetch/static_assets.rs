//! Static asset directory transport.

use super::{ContentFetcher, FetchError, FetchResponse, FetchResult};
use log::debug;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Serves URL paths from files below `root`, like a static file host.
///
/// `mount_path` is stripped from incoming URLs first, so a site deployed
/// under `/portfolio/` maps `/portfolio/content/a.json` to
/// `<root>/content/a.json`.
#[derive(Debug, Clone)]
pub struct StaticAssetFetcher {
    root: PathBuf,
    mount_path: String,
}

impl StaticAssetFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mount_path: "/".to_string(),
        }
    }

    pub fn with_mount_path(mut self, mount_path: impl Into<String>) -> Self {
        self.mount_path = mount_path.into();
        self
    }

    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Maps a URL path onto the asset root.
    ///
    /// Returns `None` for traversal attempts (`..`, absolute components after
    /// the mount prefix).
    fn resolve(&self, url: &str) -> Option<PathBuf> {
        let path_part = url.split(['?', '#']).next().unwrap_or_default();
        let relative = path_part
            .strip_prefix(self.mount_path.as_str())
            .unwrap_or(path_part)
            .trim_start_matches('/');

        let mut resolved = self.root.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(resolved)
    }
}

impl ContentFetcher for StaticAssetFetcher {
    fn fetch(&self, url: &str) -> FetchResult<FetchResponse> {
        let Some(path) = self.resolve(url) else {
            debug!("event=asset_fetch module=fetch status=forbidden url={url}");
            return Ok(FetchResponse::new(403, ""));
        };

        match std::fs::read_to_string(&path) {
            Ok(body) => {
                debug!("event=asset_fetch module=fetch status=ok url={url}");
                Ok(FetchResponse::new(200, body))
            }
            Err(err) if err.kind() == ErrorKind::NotFound || path.is_dir() => {
                debug!("event=asset_fetch module=fetch status=not_found url={url}");
                Ok(FetchResponse::new(404, ""))
            }
            Err(source) => Err(FetchError::Io {
                url: url.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StaticAssetFetcher;
    use crate::fetch::ContentFetcher;

    #[test]
    fn serves_files_under_mount_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("content")).unwrap();
        std::fs::write(dir.path().join("content/about.json"), r#"{"name":"x"}"#).unwrap();

        let fetcher = StaticAssetFetcher::new(dir.path()).with_mount_path("/site/");
        let response = fetcher.fetch("/site/content/about.json").unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"name":"x"}"#);
    }

    #[test]
    fn missing_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StaticAssetFetcher::new(dir.path());
        let response = fetcher.fetch("/content/missing.json").unwrap();
        assert_eq!(response.status, 404);
        assert!(!response.is_ok());
    }

    #[test]
    fn traversal_is_forbidden() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = StaticAssetFetcher::new(dir.path());
        let response = fetcher.fetch("/../etc/passwd").unwrap();
        assert_eq!(response.status, 403);
    }

    #[test]
    fn query_string_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), "[]").unwrap();
        let fetcher = StaticAssetFetcher::new(dir.path());
        assert_eq!(fetcher.fetch("/a.json?v=2").unwrap().status, 200);
    }
}
