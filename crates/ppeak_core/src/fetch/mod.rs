//! Content transport seam.
//!
//! # Responsibility
//! - Define how the content cache reaches static JSON assets.
//! - Provide a native implementation serving files from an asset directory.
//!
//! # Invariants
//! - Transport-level failures are `Err`; HTTP-level failures are an `Ok`
//!   response whose `is_ok()` is false.

mod static_assets;

pub use static_assets::StaticAssetFetcher;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type FetchResult<T> = Result<T, FetchError>;

/// Response envelope for one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `true` for 2xx statuses.
    pub fn is_ok(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Transport failure: the request never produced a status.
#[derive(Debug)]
pub enum FetchError {
    Io {
        url: String,
        source: std::io::Error,
    },
    Unreachable(String),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { url, source } => write!(f, "failed to read `{url}`: {source}"),
            Self::Unreachable(message) => write!(f, "network unreachable: {message}"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Unreachable(_) => None,
        }
    }
}

/// Fetches content documents by resolved URL path.
pub trait ContentFetcher {
    fn fetch(&self, url: &str) -> FetchResult<FetchResponse>;
}

impl<F: ContentFetcher + ?Sized> ContentFetcher for &F {
    fn fetch(&self, url: &str) -> FetchResult<FetchResponse> {
        (**self).fetch(url)
    }
}

impl<F: ContentFetcher + ?Sized> ContentFetcher for Box<F> {
    fn fetch(&self, url: &str) -> FetchResult<FetchResponse> {
        (**self).fetch(url)
    }
}
