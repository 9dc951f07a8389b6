use std::path::PathBuf;

use super::AssetError;

/// Byte source for models and images.
pub trait AssetFetch {
    /// Fetch the full contents at `path`.
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, AssetError>;
}

/// Reads assets from a directory on the local filesystem.
///
/// Relative paths resolve against `root`. A path starting with `/`
/// resolves against the filesystem root, the same way an absolute URL
/// ignores the page's directory.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    /// Fetcher rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a request path to a filesystem path.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl AssetFetch for FsFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let full = self.resolve(path);
        std::fs::read(&full).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AssetError::NotFound(path.to_owned()),
            _ => AssetError::Fetch {
                path: path.to_owned(),
                reason: e.to_string(),
            },
        })
    }
}

/// Fetches assets from an HTTP server.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base_url: String,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    /// Fetcher resolving paths against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Full URL for a request path. Paths starting with `/` are
    /// host-absolute; anything else is appended to the base URL.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if let Some(absolute) = path.strip_prefix('/') {
            let host_end = base
                .find("://")
                .and_then(|scheme| {
                    base[scheme + 3..].find('/').map(|i| scheme + 3 + i)
                })
                .unwrap_or(base.len());
            format!("{}/{absolute}", &base[..host_end])
        } else {
            format!("{base}/{}", path.trim_start_matches("./"))
        }
    }
}

#[cfg(feature = "http")]
impl AssetFetch for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let url = self.url_for(path);
        let fail = |reason: String| AssetError::Fetch {
            path: url.clone(),
            reason,
        };
        let response = ureq::get(&url).call().map_err(|e| match e {
            ureq::Error::StatusCode(404) => AssetError::NotFound(url.clone()),
            other => fail(other.to_string()),
        })?;
        response
            .into_body()
            .with_config()
            .limit(256 * 1024 * 1024)
            .read_to_vec()
            .map_err(|e| fail(e.to_string()))
    }
}

/// Either fetcher, chosen at startup.
#[derive(Debug, Clone)]
pub enum AssetSource {
    /// Local directory.
    Fs(FsFetcher),
    /// HTTP server.
    #[cfg(feature = "http")]
    Http(HttpFetcher),
}

impl AssetFetch for AssetSource {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        match self {
            Self::Fs(fetcher) => fetcher.fetch(path).await,
            #[cfg(feature = "http")]
            Self::Http(fetcher) => fetcher.fetch(path).await,
        }
    }
}
