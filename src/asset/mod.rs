//! Model and image loading with deployment-path fallbacks.
//!
//! A requested path is expanded into an ordered list of variants (see
//! [`PathStrategy`]). Variants are tried one after another and the first
//! one that both fetches and decodes wins. When every variant fails the
//! loader returns [`AssetError::Exhausted`], naming the requested path and
//! each attempt's cause.

mod fetch;

use std::fmt;

#[cfg(feature = "http")]
pub use fetch::HttpFetcher;
pub use fetch::{AssetFetch, AssetSource, FsFetcher};

use crate::model::{self, Model};

/// One way of rewriting a requested path before fetching it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStrategy {
    /// The path exactly as requested.
    Identity,
    /// Drop leading `/` characters.
    StripLeadingSlash,
    /// `./` followed by the path without leading `/`.
    DotRelative,
    /// `models/` followed by the file name only.
    ModelsDirectory,
}

impl PathStrategy {
    /// Default variant order.
    pub const DEFAULT_ORDER: [Self; 4] = [
        Self::Identity,
        Self::StripLeadingSlash,
        Self::DotRelative,
        Self::ModelsDirectory,
    ];

    /// Rewrite `path` according to this strategy.
    #[must_use]
    pub fn apply(self, path: &str) -> String {
        let stripped = path.trim_start_matches('/');
        match self {
            Self::Identity => path.to_owned(),
            Self::StripLeadingSlash => stripped.to_owned(),
            Self::DotRelative => format!("./{stripped}"),
            Self::ModelsDirectory => {
                let file = stripped.rsplit('/').next().unwrap_or(stripped);
                format!("models/{file}")
            }
        }
    }
}

/// Errors from fetching or decoding an asset.
#[derive(Debug)]
pub enum AssetError {
    /// Nothing exists at the given location.
    NotFound(String),
    /// The transport failed (I/O or HTTP) for the given location.
    Fetch {
        /// Location that was requested.
        path: String,
        /// Transport error message.
        reason: String,
    },
    /// The bytes were fetched but could not be decoded.
    Decode {
        /// Location the bytes came from.
        path: String,
        /// Decoder error message.
        reason: String,
    },
    /// Every path variant failed.
    Exhausted {
        /// Path originally requested.
        path: String,
        /// One error per attempted variant, in attempt order.
        attempts: Vec<AssetError>,
    },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "{path}: not found"),
            Self::Fetch { path, reason } => {
                write!(f, "{path}: fetch failed: {reason}")
            }
            Self::Decode { path, reason } => {
                write!(f, "{path}: decode failed: {reason}")
            }
            Self::Exhausted { path, attempts } => {
                write!(
                    f,
                    "could not load {path} after {} attempts",
                    attempts.len()
                )?;
                for attempt in attempts {
                    write!(f, "; {attempt}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for AssetError {}

/// Sequential path-variant loader over any [`AssetFetch`] backend.
pub struct AssetLoader<F> {
    fetcher: F,
    strategies: Vec<PathStrategy>,
}

impl<F: AssetFetch> AssetLoader<F> {
    /// Loader using [`PathStrategy::DEFAULT_ORDER`].
    pub fn new(fetcher: F) -> Self {
        Self::with_strategies(fetcher, PathStrategy::DEFAULT_ORDER.to_vec())
    }

    /// Loader with a custom variant order.
    pub fn with_strategies(fetcher: F, strategies: Vec<PathStrategy>) -> Self {
        Self {
            fetcher,
            strategies,
        }
    }

    /// Configured strategies, in attempt order.
    pub fn strategies(&self) -> &[PathStrategy] {
        &self.strategies
    }

    /// Underlying fetch backend.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch raw bytes, trying every variant until one succeeds.
    pub async fn fetch(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        self.try_variants(path, |_, bytes| Ok(bytes)).await
    }

    /// Fetch and decode a glTF model, trying every variant until one
    /// succeeds.
    pub async fn load(&self, path: &str) -> Result<Model, AssetError> {
        let model = self
            .try_variants(path, |variant, bytes| {
                model::gltf::decode(path, &bytes).map_err(|reason| AssetError::Decode {
                    path: variant.to_owned(),
                    reason,
                })
            })
            .await?;
        log::info!("loaded {path} ({} triangles)", model.triangle_count());
        Ok(model)
    }

    async fn try_variants<T>(
        &self,
        path: &str,
        decode: impl Fn(&str, Vec<u8>) -> Result<T, AssetError>,
    ) -> Result<T, AssetError> {
        let mut attempts = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            let variant = strategy.apply(path);
            let result = match self.fetcher.fetch(&variant).await {
                Ok(bytes) => decode(&variant, bytes),
                Err(e) => Err(e),
            };
            match result {
                Ok(value) => return Ok(value),
                Err(e) => {
                    log::warn!("failed to load {variant} ({strategy:?}): {e}");
                    attempts.push(e);
                }
            }
        }
        log::error!(
            "all {} path variants failed for {path}",
            attempts.len()
        );
        Err(AssetError::Exhausted {
            path: path.to_owned(),
            attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::testing::CountingFetcher;

    #[test]
    fn strategies_rewrite_paths() {
        let path = "/models/model1.glb";
        assert_eq!(PathStrategy::Identity.apply(path), path);
        assert_eq!(
            PathStrategy::StripLeadingSlash.apply(path),
            "models/model1.glb"
        );
        assert_eq!(PathStrategy::DotRelative.apply(path), "./models/model1.glb");
        assert_eq!(
            PathStrategy::ModelsDirectory.apply("/a/b/model1.glb"),
            "models/model1.glb"
        );
    }

    #[test]
    fn exhausted_after_exactly_n_attempts() {
        let fetcher = CountingFetcher::default();
        let loader = AssetLoader::new(fetcher);
        let err = pollster::block_on(loader.load("/missing.glb")).unwrap_err();
        let n = PathStrategy::DEFAULT_ORDER.len();
        assert_eq!(loader.fetcher().attempts(), n);
        match err {
            AssetError::Exhausted { path, attempts } => {
                assert_eq!(path, "/missing.glb");
                assert_eq!(attempts.len(), n);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn stops_at_first_success() {
        let fetcher = CountingFetcher::default()
            .with_file("models/tower.glb", b"bytes".to_vec());
        let loader = AssetLoader::new(fetcher);
        let bytes = pollster::block_on(loader.fetch("/models/tower.glb")).unwrap();
        assert_eq!(bytes, b"bytes");
        // Identity fails, StripLeadingSlash succeeds.
        assert_eq!(loader.fetcher().attempts(), 2);
    }

    #[test]
    fn decode_failure_moves_on_to_next_variant() {
        let fetcher = CountingFetcher::default()
            .with_file("/tower.glb", b"garbage".to_vec());
        let loader =
            AssetLoader::with_strategies(fetcher, vec![PathStrategy::Identity]);
        let err = pollster::block_on(loader.load("/tower.glb")).unwrap_err();
        let AssetError::Exhausted { attempts, .. } = err else {
            panic!("expected exhausted");
        };
        assert!(matches!(attempts[0], AssetError::Decode { .. }));
    }
}
