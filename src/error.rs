//! Crate-level error types.

use std::fmt;

use crate::{asset::AssetError, gpu::render_context::RenderContextError};

/// Errors produced by the atrium crate.
#[derive(Debug)]
pub enum ShowcaseError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Failed to fetch or decode an asset.
    Asset(AssetError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Scene manifest parsing failure.
    ManifestParse(String),
    /// Theme preference could not be read or written.
    Preferences(String),
    /// A frame could not be presented.
    Render(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for ShowcaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Asset(e) => write!(f, "asset error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::ManifestParse(msg) => {
                write!(f, "manifest parse error: {msg}")
            }
            Self::Preferences(msg) => write!(f, "preferences error: {msg}"),
            Self::Render(msg) => write!(f, "render error: {msg}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for ShowcaseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Asset(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for ShowcaseError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<AssetError> for ShowcaseError {
    fn from(e: AssetError) -> Self {
        Self::Asset(e)
    }
}

impl From<std::io::Error> for ShowcaseError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
