//! Error type shared by the sampler, the collaborators and the batch tools.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to callers.
///
/// A box that cannot be placed within the retry budget is not an error: the
/// samplers report it as `None` and the orchestrators drop it.
#[derive(Debug, Error)]
pub enum SynthError {
    /// Pixel layout the integral builder cannot interpret.
    #[error("unsupported image format: {channels} channel(s), expected 1, 3 or 4")]
    UnsupportedFormat { channels: usize },

    #[error("i/o error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {path}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode image {path}")]
    ImageEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to load font {path}: {reason}")]
    Font { path: PathBuf, reason: String },

    #[error("no fonts available")]
    NoFonts,

    #[error("corpus is empty")]
    EmptyCorpus,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("invalid config {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("json error")]
    Json(#[from] serde_json::Error),
}

impl SynthError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = SynthError> = std::result::Result<T, E>;
