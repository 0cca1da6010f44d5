//! Build error taxonomy.
//!
//! Every variant is fatal: errors propagate to the top of the build
//! sequence and the process exits non-zero. Nothing here is retried.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = BuildError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum BuildError {
    // ------------------------------------------------------------------
    // validation
    // ------------------------------------------------------------------
    #[error("invalid blog post `{url}`: {reason}")]
    InvalidPost { url: String, reason: String },

    #[error("blog index page `{0}` not found in content manifest")]
    MissingIndex(String),

    #[error("failed to parse content manifest `{path}`")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // ------------------------------------------------------------------
    // resolution
    // ------------------------------------------------------------------
    #[error("failed to fetch image `{url}`")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch image `{url}`: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("unsupported image format for `{url}`")]
    UnsupportedImage { url: String },

    #[error("embedded image `{url}` in `{path}` was not resolved before rendering")]
    UnresolvedImage { url: String, path: PathBuf },

    // ------------------------------------------------------------------
    // encoding
    // ------------------------------------------------------------------
    #[error("failed to parse SVG `{path}`")]
    Svg {
        path: PathBuf,
        #[source]
        source: usvg::Error,
    },

    #[error("invalid raster size {width}x{height}")]
    RasterSize { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Png(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("AVIF encoding failed: {0}")]
    Avif(String),

    #[error("feed generation failed: {0}")]
    Feed(String),

    // ------------------------------------------------------------------
    // plumbing
    // ------------------------------------------------------------------
    #[error("IO error when accessing `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("background load failed")]
    Task(#[from] tokio::task::JoinError),

    #[error("background load already consumed by a failed attempt")]
    Consumed,
}

impl BuildError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_post(url: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPost {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_post_names_url() {
        let err = BuildError::invalid_post("/blog/a", "missing title");
        assert_eq!(
            err.to_string(),
            "invalid blog post `/blog/a`: missing title"
        );
    }

    #[test]
    fn test_http_status_names_url() {
        let err = BuildError::HttpStatus {
            url: "https://example.com/logo.png".into(),
            status: 404,
        };
        assert!(err.to_string().contains("https://example.com/logo.png"));
        assert!(err.to_string().contains("404"));
    }
}
