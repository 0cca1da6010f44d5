//! In-memory build outputs.
//!
//! Steps produce [`RenderedAsset`]s instead of writing files directly, so
//! the output directory is only touched once every step has succeeded.

use super::{BuildError, Result};
use crate::log;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Logical format of a staged output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// SVG source text.
    Svg,
    /// Full-size raster straight from the rasterizer (PNG).
    Raster,
    /// Compressed photographic derivative (JPEG).
    Photographic,
    /// Small preview derivative (AVIF).
    Preview,
    /// Syndication feed document.
    Feed,
}

#[derive(Debug, Clone)]
pub struct RenderedAsset {
    pub kind: AssetKind,
    /// Destination, relative to the output directory.
    pub dest: PathBuf,
    pub bytes: Vec<u8>,
}

impl RenderedAsset {
    pub fn new(kind: AssetKind, dest: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            kind,
            dest: dest.into(),
            bytes,
        }
    }
}

/// Write staged assets under `output_dir`, overwriting existing files.
pub fn write_assets(output_dir: &Path, assets: &[RenderedAsset]) -> Result<()> {
    for asset in assets {
        let path = output_dir.join(&asset.dest);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
        }
        fs::write(&path, &asset.bytes).map_err(|e| BuildError::io(&path, e))?;
        log!("write"; "{}", asset.dest.display());
    }
    Ok(())
}
