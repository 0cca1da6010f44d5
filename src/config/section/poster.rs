//! `[poster]` and `[og]` configuration.
//!
//! `[poster]` describes the fixed social poster rendered from one SVG
//! template plus its two derivatives. The font list and known images are
//! shared with per-page OG image generation (`[og]`).

use crate::config::ConfigDiagnostics;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An embedded image URL served from a bundled local file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnownImage {
    pub url: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PosterConfig {
    pub enable: bool,
    /// SVG template for the poster.
    pub template: PathBuf,
    /// Installed font package directory.
    pub font_dir: PathBuf,
    /// Font files (one per weight) inside `font_dir`.
    pub fonts: Vec<String>,
    /// Family used for text without an explicit `font-family`.
    pub default_family: Option<String>,
    /// Embedded image URLs backed by local files.
    pub images: Vec<KnownImage>,
    /// Raster height; width follows the template's aspect ratio.
    pub height: u32,
    /// Full-size PNG output path.
    pub output: PathBuf,
    /// Also copy the SVG source next to the raster (as `.svg`).
    pub emit_svg: bool,
    pub jpeg: JpegConfig,
    pub preview: PreviewConfig,
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            enable: true,
            template: "assets/og-poster.svg".into(),
            font_dir: "assets/fonts/inter".into(),
            fonts: [
                "Inter-Regular.ttf",
                "Inter-Medium.ttf",
                "Inter-SemiBold.ttf",
                "Inter-Bold.ttf",
            ]
            .map(String::from)
            .to_vec(),
            default_family: Some("Inter".into()),
            images: Vec::new(),
            height: 1260,
            output: "og.png".into(),
            emit_svg: false,
            jpeg: JpegConfig::default(),
            preview: PreviewConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JpegConfig {
    pub path: PathBuf,
    /// Encoder quality, 0-100.
    pub quality: u8,
}

impl Default for JpegConfig {
    fn default() -> Self {
        Self {
            path: "og.jpg".into(),
            quality: 80,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub path: PathBuf,
    /// Bounding box edge; the preview never exceeds it and is never upscaled.
    pub max_size: u32,
    /// Encoder quality, 0-100.
    pub quality: u8,
    /// Encoder effort, 0 (fastest) - 9 (smallest).
    pub effort: u8,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            path: "og-preview.avif".into(),
            max_size: 640,
            quality: 50,
            effort: 4,
        }
    }
}

impl PosterConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        diag.check_nonzero("poster.height", self.height);
        diag.check_quality("poster.jpeg.quality", self.jpeg.quality);
        diag.check_quality("poster.preview.quality", self.preview.quality);
        diag.check_nonzero("poster.preview.max_size", self.preview.max_size);
        if self.preview.effort > 9 {
            diag.error(
                "poster.preview.effort",
                format!("effort must be within 0-9, got {}", self.preview.effort),
            );
        }
        for image in &self.images {
            if !(image.url.starts_with("http://") || image.url.starts_with("https://")) {
                diag.error(
                    "poster.images",
                    format!("`{}` is not an absolute http(s) URL", image.url),
                );
            }
        }
    }
}

// ============================================================================
// [og]
// ============================================================================

/// Maps a page link prefix to a category label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRule {
    pub prefix: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OgConfig {
    pub enable: bool,
    /// SVG template with `{{category}}` and `{{line1}}`..`{{line3}}` slots.
    pub template: PathBuf,
    /// Output directory (relative to the output dir).
    pub dir: PathBuf,
    pub width: u32,
    /// Title wrap width in characters.
    pub max_chars_per_line: usize,
    /// Render pages whose HTML already declares an OG image.
    pub overwrite_existing_meta: bool,
    pub default_category: String,
    pub categories: Vec<CategoryRule>,
}

impl Default for OgConfig {
    fn default() -> Self {
        Self {
            enable: false,
            template: "assets/og-template.svg".into(),
            dir: "og".into(),
            width: 1200,
            max_chars_per_line: 30,
            overwrite_existing_meta: false,
            default_category: "Blog".into(),
            categories: Vec::new(),
        }
    }
}

impl OgConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.enable {
            return;
        }
        diag.check_nonzero("og.width", self.width);
        if self.max_chars_per_line == 0 {
            diag.error("og.max_chars_per_line", "must be greater than 0");
        }
    }
}
