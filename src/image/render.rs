//! SVG rasterization.
//!
//! Rendering is split in two so the CPU-bound part stays synchronous:
//!
//! 1. [`collect_image_refs`] + [`ResolvedImages::resolve`] find every
//!    embedded image reference and resolve it (async, may hit the network).
//! 2. [`render_png`] parses and renders with only resolved bytes available.
//!    Nothing is read from disk or network during this step.

use super::{
    resolve::{Fetch, ImageResolver},
    runtime::RenderRuntime,
};
use crate::{
    core::{BuildError, Result},
    utils::html::unescape,
};
use parking_lot::Mutex;
use quick_xml::{Reader, events::Event};
use resvg::tiny_skia::{Pixmap, Transform};
use rustc_hash::{FxHashMap, FxHashSet};
use std::{path::Path, sync::Arc};
use usvg::{ImageHrefResolver, ImageKind, Options, Tree};

/// Output sizing policy. Aspect ratio is always kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitTo {
    Width(u32),
    Height(u32),
}

impl FitTo {
    /// Pixel size for an SVG of `width` x `height` user units.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn size(self, width: f32, height: f32) -> (u32, u32) {
        let (w, h) = match self {
            Self::Width(target) => (target as f32, height * target as f32 / width),
            Self::Height(target) => (width * target as f32 / height, target as f32),
        };
        (w.round() as u32, h.round() as u32)
    }
}

// ============================================================================
// Reference discovery
// ============================================================================

/// Elements whose `href` is loaded as an external image.
const IMAGE_ELEMENTS: [&[u8]; 2] = [b"image", b"feImage"];

/// Distinct image hrefs (`<image>`, `<feImage>`) in document order. `data:`
/// URLs are left to the renderer; `#id` references point into the document.
///
/// Malformed markup stops the scan early; the parse error surfaces from
/// [`render_png`].
pub fn collect_image_refs(svg: &str) -> Vec<String> {
    let mut reader = Reader::from_str(svg);
    let mut seen = FxHashSet::default();
    let mut refs = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e))
                if IMAGE_ELEMENTS.iter().any(|name| *name == e.local_name().as_ref()) =>
            {
                // Matches both `href` and `xlink:href`
                let href = e
                    .attributes()
                    .filter_map(|a| a.ok())
                    .find(|attr| attr.key.local_name().as_ref() == b"href")
                    .and_then(|attr| {
                        std::str::from_utf8(&attr.value)
                            .ok()
                            .map(|v| unescape(v).trim().to_owned())
                    });
                if let Some(href) = href
                    && !href.is_empty()
                    && !href.starts_with("data:")
                    && !href.starts_with('#')
                    && seen.insert(href.clone())
                {
                    refs.push(href);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            Ok(_) => {}
        }
    }

    refs
}

// ============================================================================
// Resolved images
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
    Svg,
}

impl ImageFormat {
    fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0x89, b'P', b'N', b'G', ..] => Some(Self::Png),
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [b'G', b'I', b'F', b'8', ..] => Some(Self::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            _ => {
                let head = String::from_utf8_lossy(&bytes[..bytes.len().min(256)]);
                let head = head.trim_start();
                (head.starts_with("<svg") || head.starts_with("<?xml")).then_some(Self::Svg)
            }
        }
    }
}

#[derive(Debug, Clone)]
struct ResolvedImage {
    format: ImageFormat,
    bytes: Arc<Vec<u8>>,
}

/// Embedded image bytes keyed by the href used in the SVG.
#[derive(Debug, Clone, Default)]
pub struct ResolvedImages {
    images: FxHashMap<String, ResolvedImage>,
}

impl ResolvedImages {
    /// Resolve each reference in order, one at a time.
    ///
    /// With no references the resolver is never touched.
    pub async fn resolve<F: Fetch>(refs: &[String], resolver: &ImageResolver<F>) -> Result<Self> {
        let mut images = FxHashMap::default();
        for url in refs {
            let bytes = resolver.resolve(url).await?;
            let format = ImageFormat::sniff(&bytes)
                .ok_or_else(|| BuildError::UnsupportedImage { url: url.clone() })?;
            images.insert(url.clone(), ResolvedImage { format, bytes });
        }
        Ok(Self { images })
    }

    fn image_kind(&self, href: &str, options: &Options) -> Option<ImageKind> {
        let image = self.images.get(href.trim())?;
        let bytes = Arc::clone(&image.bytes);
        Some(match image.format {
            ImageFormat::Png => ImageKind::PNG(bytes),
            ImageFormat::Jpeg => ImageKind::JPEG(bytes),
            ImageFormat::Gif => ImageKind::GIF(bytes),
            ImageFormat::Webp => ImageKind::WEBP(bytes),
            ImageFormat::Svg => ImageKind::SVG(Tree::from_data(&bytes, options).ok()?),
        })
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render `svg` to PNG bytes.
///
/// `source` only labels errors. Every href the renderer asks for must be in
/// `images`; a miss fails with [`BuildError::UnresolvedImage`] instead of
/// rendering an empty placeholder.
pub fn render_png(
    svg: &str,
    source: &Path,
    images: &ResolvedImages,
    fit: FitTo,
    runtime: &RenderRuntime,
) -> Result<Vec<u8>> {
    let misses = Mutex::new(Vec::<String>::new());
    let record = &misses;
    let options = Options {
        font_family: runtime.default_family().to_owned(),
        fontdb: runtime.fontdb(),
        image_href_resolver: ImageHrefResolver {
            resolve_data: ImageHrefResolver::default_data_resolver(),
            resolve_string: Box::new(move |href: &str, opts: &Options| {
                let kind = images.image_kind(href, opts);
                if kind.is_none() {
                    record.lock().push(href.trim().to_owned());
                }
                kind
            }),
        },
        ..Options::default()
    };

    let tree = Tree::from_str(svg, &options).map_err(|source_err| BuildError::Svg {
        path: source.to_path_buf(),
        source: source_err,
    })?;
    if let Some(url) = misses.lock().first() {
        return Err(BuildError::UnresolvedImage {
            url: url.clone(),
            path: source.to_path_buf(),
        });
    }

    let size = tree.size();
    let (width, height) = fit.size(size.width(), size.height());
    let mut pixmap =
        Pixmap::new(width, height).ok_or(BuildError::RasterSize { width, height })?;

    let transform = Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap.encode_png().map_err(|e| BuildError::Png(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::super::{
        fonts::FontBufferSet,
        resolve::{
            LocalImages,
            tests::{StubFetch, local},
        },
    };
    use super::*;
    use crate::core::Deferred;

    const PLAIN: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50"><rect width="100" height="50" fill="red"/></svg>"#;

    fn runtime() -> RenderRuntime {
        RenderRuntime::new(&FontBufferSet::default(), None)
    }

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 128, 255, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_fit_to_size() {
        assert_eq!(FitTo::Height(1260).size(1200.0, 630.0), (2400, 1260));
        assert_eq!(FitTo::Width(600).size(1200.0, 630.0), (600, 315));
        assert_eq!(FitTo::Width(100).size(100.0, 50.0), (100, 50));
    }

    #[test]
    fn test_collect_image_refs() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
            <image href="https://a.com/logo.png"/>
            <g><image xlink:href="https://b.com/x.svg?a=1&amp;b=2"></image></g>
            <image href="data:image/png;base64,AAAA"/>
            <image href="https://a.com/logo.png"/>
            <img href="https://c.com/not-svg-image.png"/>
            <filter id="f"><feImage href="https://d.com/texture.png"/><feImage href="#shape"/></filter>
        </svg>"##;
        assert_eq!(
            collect_image_refs(svg),
            [
                "https://a.com/logo.png",
                "https://b.com/x.svg?a=1&b=2",
                "https://d.com/texture.png"
            ]
        );
    }

    #[test]
    fn test_sniff_formats() {
        assert_eq!(ImageFormat::sniff(&tiny_png()), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::sniff(b"  <svg></svg>"), Some(ImageFormat::Svg));
        assert_eq!(ImageFormat::sniff(b"plain text"), None);
    }

    #[tokio::test]
    async fn test_no_refs_never_touches_resolver() {
        // Both tiers fail if consulted
        let failing: Deferred<LocalImages> =
            Deferred::spawn(async { Err(BuildError::Consumed) });
        let resolver = ImageResolver::with_fetch(failing, StubFetch::refusing());

        let refs = collect_image_refs(PLAIN);
        assert!(refs.is_empty());
        let images = ResolvedImages::resolve(&refs, &resolver).await.unwrap();

        let png = render_png(
            PLAIN,
            Path::new("plain.svg"),
            &images,
            FitTo::Height(100),
            &runtime(),
        )
        .unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (200, 100));
    }

    #[tokio::test]
    async fn test_render_with_known_image() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><image href="https://example.com/logo.png" width="4" height="4"/></svg>"#;
        let fetch = StubFetch::refusing();
        let resolver = ImageResolver::with_fetch(
            local(&[("https://example.com/logo.png", &tiny_png())]),
            fetch,
        );

        let images = ResolvedImages::resolve(&collect_image_refs(svg), &resolver).await.unwrap();
        assert!(images.images.contains_key("https://example.com/logo.png"));

        let png = render_png(svg, Path::new("logo.svg"), &images, FitTo::Width(4), &runtime()).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(2, 2).0[3], 255);
    }

    #[tokio::test]
    async fn test_unsupported_image_is_fatal() {
        let resolver = ImageResolver::with_fetch(
            local(&[("https://example.com/a.bin", b"junk")]),
            StubFetch::refusing(),
        );
        let err = ResolvedImages::resolve(&["https://example.com/a.bin".to_string()], &resolver)
            .await
            .unwrap_err();
        assert!(matches!(err, BuildError::UnsupportedImage { ref url } if url.ends_with("a.bin")));
    }

    #[test]
    fn test_render_fails_on_unresolved_href() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><image href="https://cdn.example.com/late.png" width="4" height="4"/></svg>"#;
        let err = render_png(
            svg,
            Path::new("late.svg"),
            &ResolvedImages::default(),
            FitTo::Width(4),
            &runtime(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BuildError::UnresolvedImage { ref url, .. } if url == "https://cdn.example.com/late.png"
        ));
    }

    #[tokio::test]
    async fn test_fe_image_href_goes_through_resolver() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><filter id="f"><feImage href="https://cdn.example.com/texture.png"/></filter><rect width="4" height="4" filter="url(#f)"/></svg>"#;
        let resolver = ImageResolver::with_fetch(local(&[]), StubFetch::refusing());

        let err = ResolvedImages::resolve(&collect_image_refs(svg), &resolver)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("https://cdn.example.com/texture.png"));
    }

    #[test]
    fn test_invalid_svg() {
        let err = render_png(
            "<svg",
            Path::new("broken.svg"),
            &ResolvedImages::default(),
            FitTo::Width(10),
            &runtime(),
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::Svg { .. }));
    }
}
