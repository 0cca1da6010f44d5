//! Site-wide social poster.
//!
//! One SVG template rendered at a fixed height, plus its JPEG and AVIF
//! derivatives. All outputs are returned staged; nothing is written here.

use super::{
    convert::{to_avif_preview, to_jpeg},
    fonts::FontBufferSet,
    render::{FitTo, ResolvedImages, collect_image_refs, render_png},
    resolve::{Fetch, ImageResolver},
    runtime::RenderRuntime,
};
use crate::{
    config::PosterConfig,
    core::{AssetKind, BuildError, Deferred, RenderedAsset, Result},
    debug, log,
};

/// Render the poster and its derivatives.
///
/// Fonts are awaited only after the template's images are resolved.
pub async fn render_poster<F: Fetch>(
    config: &PosterConfig,
    fonts: &Deferred<FontBufferSet>,
    resolver: &ImageResolver<F>,
) -> Result<Vec<RenderedAsset>> {
    let template = &config.template;
    let svg = tokio::fs::read_to_string(template)
        .await
        .map_err(|e| BuildError::io(template, e))?;

    let refs = collect_image_refs(&svg);
    debug!("poster"; "{} embedded images in {}", refs.len(), template.display());
    let images = ResolvedImages::resolve(&refs, resolver).await?;

    let runtime = RenderRuntime::initialize(fonts.get().await?, config.default_family.as_deref());

    // CPU-bound: rasterize and encode on the blocking pool
    let (png, jpeg, preview) = {
        let svg = svg.clone();
        let source = template.clone();
        let fit = FitTo::Height(config.height);
        let jpeg_quality = config.jpeg.quality;
        let preview = config.preview.clone();
        tokio::task::spawn_blocking(move || -> Result<_> {
            let png = render_png(&svg, &source, &images, fit, runtime)?;
            let jpeg = to_jpeg(&png, jpeg_quality)?;
            let avif = to_avif_preview(&png, preview.max_size, preview.quality, preview.effort)?;
            Ok((png, jpeg, avif))
        })
        .await??
    };
    log!("poster"; "rendered {} (+ jpeg, avif)", config.output.display());

    let mut assets = Vec::with_capacity(4);
    if config.emit_svg {
        assets.push(RenderedAsset::new(
            AssetKind::Svg,
            config.output.with_extension("svg"),
            svg.into_bytes(),
        ));
    }
    assets.push(RenderedAsset::new(AssetKind::Raster, &config.output, png));
    assets.push(RenderedAsset::new(AssetKind::Photographic, &config.jpeg.path, jpeg));
    assets.push(RenderedAsset::new(AssetKind::Preview, &config.preview.path, preview));
    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::super::resolve::tests::{StubFetch, local};
    use super::*;

    const POSTER: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100"><rect width="200" height="100" fill="teal"/></svg>"#;

    fn config(dir: &std::path::Path) -> PosterConfig {
        let template = dir.join("poster.svg");
        std::fs::write(&template, POSTER).unwrap();
        let mut config = PosterConfig {
            template,
            height: 50,
            emit_svg: true,
            ..Default::default()
        };
        config.preview.max_size = 40;
        config
    }

    #[tokio::test]
    async fn test_render_poster_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let fonts = Deferred::ready(FontBufferSet::default());
        let resolver = ImageResolver::with_fetch(local(&[]), StubFetch::refusing());

        let assets = render_poster(&config, &fonts, &resolver).await.unwrap();
        let kinds: Vec<_> = assets.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            [AssetKind::Svg, AssetKind::Raster, AssetKind::Photographic, AssetKind::Preview]
        );
        assert_eq!(assets[0].dest, std::path::Path::new("og.svg"));

        let raster = image::load_from_memory(&assets[1].bytes).unwrap();
        assert_eq!((raster.width(), raster.height()), (100, 50));
        let jpeg = image::load_from_memory(&assets[2].bytes).unwrap();
        assert_eq!((jpeg.width(), jpeg.height()), (100, 50));
        assert_eq!(&assets[3].bytes[4..8], b"ftyp");
    }

    #[tokio::test]
    async fn test_missing_template_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = PosterConfig {
            template: dir.path().join("missing.svg"),
            ..Default::default()
        };
        let fonts = Deferred::ready(FontBufferSet::default());
        let resolver = ImageResolver::with_fetch(local(&[]), StubFetch::refusing());
        assert!(matches!(
            render_poster(&config, &fonts, &resolver).await,
            Err(BuildError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_unresolvable_image_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        std::fs::write(
            &config.template,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><image href="https://cdn.example.com/gone.png"/></svg>"#,
        )
        .unwrap();
        config.emit_svg = false;

        let fonts = Deferred::ready(FontBufferSet::default());
        let resolver = ImageResolver::with_fetch(local(&[]), StubFetch::refusing());
        let err = render_poster(&config, &fonts, &resolver).await.unwrap_err();
        assert!(err.to_string().contains("https://cdn.example.com/gone.png"));
    }

    #[tokio::test]
    async fn test_unknown_filter_image_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        std::fs::write(
            &config.template,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><filter id="f"><feImage href="https://cdn.example.com/noise.png"/></filter><rect width="10" height="10" filter="url(#f)"/></svg>"#,
        )
        .unwrap();

        let fonts = Deferred::ready(FontBufferSet::default());
        let resolver = ImageResolver::with_fetch(local(&[]), StubFetch::refusing());
        let err = render_poster(&config, &fonts, &resolver).await.unwrap_err();
        assert!(err.to_string().contains("https://cdn.example.com/noise.png"));
    }
}
