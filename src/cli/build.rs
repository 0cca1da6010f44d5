//! Post-build pipeline orchestration.
//!
//! Pipeline phases:
//! - **Load** - font buffers and known images start loading in the background
//! - **Collect** - blog manifest validated and sorted
//! - **OG** - per-page images, before the feed that may reference them
//! - **Feed** - index page split off, feed document built
//! - **Poster** - social poster plus its JPEG / AVIF derivatives
//! - **Write** - every staged asset written to the output directory
//!
//! Each phase stages its outputs in memory; the output directory is only
//! touched once every phase has succeeded.

use crate::{
    blog::{BlogPost, collect_posts, load_manifest, split_index},
    config::SiteConfig,
    core::{Deferred, RenderedAsset, write_assets},
    generator::feed::build_feed,
    image::{
        CategoryClassifier, FontBufferSet, ImageResolver, OgImageRequest, PageImage, PageImages,
        TemplatePageImages, load_local_images, render_poster,
        resolve::{Fetch, HttpFetch},
    },
    log,
};
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;

/// Run the whole pipeline and write its outputs.
pub async fn build_all(config: &SiteConfig) -> Result<()> {
    let assets = synthesize(config, HttpFetch::default()).await?;
    write_assets(config.output_dir(), &assets)
        .with_context(|| format!("failed to write to {}", config.output_dir().display()))?;
    log!("build"; "{} files written to {}", assets.len(), config.output_dir().display());
    Ok(())
}

/// Run every phase and return the staged outputs.
pub async fn synthesize<F: Fetch>(config: &SiteConfig, fetch: F) -> Result<Vec<RenderedAsset>> {
    let renders = config.poster.enable || config.og.enable;
    let fonts = if renders {
        Deferred::spawn(FontBufferSet::load(config.font_paths()))
    } else {
        Deferred::ready(FontBufferSet::default())
    };
    let local = Deferred::spawn(load_local_images(config.poster.images.clone()));
    let resolver = ImageResolver::with_fetch(local, fetch);

    let raw = load_manifest(&config.blog.manifest).context("failed to load blog content")?;
    let posts = collect_posts(raw, &config.blog.index)?;

    let mut assets = Vec::new();

    let page_images = if config.og.enable {
        generate_page_images(config, &posts, &fonts, &resolver)
            .await
            .context("failed to generate page images")?
    } else {
        Vec::new()
    };
    let generated: FxHashMap<String, String> = page_images
        .iter()
        .map(|image| (image.page.clone(), image.image_url.clone()))
        .collect();
    assets.extend(page_images.into_iter().map(|image| image.asset));

    let (_index, entries) = split_index(posts, &config.blog.index)?;
    assets.push(build_feed(config, &entries, &generated)?);

    if config.poster.enable {
        let poster = render_poster(&config.poster, &fonts, &resolver)
            .await
            .context("failed to render social poster")?;
        assets.extend(poster);
    }

    Ok(assets)
}

async fn generate_page_images<F: Fetch>(
    config: &SiteConfig,
    posts: &[BlogPost],
    fonts: &Deferred<FontBufferSet>,
    resolver: &ImageResolver<F>,
) -> Result<Vec<PageImage>> {
    let classifier = CategoryClassifier::new(&config.og.categories, &config.og.default_category);
    let classify = |link: &str| classifier.classify(link);
    let base_url = config.site.canonical_url("");

    let request = OgImageRequest {
        base_url: &base_url,
        classify: &classify,
        resolver,
        fonts: fonts.get().await?,
        default_family: config.poster.default_family.as_deref(),
        template: &config.og.template,
        dir: &config.og.dir,
        width: config.og.width,
        max_chars_per_line: config.og.max_chars_per_line,
        overwrite_existing_meta: config.og.overwrite_existing_meta,
    };

    Ok(TemplatePageImages.generate(posts, &request).await?)
}
