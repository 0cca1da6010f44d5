//! Per-page OG image generation.
//!
//! [`PageImages`] is the seam for "one image per page" generators. The
//! bundled [`TemplatePageImages`] fills an SVG template with the page's
//! category and wrapped title, then rasterizes every page in parallel.
//!
//! # Template slots
//!
//! | Slot           | Value                                   |
//! |----------------|-----------------------------------------|
//! | `{{category}}` | Label from the category classifier      |
//! | `{{line1}}`    | First title line                        |
//! | `{{line2}}`    | Second title line (may be empty)        |
//! | `{{line3}}`    | Remaining title text (may be empty)     |

use super::{
    fonts::FontBufferSet,
    render::{FitTo, ResolvedImages, collect_image_refs, render_png},
    resolve::{Fetch, ImageResolver},
    runtime::RenderRuntime,
};
use crate::{
    blog::BlogPost,
    config::CategoryRule,
    core::{AssetKind, BuildError, RenderedAsset, Result},
    debug, log,
    logger::ProgressLine,
    utils::html::{escape, find_element},
};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::{
    future::Future,
    path::{Path, PathBuf},
};

/// Title lines available in the template.
const TITLE_LINES: usize = 3;

/// Inputs handed to a page image generator.
pub struct OgImageRequest<'a, F: Fetch> {
    /// Absolute site URL with trailing slash, prefixed to image paths.
    pub base_url: &'a str,
    /// Page link to short category label.
    pub classify: &'a (dyn Fn(&str) -> String + Sync),
    pub resolver: &'a ImageResolver<F>,
    pub fonts: &'a FontBufferSet,
    pub default_family: Option<&'a str>,
    pub template: &'a Path,
    /// Output directory, relative to the output dir.
    pub dir: &'a Path,
    pub width: u32,
    pub max_chars_per_line: usize,
    /// Also render pages that already declare an OG image.
    pub overwrite_existing_meta: bool,
}

/// One generated page image.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// URL path of the page.
    pub page: String,
    /// Absolute URL of the image.
    pub image_url: String,
    pub asset: RenderedAsset,
}

pub trait PageImages {
    fn generate<F: Fetch>(
        &self,
        posts: &[BlogPost],
        request: &OgImageRequest<'_, F>,
    ) -> impl Future<Output = Result<Vec<PageImage>>>;
}

/// Template-driven [`PageImages`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplatePageImages;

impl PageImages for TemplatePageImages {
    async fn generate<F: Fetch>(
        &self,
        posts: &[BlogPost],
        request: &OgImageRequest<'_, F>,
    ) -> Result<Vec<PageImage>> {
        let template = tokio::fs::read_to_string(request.template)
            .await
            .map_err(|e| BuildError::io(request.template, e))?;

        // Untitled pages (the blog index) have nothing to render
        let pages: Vec<&BlogPost> = posts
            .iter()
            .filter(|post| !post.title.is_empty())
            .filter(|post| request.overwrite_existing_meta || !has_og_meta(post.html.as_deref()))
            .collect();
        let skipped = posts.len() - pages.len();
        if skipped > 0 {
            debug!("og"; "{skipped} pages skipped (untitled or existing OG image)");
        }
        if pages.is_empty() {
            return Ok(Vec::new());
        }

        // Template images are shared by every page; resolve them once
        let images =
            ResolvedImages::resolve(&collect_image_refs(&template), request.resolver).await?;
        let runtime = RenderRuntime::initialize(request.fonts, request.default_family);

        let slugs = unique_slugs(pages.iter().map(|post| post.url.as_str()));
        let jobs: Vec<PageJob> = pages
            .iter()
            .zip(slugs)
            .map(|(post, slug)| PageJob::new(post, &slug, &template, request))
            .collect();

        let source = request.template.to_path_buf();
        let fit = FitTo::Width(request.width);
        let generated = tokio::task::spawn_blocking(move || {
            render_pages(jobs, &source, &images, fit, runtime)
        })
        .await??;

        log!("og"; "{} page images", generated.len());
        Ok(generated)
    }
}

/// One page, filled in and ready to rasterize.
struct PageJob {
    page: String,
    svg: String,
    dest: PathBuf,
    image_url: String,
}

impl PageJob {
    fn new<F: Fetch>(
        post: &BlogPost,
        slug: &str,
        template: &str,
        request: &OgImageRequest<'_, F>,
    ) -> Self {
        let category = (request.classify)(&post.url);
        let lines = wrap_title(&post.title, request.max_chars_per_line);

        let dest = request.dir.join(format!("{slug}.png"));
        let image_url = format!(
            "{}{}",
            request.base_url,
            dest.to_string_lossy().replace('\\', "/")
        );

        Self {
            page: post.url.clone(),
            svg: fill_template(template, &category, &lines),
            dest,
            image_url,
        }
    }
}

/// Rasterize every job in parallel. Output order follows `jobs`.
fn render_pages(
    jobs: Vec<PageJob>,
    source: &Path,
    images: &ResolvedImages,
    fit: FitTo,
    runtime: &RenderRuntime,
) -> Result<Vec<PageImage>> {
    let progress = ProgressLine::new("og", &[("pages", jobs.len())]);
    let generated = jobs
        .into_par_iter()
        .map(|job| {
            let png = render_png(&job.svg, source, images, fit, runtime)?;
            progress.inc("pages");
            Ok(PageImage {
                page: job.page,
                image_url: job.image_url,
                asset: RenderedAsset::new(AssetKind::Raster, job.dest, png),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    progress.finish();
    Ok(generated)
}

/// Whether the page head already carries an OG image, under either the
/// `property` or the `name` attribute.
fn has_og_meta(html: Option<&str>) -> bool {
    find_element(html, |el| {
        el.tag == "meta"
            && (el.attr("property") == Some("og:image") || el.attr("name") == Some("og:image"))
    })
    .is_some()
}

// ============================================================================
// Category classification
// ============================================================================

/// Longest-prefix category rules with a default label.
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    rules: Vec<CategoryRule>,
    default: String,
}

impl CategoryClassifier {
    pub fn new(rules: &[CategoryRule], default: &str) -> Self {
        let mut rules = rules.to_vec();
        // Longest prefix first; stable so equal lengths keep config order
        rules.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Self {
            rules,
            default: default.to_owned(),
        }
    }

    pub fn classify(&self, link: &str) -> String {
        self.rules
            .iter()
            .find(|rule| link.starts_with(&rule.prefix))
            .map_or_else(|| self.default.clone(), |rule| rule.label.clone())
    }
}

// ============================================================================
// Template filling
// ============================================================================

/// Greedy word wrap into at most [`TITLE_LINES`] lines.
///
/// Words never split; text past the last line is folded into it.
pub fn wrap_title(title: &str, max_chars: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in title.split_whitespace() {
        let fits = current.is_empty()
            || current.chars().count() + 1 + word.chars().count() <= max_chars;
        if fits || lines.len() == TITLE_LINES - 1 {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn fill_template(template: &str, category: &str, lines: &[String]) -> String {
    let mut svg = template.replace("{{category}}", &escape(category));
    for slot in 0..TITLE_LINES {
        let line = lines.get(slot).map(String::as_str).unwrap_or_default();
        svg = svg.replace(&format!("{{{{line{}}}}}", slot + 1), &escape(line));
    }
    svg
}

/// One file stem per URL, in order.
///
/// URLs that fold to the same slug (`/blog/a-b`, `/blog/a/b`) keep the first
/// one as is; later ones get `-2`, `-3`, ... appended.
pub fn unique_slugs<'a>(urls: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = FxHashSet::default();
    urls.into_iter()
        .map(|url| {
            let base = page_slug(url);
            let mut slug = base.clone();
            let mut n = 2;
            while !taken.insert(slug.clone()) {
                slug = format!("{base}-{n}");
                n += 1;
            }
            if slug != base {
                debug!("og"; "`{url}` shares slug `{base}`, using `{slug}`");
            }
            slug
        })
        .collect()
}

/// File stem for a page URL: ASCII, lowercase, `-` separated.
pub fn page_slug(url: &str) -> String {
    let ascii = deunicode::deunicode(url.trim_matches('/'));
    let slug = ascii
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() { "index".into() } else { slug }
}
