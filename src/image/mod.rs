//! Social preview images.
//!
//! # Modules
//!
//! - [`fonts`]: font buffers loaded once per build
//! - [`runtime`]: process-wide font database
//! - [`resolve`]: embedded image resolution (local cache, then network)
//! - [`render`]: SVG rasterization
//! - [`convert`]: JPEG / AVIF derivatives
//! - [`poster`]: the site-wide poster
//! - [`og`]: per-page OG images

pub mod convert;
pub mod fonts;
pub mod og;
pub mod poster;
pub mod render;
pub mod resolve;
pub mod runtime;

pub use fonts::FontBufferSet;
pub use og::{CategoryClassifier, OgImageRequest, PageImage, PageImages, TemplatePageImages};
pub use poster::render_poster;
pub use resolve::{HttpFetch, ImageResolver, LocalImages, load_local_images};
