//! Configuration section definitions.
//!
//! Each module corresponds to sections in `tola-postbuild.toml`:
//!
//! | Module   | TOML Section                   | Purpose                        |
//! |----------|--------------------------------|--------------------------------|
//! | `site`   | `[site]`, `[package]`          | Canonical URLs, feed metadata  |
//! | `build`  | `[build]`, `[blog]`, `[feed]`  | Output dir, content, feed      |
//! | `poster` | `[poster]`, `[og]`             | Social images                  |

mod build;
mod poster;
mod site;

pub use build::{BlogConfig, BuildConfig, FeedConfig, FeedFormat};
pub use poster::{
    CategoryRule, JpegConfig, KnownImage, OgConfig, PosterConfig, PreviewConfig,
};
pub use site::{DEFAULT_HUB, PackageAuthor, PackageConfig, SiteInfoConfig};
