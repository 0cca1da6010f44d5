//! Blog section content.
//!
//! Rendered items arrive as a JSON manifest from the content loader, are
//! validated and sorted here, then consumed by per-page OG image generation
//! and the feed synthesizer.

mod collect;
mod post;

pub use collect::{collect_posts, compare_posts, load_manifest, split_index};
pub use post::{Author, BlogPost, CategoryField, FrontMatter, RawPost};
