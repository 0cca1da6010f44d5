//! Core types - pure abstractions shared across the codebase.

mod asset;
mod deferred;
mod error;

pub use asset::{AssetKind, RenderedAsset, write_assets};
pub use deferred::Deferred;
pub use error::{BuildError, Result};
