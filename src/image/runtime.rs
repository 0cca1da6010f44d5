//! Process-wide rendering runtime.
//!
//! The font database is built once from the shared [`FontBufferSet`].
//! [`RenderRuntime::initialize`] is idempotent: later calls return the
//! instance created by the first one.

use super::fonts::FontBufferSet;
use crate::debug;
use std::sync::{Arc, OnceLock};
use usvg::fontdb::Database;

/// Generic family used when neither the caller nor the fonts name one.
const FALLBACK_FAMILY: &str = "sans-serif";

static RUNTIME: OnceLock<RenderRuntime> = OnceLock::new();

#[derive(Debug)]
pub struct RenderRuntime {
    fontdb: Arc<Database>,
    default_family: String,
}

impl RenderRuntime {
    /// Build a standalone runtime.
    ///
    /// `default_family` falls back to the first loaded face's family.
    pub fn new(fonts: &FontBufferSet, default_family: Option<&str>) -> Self {
        let mut db = fonts.database();

        let default_family = default_family
            .map(str::to_owned)
            .or_else(|| {
                db.faces()
                    .next()
                    .and_then(|face| face.families.first())
                    .map(|(name, _)| name.clone())
            })
            .unwrap_or_else(|| FALLBACK_FAMILY.to_owned());

        // Generic `sans-serif` lookups land on the bundled family too
        db.set_sans_serif_family(default_family.clone());

        debug!("runtime"; "{} font faces, default family `{}`", db.len(), default_family);
        Self {
            fontdb: Arc::new(db),
            default_family,
        }
    }

    /// Initialize the process-wide runtime, or return the existing one.
    pub fn initialize(fonts: &FontBufferSet, default_family: Option<&str>) -> &'static Self {
        if let Some(runtime) = RUNTIME.get() {
            debug!("runtime"; "already initialized, reusing");
            return runtime;
        }
        RUNTIME.get_or_init(|| Self::new(fonts, default_family))
    }

    pub fn fontdb(&self) -> Arc<Database> {
        Arc::clone(&self.fontdb)
    }

    pub fn default_family(&self) -> &str {
        &self.default_family
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_is_idempotent() {
        let first = RenderRuntime::initialize(&FontBufferSet::default(), Some("Inter"));
        let second = RenderRuntime::initialize(&FontBufferSet::default(), Some("Other"));
        assert!(std::ptr::eq(first, second));
        assert_eq!(second.default_family(), first.default_family());
    }

    #[test]
    fn test_default_family_fallback() {
        let runtime = RenderRuntime::new(&FontBufferSet::default(), None);
        assert_eq!(runtime.default_family(), FALLBACK_FAMILY);

        let runtime = RenderRuntime::new(&FontBufferSet::default(), Some("Inter"));
        assert_eq!(runtime.default_family(), "Inter");
        assert_eq!(runtime.fontdb().len(), 0);
    }
}
