//! Font buffers shared by every rasterization call.

use crate::core::{BuildError, Result};
use crate::debug;
use std::{path::PathBuf, sync::Arc};
use usvg::fontdb::Database;

/// Ordered font byte buffers, loaded once per build.
#[derive(Debug, Clone, Default)]
pub struct FontBufferSet {
    buffers: Vec<Arc<Vec<u8>>>,
}

impl FontBufferSet {
    /// Read every font file, keeping the given order.
    ///
    /// A missing or unreadable font is fatal; silently falling back to
    /// another face would change the rendered output.
    pub async fn load(paths: Vec<PathBuf>) -> Result<Self> {
        let mut buffers = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| BuildError::io(&path, e))?;
            debug!("fonts"; "loaded {} ({} bytes)", path.display(), bytes.len());
            buffers.push(Arc::new(bytes));
        }
        Ok(Self { buffers })
    }

    pub fn buffers(&self) -> &[Arc<Vec<u8>>] {
        &self.buffers
    }

    /// Build a font database from these buffers only. System fonts are
    /// never consulted.
    pub fn database(&self) -> Database {
        let mut db = Database::new();
        for buffer in &self.buffers {
            db.load_font_data(buffer.as_ref().clone());
        }
        db
    }
}
