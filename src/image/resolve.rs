//! Embedded image resolution.
//!
//! Two tiers: the local cache of known URLs (bundled files read at startup),
//! then a network fetch. Fetched bytes are not cached; each distinct URL in a
//! template is resolved once per render.

use crate::{
    config::KnownImage,
    core::{BuildError, Deferred, Result},
    debug, log,
};
use rustc_hash::FxHashMap;
use std::{future::Future, sync::Arc};

/// Known URL to bundled bytes.
pub type LocalImages = FxHashMap<String, Arc<Vec<u8>>>;

/// Network fallback for URLs missing from the local cache.
pub trait Fetch: Send + Sync {
    /// Fetch `url`; any failure, including a non-success status, is fatal.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// [`Fetch`] over HTTP(S).
#[derive(Debug, Clone, Default)]
pub struct HttpFetch {
    client: reqwest::Client,
}

impl Fetch for HttpFetch {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let fetch_err = |source| BuildError::Fetch {
            url: url.to_owned(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(fetch_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(BuildError::HttpStatus {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(fetch_err)?;
        Ok(bytes.to_vec())
    }
}

/// Read every known image from disk.
pub async fn load_local_images(images: Vec<KnownImage>) -> Result<LocalImages> {
    let mut local = LocalImages::default();
    for image in images {
        let bytes = tokio::fs::read(&image.path)
            .await
            .map_err(|e| BuildError::io(&image.path, e))?;
        debug!("resolve"; "{} -> {}", image.url, image.path.display());
        local.insert(image.url, Arc::new(bytes));
    }
    Ok(local)
}

pub struct ImageResolver<F = HttpFetch> {
    local: Deferred<LocalImages>,
    fetch: F,
}

impl<F: Fetch> ImageResolver<F> {
    pub fn with_fetch(local: Deferred<LocalImages>, fetch: F) -> Self {
        Self { local, fetch }
    }

    /// Resolve one URL: local cache first, then the network.
    ///
    /// The local cache is awaited here, on first use.
    pub async fn resolve(&self, url: &str) -> Result<Arc<Vec<u8>>> {
        let local = self.local.get().await?;
        if let Some(bytes) = local.get(url) {
            debug!("resolve"; "local {url}");
            return Ok(Arc::clone(bytes));
        }

        log!("fetch"; "{url}");
        let bytes = self.fetch.fetch(url).await?;
        Ok(Arc::new(bytes))
    }
}
