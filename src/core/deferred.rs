//! Deferred background loads.
//!
//! A [`Deferred`] starts its loader on the tokio runtime immediately and is
//! awaited only where the value is first needed. Later readers share the
//! same value; the loader never runs twice.

use super::{BuildError, Result};
use parking_lot::Mutex;
use std::future::Future;
use tokio::{sync::OnceCell, task::JoinHandle};

pub struct Deferred<T> {
    handle: Mutex<Option<JoinHandle<Result<T>>>>,
    value: OnceCell<T>,
}

impl<T: Send + Sync + 'static> Deferred<T> {
    /// Spawn `load` on the current runtime.
    pub fn spawn<F>(load: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            handle: Mutex::new(Some(tokio::spawn(load))),
            value: OnceCell::new(),
        }
    }

    /// Wrap an already available value.
    pub fn ready(value: T) -> Self {
        Self {
            handle: Mutex::new(None),
            value: OnceCell::new_with(Some(value)),
        }
    }

    /// Wait for the load to finish and borrow its value.
    pub async fn get(&self) -> Result<&T> {
        self.value
            .get_or_try_init(|| async {
                let handle = self.handle.lock().take().ok_or(BuildError::Consumed)?;
                handle.await?
            })
            .await
    }
}
