//! Local persistence for generated images
//!
//! Downloads finished images from their sample URL and keeps them in a
//! flat directory for later display.

pub mod mock;
pub mod store;

pub use mock::MockImageStore;
pub use store::LocalImageStore;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Fetch the image at `url` and persist it, returning the stored
    /// filename.
    async fn store(&self, url: &str) -> Result<String>;

    /// List previously stored filenames. An absent storage directory is an
    /// empty list, not an error.
    async fn list(&self) -> Result<Vec<String>>;
}
