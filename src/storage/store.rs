use super::StorageService;
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Writes fetched images into a flat directory, named by the epoch
/// millisecond at which they were stored.
pub struct LocalImageStore {
    client: Client,
    images_dir: PathBuf,
}

impl LocalImageStore {
    pub fn new(images_dir: &Path) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self::new_with_client(images_dir, client)
    }

    pub fn new_with_client(images_dir: &Path, client: Client) -> Self {
        Self {
            client,
            images_dir: images_dir.to_path_buf(),
        }
    }
}

#[async_trait]
impl StorageService for LocalImageStore {
    async fn store(&self, url: &str) -> Result<String> {
        // Fetch before touching the filesystem so a failed download leaves
        // nothing behind.
        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::error!("Failed to fetch image from {}: {}", url, e);
            Error::from(e)
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Image fetch error (status {}): {}", status, body);
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;

        fs::create_dir_all(&self.images_dir)?;

        let filename = format!("image_{}.png", Utc::now().timestamp_millis());
        let filepath = self.images_dir.join(&filename);
        fs::write(&filepath, &bytes)?;

        tracing::info!("Saved image to {}", filepath.display());
        Ok(filename)
    }

    async fn list(&self) -> Result<Vec<String>> {
        if !self.images_dir.exists() {
            return Ok(Vec::new());
        }

        let mut images = Vec::new();
        for entry in fs::read_dir(&self.images_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                images.push(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(images)
    }
}
