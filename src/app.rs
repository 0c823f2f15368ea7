//! Application orchestration: submission, polling, and persistence.

use crate::flux::{FluxClient, GenerationService};
use crate::models::{Config, GenerationRequest};
use crate::poll::{Poller, POLL_INTERVAL};
use crate::storage::{LocalImageStore, StorageService};
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Coordinates one generation flow: submit the prompt, poll the task until
/// it is ready, then hand the sample URL to storage.
pub struct App {
    generation: Arc<dyn GenerationService>,
    storage: Arc<dyn StorageService>,
    poll_interval: Duration,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub generation: Arc<dyn GenerationService>,
    pub storage: Arc<dyn StorageService>,
}

/// Result of one completed generation flow. A failed save does not discard
/// the generated image; the sample URL stays usable and the save error is
/// reported alongside it.
#[derive(Debug)]
pub struct Generated {
    pub task_id: String,
    pub sample_url: String,
    pub filename: Option<String>,
    pub save_error: Option<String>,
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices) -> Self {
        Self {
            generation: services.generation,
            storage: services.storage,
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Construct an app from environment configuration.
    pub fn new(config: &Config) -> Self {
        // Reuse one HTTP connection pool across the API client and storage.
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        let generation = FluxClient::new_with_client(config.api_key.clone(), http_client.clone())
            .with_base_url(config.api_base_url.clone());
        let storage = LocalImageStore::new_with_client(&config.images_dir, http_client);

        Self::with_services(AppServices {
            generation: Arc::new(generation),
            storage: Arc::new(storage),
        })
    }

    /// Run one full generation flow for `prompt`.
    pub async fn generate(&self, prompt: &str) -> Result<Generated> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(Error::EmptyPrompt);
        }

        info!("Initiating image generation");
        let request = GenerationRequest::new(prompt);
        let task_id = self.generation.submit(&request).await?;
        info!("Task created with ID: {}", task_id);

        let poller =
            Poller::new(Arc::clone(&self.generation)).with_interval(self.poll_interval);
        let sample_url = poller.run(&task_id).await?;
        info!("Image generation completed");

        match self.storage.store(&sample_url).await {
            Ok(filename) => Ok(Generated {
                task_id,
                sample_url,
                filename: Some(filename),
                save_error: None,
            }),
            Err(e) => {
                error!("Error saving image: {}", e);
                Ok(Generated {
                    task_id,
                    sample_url,
                    filename: None,
                    save_error: Some("Failed to save image".to_string()),
                })
            }
        }
    }

    /// Filenames of all previously saved images.
    pub async fn saved_images(&self) -> Result<Vec<String>> {
        self.storage.list().await
    }
}
