//! Flux API integration for image generation
//!
//! Provides the client for submitting generation requests and querying
//! task status against the Black Forest Labs Flux API.

pub mod client;
pub mod mock;

pub use client::FluxClient;
pub use mock::MockFluxClient;

use crate::models::{GenerationRequest, TaskStatus};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Submit a generation request, returning the task id issued by the
    /// service.
    async fn submit(&self, request: &GenerationRequest) -> Result<String>;

    /// Query the current status of a task. Returns
    /// [`Error::TaskNotFound`](crate::Error::TaskNotFound) while the task
    /// is not yet visible to the status endpoint.
    async fn get_result(&self, task_id: &str) -> Result<TaskStatus>;
}
