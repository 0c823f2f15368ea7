use super::GenerationService;
use crate::models::{GenerationRequest, SubmitResponse, TaskStatus};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.bfl.ml";

/// HTTP client for the Flux generation endpoints. Authenticates every call
/// with the `x-key` header.
pub struct FluxClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FluxClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self::new_with_client(api_key, client)
    }

    pub fn new_with_client(api_key: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn error_from_response(response: reqwest::Response) -> Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!("Flux API error (status {}): {}", status, body);
        Error::Api {
            status: status.as_u16(),
            body,
        }
    }
}

#[async_trait]
impl GenerationService for FluxClient {
    async fn submit(&self, request: &GenerationRequest) -> Result<String> {
        tracing::debug!("Submitting generation request to Flux");

        let response = self
            .client
            .post(format!("{}/v1/flux-pro-1.1", self.base_url))
            .header("x-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send generation request: {}", e);
                Error::from(e)
            })?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let submit: SubmitResponse = response.json().await?;

        submit
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::MalformedResponse("No task ID in the response".to_string()))
    }

    async fn get_result(&self, task_id: &str) -> Result<TaskStatus> {
        let response = self
            .client
            .get(format!("{}/v1/get_result", self.base_url))
            .query(&[("id", task_id)])
            .header("x-key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send status request: {}", e);
                Error::from(e)
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("Task {} not yet visible to the status endpoint", task_id);
            return Err(Error::TaskNotFound);
        }

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(response.json().await?)
    }
}
