use super::GenerationService;
use crate::models::{GenerationRequest, TaskStatus};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted generation service for tests. Submit and status responses are
/// consumed in the order they were queued; an empty status queue behaves
/// like a task the service never learns about (not found).
#[derive(Clone)]
pub struct MockFluxClient {
    submit_responses: Arc<Mutex<VecDeque<Result<String>>>>,
    status_responses: Arc<Mutex<VecDeque<Result<TaskStatus>>>>,
    submit_count: Arc<Mutex<usize>>,
    status_count: Arc<Mutex<usize>>,
}

impl MockFluxClient {
    pub fn new() -> Self {
        Self {
            submit_responses: Arc::new(Mutex::new(VecDeque::new())),
            status_responses: Arc::new(Mutex::new(VecDeque::new())),
            submit_count: Arc::new(Mutex::new(0)),
            status_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_submit_response(self, task_id: &str) -> Self {
        self.submit_responses
            .lock()
            .unwrap()
            .push_back(Ok(task_id.to_string()));
        self
    }

    pub fn with_submit_error(self, error: Error) -> Self {
        self.submit_responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_status_response(self, status: TaskStatus) -> Self {
        self.status_responses.lock().unwrap().push_back(Ok(status));
        self
    }

    pub fn with_status_not_found(self) -> Self {
        self.status_responses
            .lock()
            .unwrap()
            .push_back(Err(Error::TaskNotFound));
        self
    }

    pub fn with_status_error(self, error: Error) -> Self {
        self.status_responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn get_submit_count(&self) -> usize {
        *self.submit_count.lock().unwrap()
    }

    pub fn get_status_count(&self) -> usize {
        *self.status_count.lock().unwrap()
    }
}

impl Default for MockFluxClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationService for MockFluxClient {
    async fn submit(&self, _request: &GenerationRequest) -> Result<String> {
        let mut count = self.submit_count.lock().unwrap();
        *count += 1;

        match self.submit_responses.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Ok("mock-task".to_string()),
        }
    }

    async fn get_result(&self, _task_id: &str) -> Result<TaskStatus> {
        let mut count = self.status_count.lock().unwrap();
        *count += 1;

        match self.status_responses.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Err(Error::TaskNotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::STATUS_READY;

    #[tokio::test]
    async fn test_mock_flux_client_scripted_responses() {
        let client = MockFluxClient::new()
            .with_submit_response("t1")
            .with_status_not_found()
            .with_status_response(TaskStatus::ready("https://x/img.png"));

        let id = client
            .submit(&GenerationRequest::new("a red fox"))
            .await
            .unwrap();
        assert_eq!(id, "t1");

        let first = client.get_result("t1").await.unwrap_err();
        assert!(matches!(first, Error::TaskNotFound));

        let second = client.get_result("t1").await.unwrap();
        assert_eq!(second.status, STATUS_READY);

        assert_eq!(client.get_submit_count(), 1);
        assert_eq!(client.get_status_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_flux_client_defaults_to_not_found() {
        let client = MockFluxClient::new();

        let err = client.get_result("unknown").await.unwrap_err();
        assert!(matches!(err, Error::TaskNotFound));
    }
}
