//! Timer-driven polling of in-flight generation tasks
//!
//! One task handle is checked on a fixed delay until the service reports it
//! ready or a terminal error occurs. The only retryable condition is the
//! status endpoint not knowing the task yet, capped at a fixed number of
//! attempts. All transition logic lives in [`PollState::apply`]; the async
//! driver [`Poller::run`] owns the timer and the cancellation token.

use crate::flux::GenerationService;
use crate::models::{TaskStatus, STATUS_PENDING, STATUS_READY};
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Delay between consecutive status checks.
pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);
/// Maximum consecutive not-found responses tolerated for one task.
pub const MAX_NOT_FOUND_RETRIES: u32 = 10;

/// Mutable state carried across status checks for one task handle. The
/// retry counter only tracks consecutive not-found responses; any response
/// the service actually answered resets it.
#[derive(Debug, Default)]
pub struct PollState {
    retry_count: u32,
    last_status: Option<String>,
}

/// Decision produced by interpreting one status response.
#[derive(Debug)]
pub enum Transition {
    /// Re-arm the delay timer and check again.
    Polling,
    /// Terminal success; carries the sample URL of the generated image.
    Succeeded(String),
    /// Terminal failure.
    Failed(Error),
}

impl PollState {
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn last_status(&self) -> Option<&str> {
        self.last_status.as_deref()
    }

    /// Fold one status response into the state and decide what happens next.
    pub fn apply(&mut self, response: Result<TaskStatus>) -> Transition {
        match response {
            Ok(status) => {
                self.retry_count = 0;
                self.last_status = Some(status.status.clone());

                match status.status.as_str() {
                    STATUS_READY => match status.result {
                        Some(result) => match result.sample {
                            Some(sample) => Transition::Succeeded(sample),
                            None => Transition::Failed(Error::MalformedResponse(
                                "Image URL not found in the response".to_string(),
                            )),
                        },
                        None => Transition::Failed(Error::MalformedResponse(
                            "Result object not found in the response".to_string(),
                        )),
                    },
                    STATUS_PENDING => Transition::Polling,
                    other => Transition::Failed(Error::MalformedResponse(format!(
                        "Invalid status: {}",
                        other
                    ))),
                }
            }
            Err(Error::TaskNotFound) => {
                if self.retry_count < MAX_NOT_FOUND_RETRIES {
                    self.retry_count += 1;
                    Transition::Polling
                } else {
                    Transition::Failed(Error::RetriesExhausted {
                        attempts: MAX_NOT_FOUND_RETRIES,
                    })
                }
            }
            Err(e) => Transition::Failed(e),
        }
    }
}

/// Progress snapshot published after every non-terminal check.
#[derive(Debug, Clone)]
pub struct PollUpdate {
    pub retry_count: u32,
    pub message: String,
}

/// Drives the status checks for one task until a terminal state. Dropping
/// the poller or cancelling its token while the delay timer is pending
/// prevents the next check from running.
pub struct Poller {
    service: Arc<dyn GenerationService>,
    interval: Duration,
    cancel: CancellationToken,
    updates: Option<mpsc::UnboundedSender<PollUpdate>>,
}

impl Poller {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self {
            service,
            interval: POLL_INTERVAL,
            cancel: CancellationToken::new(),
            updates: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Publish retry-count snapshots to `updates` after every re-armed check.
    pub fn with_updates(mut self, updates: mpsc::UnboundedSender<PollUpdate>) -> Self {
        self.updates = Some(updates);
        self
    }

    /// Token an owner can use to tear the loop down from outside.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn publish(&self, state: &PollState, message: String) {
        if let Some(updates) = &self.updates {
            // Receiver gone is fine; progress reporting is best-effort.
            let _ = updates.send(PollUpdate {
                retry_count: state.retry_count(),
                message,
            });
        }
    }

    /// Poll `task_id` until it reaches a terminal state. Returns the sample
    /// URL of the generated image on success.
    pub async fn run(&self, task_id: &str) -> Result<String> {
        let mut state = PollState::default();

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!("Poll loop for task {} cancelled while timer pending", task_id);
                    return Err(Error::Cancelled);
                }
                _ = tokio::time::sleep(self.interval) => {}
            }

            let response = self.service.get_result(task_id).await;

            // A check that was already in flight when the owner went away
            // must not publish its result.
            if self.cancel.is_cancelled() {
                debug!("Discarding status response for cancelled task {}", task_id);
                return Err(Error::Cancelled);
            }

            match state.apply(response) {
                Transition::Polling => {
                    let message = if state.retry_count() > 0 {
                        format!(
                            "Task not found (attempt {}/{}), retrying in {} seconds...",
                            state.retry_count(),
                            MAX_NOT_FOUND_RETRIES,
                            self.interval.as_secs()
                        )
                    } else {
                        format!(
                            "Task pending, checking again in {} seconds...",
                            self.interval.as_secs()
                        )
                    };
                    info!("{}", message);
                    self.publish(&state, message);
                }
                Transition::Succeeded(sample) => {
                    info!("Task {} ready, image at {}", task_id, sample);
                    return Ok(sample);
                }
                Transition::Failed(e) => {
                    warn!("Task {} failed: {}", task_id, e);
                    return Err(e);
                }
            }
        }
    }
}
