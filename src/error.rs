//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.
//! Remote failures are classified at the boundary that raised them: a
//! connectivity failure is distinct from a server-reported error, and a
//! missing task on the status endpoint is distinct from both.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No response received from the remote side at all.
    #[error("No response received from the server: {0}")]
    Transport(String),

    /// The server responded with a non-success status.
    #[error("Server error: {status} - {body}")]
    Api { status: u16, body: String },

    /// The status endpoint does not know the task yet. Retryable.
    #[error("Task not found")]
    TaskNotFound,

    #[error("Task not found after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    /// A required field was absent or a payload failed to decode.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The poll loop was disposed before the task reached a terminal state.
    #[error("Generation cancelled")]
    Cancelled,

    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::MalformedResponse(err.to_string())
        } else {
            Error::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
