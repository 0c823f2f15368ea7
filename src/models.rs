//! Data models and structures
//!
//! Defines the request/response types exchanged with the Flux API, the
//! wire types of the persistence API, and the environment configuration.

use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Fixed output width for every generation request.
pub const IMAGE_WIDTH: u32 = 1024;
/// Fixed output height for every generation request.
pub const IMAGE_HEIGHT: u32 = 768;
/// Fixed moderation tolerance passed to the service.
pub const SAFETY_TOLERANCE: u32 = 2;

const SEED_MAX: u32 = 1_000_000;

/// One generation job as submitted to the Flux API. Built once per
/// submission and immutable afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    pub prompt_upsampling: bool,
    pub seed: u32,
    pub safety_tolerance: u32,
}

impl GenerationRequest {
    /// Build a request for `prompt` with the fixed dimensions and a freshly
    /// drawn random seed.
    pub fn new(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            width: IMAGE_WIDTH,
            height: IMAGE_HEIGHT,
            prompt_upsampling: false,
            seed: rand::thread_rng().gen_range(0..SEED_MAX),
            safety_tolerance: SAFETY_TOLERANCE,
        }
    }
}

/// Response to a submission. The id is optional so a malformed payload can
/// be reported as such instead of failing deserialization.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub id: Option<String>,
}

/// Status string the service reports for a finished task.
pub const STATUS_READY: &str = "Ready";
/// Status string the service reports while a task is still being worked on.
pub const STATUS_PENDING: &str = "Pending";

#[derive(Debug, Clone, Deserialize)]
pub struct TaskStatus {
    pub status: String,
    #[serde(default)]
    pub result: Option<TaskResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskResult {
    #[serde(default)]
    pub sample: Option<String>,
}

impl TaskStatus {
    pub fn ready(sample: &str) -> Self {
        Self {
            status: STATUS_READY.to_string(),
            result: Some(TaskResult {
                sample: Some(sample.to_string()),
            }),
        }
    }

    pub fn pending() -> Self {
        Self {
            status: STATUS_PENDING.to_string(),
            result: None,
        }
    }
}

// Persistence API wire types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveImageRequest {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveImageResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageListResponse {
    pub images: Vec<String>,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base_url: String,
    pub images_dir: PathBuf,
    pub listen_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr = match std::env::var("LISTEN_ADDR") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| crate::Error::Config(format!("Invalid LISTEN_ADDR: {}", raw)))?,
            Err(_) => SocketAddr::from(([127, 0, 0, 1], 3000)),
        };

        Ok(Self {
            api_key: std::env::var("FLUX_API_KEY")
                .map_err(|_| crate::Error::Config("FLUX_API_KEY not set".to_string()))?,
            api_base_url: std::env::var("FLUX_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.bfl.ml".to_string()),
            images_dir: std::env::var("IMAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public/images")),
            listen_addr,
        })
    }
}
