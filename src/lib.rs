//! Service around the Black Forest Labs Flux image generation API
//!
//! Submits text prompts, polls task status on a fixed interval until an
//! image is ready, downloads the result, and persists it to local storage.
//! The persistence operations are also exposed over HTTP for display
//! front-ends.

pub mod api;
pub mod app;
pub mod error;
pub mod flux;
pub mod models;
pub mod poll;
pub mod storage;

pub use error::{Error, Result};
