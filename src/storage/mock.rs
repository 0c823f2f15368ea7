use super::StorageService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// In-memory store for tests. Records every URL passed to `store` and hands
/// out deterministic filenames.
#[derive(Clone)]
pub struct MockImageStore {
    stored_urls: Arc<Mutex<Vec<String>>>,
    filenames: Arc<Mutex<Vec<String>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockImageStore {
    pub fn new() -> Self {
        Self {
            stored_urls: Arc::new(Mutex::new(Vec::new())),
            filenames: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_store_count(&self) -> usize {
        self.stored_urls.lock().unwrap().len()
    }

    pub fn get_stored_urls(&self) -> Vec<String> {
        self.stored_urls.lock().unwrap().clone()
    }
}

impl Default for MockImageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageService for MockImageStore {
    async fn store(&self, url: &str) -> Result<String> {
        if *self.should_fail.lock().unwrap() {
            return Err(Error::Io(std::io::Error::other("Mock write failure")));
        }

        let mut urls = self.stored_urls.lock().unwrap();
        urls.push(url.to_string());

        let filename = format!("image_{}.png", urls.len());
        self.filenames.lock().unwrap().push(filename.clone());
        Ok(filename)
    }

    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.filenames.lock().unwrap().clone())
    }
}
