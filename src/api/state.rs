use crate::storage::StorageService;
use std::sync::Arc;

/// Shared handles available to every request handler.
pub struct ApiState {
    pub storage: Arc<dyn StorageService>,
}

impl ApiState {
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self { storage }
    }
}
