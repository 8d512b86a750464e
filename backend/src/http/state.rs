//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::MeasurementRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Store handle injected by the process entry point
    pub repository: Arc<dyn MeasurementRepository>,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn MeasurementRepository>) -> Self {
        Self { repository }
    }
}
