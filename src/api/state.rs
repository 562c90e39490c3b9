use std::sync::Arc;

use crate::{data::Catalog, services::recommendations::RecommendationEngine};

/// Shared application state
///
/// Everything here is read-only after startup, so plain `Arc` sharing is
/// enough: no writer exists once the server is up, and concurrent requests
/// need no locking.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub engine: Arc<RecommendationEngine>,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>, engine: Arc<RecommendationEngine>) -> Self {
        Self { catalog, engine }
    }
}
