// src/state.rs
use std::sync::Arc;

use axum::http::HeaderValue;

use crate::services::generator::TextGenerator;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub generator: Arc<dyn TextGenerator>,
    pub allowed_origins: Vec<HeaderValue>,
}

impl AppState {
    pub fn new(generator: Arc<dyn TextGenerator>, allowed_origins: Vec<HeaderValue>) -> Self {
        Self {
            generator,
            allowed_origins,
        }
    }

    pub fn origin_allowed(&self, origin: &HeaderValue) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }
}
