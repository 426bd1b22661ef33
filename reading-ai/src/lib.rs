//! reading-ai library - AI reading assistant service
//!
//! Book analysis and flashcard generation backed by a generative model.

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod flashcards;
pub mod gemini;

pub use crate::error::{AiError, ApiError, ApiResult};

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::gemini::GenerativeBackend;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Model backend (Gemini in production)
    pub backend: Arc<dyn GenerativeBackend>,
    /// Service startup time for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            backend,
            started_at: Instant::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::book_routes())
        .merge(api::card_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
