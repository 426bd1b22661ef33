//! reading-exp library - Experiences service
//!
//! Stores quiz attempts ("experiences") against reading topics and serves
//! them back scored.

use axum::Router;
use reading_common::api::TokenPolicy;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod scoring;

pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Internal token check for gated endpoints
    pub token_policy: TokenPolicy,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, token_policy: TokenPolicy) -> Self {
        Self { db, token_policy }
    }
}

/// Build application router
///
/// Token checks happen inside the handlers because the rejection status
/// differs per route (401 for listing, 403 for mutations).
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::experience_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
