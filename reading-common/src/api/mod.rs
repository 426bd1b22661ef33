//! API module for shared HTTP API functionality
//!
//! Provides the internal-token policy and the error payload shared by the
//! experiences service (reading-exp) and the AI service (reading-ai).
//!
//! This module contains ONLY pure functions and shared types. Each service
//! wraps them with its own Axum extractors and error responses.

pub mod auth;
pub mod types;

pub use auth::{TokenPolicy, INTERNAL_TOKEN_HEADER, INTERNAL_TOKEN_PARAM};
pub use types::{ErrorResponse, SuccessResponse};
