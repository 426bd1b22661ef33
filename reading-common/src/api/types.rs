//! Shared API response types
//!
//! Both services render every error as `{"error": ..., "details": ...}`,
//! with `details` omitted when there is nothing to add. Mutations and AI
//! calls wrap their payload as `{"success": true, "data": ...}`.

use serde::{Deserialize, Serialize};

/// Uniform error payload
///
/// # Examples
///
/// ```
/// use reading_common::api::types::ErrorResponse;
///
/// let error = ErrorResponse::with_details(
///     "experiences lookup error",
///     "no such table: experiences",
/// );
/// assert_eq!(error.details.as_deref(), Some("no such table: experiences"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Underlying cause, when one is worth exposing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Create error payload without details
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    /// Create error payload with details
    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Success envelope used by mutating and AI endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
