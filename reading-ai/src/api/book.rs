//! POST /ai-service/book

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use reading_common::api::SuccessResponse;
use serde::Deserialize;

use crate::analysis::{analyze_book, AnalysisResult};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

const MISSING_FIELDS: &str = "Missing required fields: title and author";

#[derive(Debug, Deserialize)]
pub struct BookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Analyze a book by title and author
///
/// Always 200 once the request is valid; model failures are replaced by the
/// fallback analysis.
pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<BookRequest>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse<AnalysisResult>>> {
    let Json(request) = body.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected book body");
        ApiError::BadRequest(MISSING_FIELDS.to_string())
    })?;

    let (Some(title), Some(author)) = (required(request.title), required(request.author)) else {
        return Err(ApiError::BadRequest(MISSING_FIELDS.to_string()));
    };

    let analysis = match analyze_book(state.backend.as_ref(), &title, &author).await {
        Ok(analysis) => analysis,
        Err(never) => match never {},
    };

    Ok(Json(SuccessResponse::new(analysis)))
}

pub fn book_routes() -> Router<AppState> {
    Router::new().route("/ai-service/book", post(analyze))
}
