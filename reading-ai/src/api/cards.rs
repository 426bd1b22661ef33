//! POST /ai-service/notebook/card

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use reading_common::api::SuccessResponse;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::flashcards::{effective_count, generate_flashcards, Flashcard};
use crate::AppState;

const MISSING_CONTENT: &str = "Missing required field: content";

#[derive(Debug, Deserialize)]
pub struct CardRequest {
    pub content: Option<String>,
    /// Anything other than a positive integer falls back to the default
    pub count: Option<Value>,
}

/// Turn notebook content into flashcards
pub async fn create_cards(
    State(state): State<AppState>,
    body: Result<Json<CardRequest>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse<Vec<Flashcard>>>> {
    let Json(request) = body.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected flashcard body");
        ApiError::BadRequest(MISSING_CONTENT.to_string())
    })?;

    let content = request
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(MISSING_CONTENT.to_string()))?;

    let count = effective_count(request.count.as_ref().and_then(Value::as_i64));

    let cards = generate_flashcards(state.backend.as_ref(), &content, count)
        .await
        .map_err(|source| ApiError::Backend {
            error: "Failed to generate flashcards".to_string(),
            source,
        })?;

    Ok(Json(SuccessResponse::new(cards)))
}

pub fn card_routes() -> Router<AppState> {
    Router::new().route("/ai-service/notebook/card", post(create_cards))
}
