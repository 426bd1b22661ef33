//! Experience endpoints
//!
//! - `GET /experiences?openid=` lists a user's experiences (401 on token)
//! - `GET /experiences/:id` returns one scored experience (not gated)
//! - `POST /experiences` saves answers as a new experience (403 on token)
//! - `PUT /experiences/:id/paid` marks an experience paid (403 on token)

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use reading_common::api::SuccessResponse;
use reading_common::human_time::time_ago_from_now;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::auth::ProvidedToken;
use crate::db::models::{ExperienceBase, NewReply, SavedExperience};
use crate::db::{experiences, users};
use crate::error::{ApiError, ApiResult};
use crate::models::{ExperienceListItem, ExperienceListResponse, ExperienceResponse};
use crate::scoring::score_experience;
use crate::AppState;

const FORBIDDEN: &str = "Forbidden: Invalid or missing internal token";
const REQUIRED_FIELDS: &str = "Bad Request: topic_id, openid and answers are required";
const INVALID_TOPIC_ID: &str = "Bad Request: topic_id must be a valid number";
const EMPTY_ANSWERS: &str = "Bad Request: answers must be a non-empty array";
const INVALID_ANSWER: &str = "Bad Request: each answer must have question_id and check";
const INVALID_EXPERIENCE_ID: &str = "Bad Request: experience ID must be a valid number";

/// Query parameters for the listing
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub openid: Option<String>,
}

/// GET /experiences
pub async fn list_experiences(
    State(state): State<AppState>,
    token: ProvidedToken,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<ExperienceListResponse>> {
    let Query(query) = query.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected listing query");
        ApiError::bad_request("missing openid")
    })?;

    let openid = query
        .openid
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("missing openid"))?;

    if !token.is_allowed_by(&state.token_policy) {
        return Err(ApiError::Unauthorized("unauthorized".to_string()));
    }

    let user_id = users::find_user_id_by_open_id(&state.db, openid)
        .await
        .map_err(|e| ApiError::upstream("user lookup error", e))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let rows = experiences::list_experiences_with_topics(&state.db, user_id)
        .await
        .map_err(|e| ApiError::upstream("experiences lookup error", e))?;

    let data = rows
        .into_iter()
        .map(|row| ExperienceListItem {
            time_ago: time_ago_from_now(row.created_at),
            id: row.id,
            topic_id: row.topic_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            topic: row.topic,
        })
        .collect();

    Ok(Json(ExperienceListResponse { data }))
}

/// GET /experiences/:id
pub async fn get_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ExperienceResponse>> {
    let id = parse_experience_id(&id)?;

    let record = experiences::load_experience_record(&state.db, id)
        .await
        .map_err(|e| ApiError::upstream("Experience lookup error", e))?
        .ok_or_else(|| ApiError::NotFound("Experience not found".to_string()))?;

    Ok(Json(score_experience(record)))
}

/// Body of `POST /experiences`
///
/// Fields are kept loose so that shape errors map to the specific 400
/// messages instead of a generic parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct SaveExperienceRequest {
    pub openid: Option<String>,
    pub topic_id: Option<Value>,
    pub answers: Option<Value>,
    pub internal_token: Option<String>,
}

/// A save request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSave {
    pub openid: String,
    pub topic_id: i64,
    pub replies: Vec<NewReply>,
}

impl SaveExperienceRequest {
    /// Check required fields and flatten answers into replies
    pub fn validate(self) -> Result<ValidatedSave, ApiError> {
        let openid = self
            .openid
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let (openid, topic_id, answers) = match (openid, self.topic_id, self.answers) {
            (Some(o), Some(t), Some(a)) if is_present(&t) && !a.is_null() => (o, t, a),
            _ => return Err(ApiError::bad_request(REQUIRED_FIELDS)),
        };

        let topic_id = parse_topic_id(&topic_id)?;

        let answers = match answers {
            Value::Array(items) if !items.is_empty() => items,
            _ => return Err(ApiError::bad_request(EMPTY_ANSWERS)),
        };

        let mut replies = Vec::new();
        for answer in &answers {
            let question_id = answer
                .get("question_id")
                .and_then(positive_id)
                .ok_or_else(|| ApiError::bad_request(INVALID_ANSWER))?;

            let checks = answer
                .get("check")
                .and_then(parse_check)
                .ok_or_else(|| ApiError::bad_request(INVALID_ANSWER))?;

            replies.extend(checks.into_iter().map(|answer_id| NewReply {
                question_id,
                answer_id,
            }));
        }

        Ok(ValidatedSave {
            openid,
            topic_id,
            replies,
        })
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }
}

fn parse_topic_id(value: &Value) -> Result<i64, ApiError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ApiError::bad_request(INVALID_TOPIC_ID))
}

fn positive_id(value: &Value) -> Option<i64> {
    value.as_i64().filter(|id| *id > 0)
}

/// `check` is one answer id or a non-empty list of them
fn parse_check(value: &Value) -> Option<Vec<i64>> {
    match value {
        Value::Array(ids) if !ids.is_empty() => ids.iter().map(positive_id).collect(),
        Value::Array(_) => None,
        single => positive_id(single).map(|id| vec![id]),
    }
}

fn parse_experience_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::bad_request(INVALID_EXPERIENCE_ID))
}

/// POST /experiences
pub async fn save_experience(
    State(state): State<AppState>,
    token: ProvidedToken,
    body: Result<Json<SaveExperienceRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SuccessResponse<SavedExperience>>)> {
    let body_token = body
        .as_ref()
        .ok()
        .and_then(|Json(b)| b.internal_token.clone());

    if !token.or_body(body_token.as_deref()).is_allowed_by(&state.token_policy) {
        return Err(ApiError::Forbidden(FORBIDDEN.to_string()));
    }

    let Json(request) = body.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected save body");
        ApiError::bad_request(REQUIRED_FIELDS)
    })?;
    let save = request.validate()?;

    let user_id = users::find_or_create_user(&state.db, &save.openid)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to find or create user");
            ApiError::Internal("Internal Server Error: Failed to process user".to_string())
        })?;

    let saved = experiences::save_experience(&state.db, user_id, save.topic_id, &save.replies)
        .await
        .map_err(|e| ApiError::upstream("Internal Server Error: Failed to save experience", e))?;

    info!(
        experience_id = saved.experience_id,
        replies = saved.replies_count,
        "Saved experience"
    );

    Ok((StatusCode::CREATED, Json(SuccessResponse::new(saved))))
}

/// PUT /experiences/:id/paid
pub async fn mark_paid(
    State(state): State<AppState>,
    token: ProvidedToken,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse<ExperienceBase>>> {
    if !token.is_allowed_by(&state.token_policy) {
        return Err(ApiError::Forbidden(FORBIDDEN.to_string()));
    }

    let id = parse_experience_id(&id)?;

    let updated = experiences::mark_experience_paid(&state.db, id)
        .await
        .map_err(|e| ApiError::upstream("Internal Server Error: Failed to update experience", e))?
        .ok_or_else(|| ApiError::NotFound("Not Found: Experience not found".to_string()))?;

    info!(experience_id = id, "Marked experience paid");

    Ok(Json(SuccessResponse::new(updated)))
}

/// Build experience routes
pub fn experience_routes() -> Router<AppState> {
    Router::new()
        .route("/experiences", get(list_experiences).post(save_experience))
        .route("/experiences/:id", get(get_experience))
        .route("/experiences/:id/paid", put(mark_paid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> SaveExperienceRequest {
        serde_json::from_value(body).unwrap()
    }

    fn message(err: ApiError) -> String {
        err.to_string()
    }

    #[test]
    fn test_validate_flattens_checks() {
        let save = request(json!({
            "openid": "  o1 ",
            "topic_id": "7",
            "answers": [
                { "question_id": 1, "check": 11 },
                { "question_id": 2, "check": [21, 22] }
            ]
        }))
        .validate()
        .unwrap();

        assert_eq!(save.openid, "o1");
        assert_eq!(save.topic_id, 7);
        assert_eq!(
            save.replies,
            vec![
                NewReply { question_id: 1, answer_id: 11 },
                NewReply { question_id: 2, answer_id: 21 },
                NewReply { question_id: 2, answer_id: 22 },
            ]
        );
    }

    #[test]
    fn test_validate_required_fields() {
        for body in [
            json!({ "topic_id": 1, "answers": [] }),
            json!({ "openid": "", "topic_id": 1, "answers": [] }),
            json!({ "openid": "o", "answers": [] }),
            json!({ "openid": "o", "topic_id": 0, "answers": [] }),
            json!({ "openid": "o", "topic_id": 1 }),
        ] {
            let err = request(body).validate().unwrap_err();
            assert_eq!(message(err), REQUIRED_FIELDS);
        }
    }

    #[test]
    fn test_validate_topic_id() {
        let err = request(json!({ "openid": "o", "topic_id": "abc", "answers": [] }))
            .validate()
            .unwrap_err();
        assert_eq!(message(err), INVALID_TOPIC_ID);
    }

    #[test]
    fn test_validate_answers_shape() {
        let err = request(json!({ "openid": "o", "topic_id": 1, "answers": [] }))
            .validate()
            .unwrap_err();
        assert_eq!(message(err), EMPTY_ANSWERS);

        let err = request(json!({ "openid": "o", "topic_id": 1, "answers": "x" }))
            .validate()
            .unwrap_err();
        assert_eq!(message(err), EMPTY_ANSWERS);

        for answer in [
            json!({ "check": 1 }),
            json!({ "question_id": 1 }),
            json!({ "question_id": 1, "check": [] }),
            json!({ "question_id": 1, "check": ["a"] }),
        ] {
            let err = request(json!({ "openid": "o", "topic_id": 1, "answers": [answer] }))
                .validate()
                .unwrap_err();
            assert_eq!(message(err), INVALID_ANSWER);
        }
    }

    #[test]
    fn test_parse_experience_id() {
        assert_eq!(parse_experience_id("42").unwrap(), 42);
        assert!(parse_experience_id("abc").is_err());
    }
}
