//! Integration tests for reading-exp API endpoints
//!
//! Each test builds the router over a fresh in-memory database seeded with
//! one topic:
//! - Q3 single answer: 17 (wrong), 18 (correct)
//! - Q4 multiple answers: 19 (correct), 20 (correct), 21 (wrong)

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use reading_common::api::{TokenPolicy, INTERNAL_TOKEN_HEADER};
use reading_exp::{build_router, db, AppState};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot` method

const TOKEN: &str = "test-internal-token";

/// Test helper: in-memory database with one seeded topic
async fn setup_test_db() -> SqlitePool {
    let pool = db::init_memory_pool().await.expect("Should create database");

    let statements = [
        "INSERT INTO topics (id, name, description) VALUES (2, '考试脑科学', NULL)",
        "INSERT INTO questions (id, topic_id, content, has_multiple_answers) VALUES (3, 2, 'Q3', NULL)",
        "INSERT INTO questions (id, topic_id, content, has_multiple_answers) VALUES (4, 2, 'Q4', 1)",
        "INSERT INTO answers (id, question_id, content, correct) VALUES (17, 3, 'A17', NULL)",
        "INSERT INTO answers (id, question_id, content, correct) VALUES (18, 3, 'A18', 1)",
        "INSERT INTO answers (id, question_id, content, correct) VALUES (19, 4, 'A19', 1)",
        "INSERT INTO answers (id, question_id, content, correct) VALUES (20, 4, 'A20', 1)",
        "INSERT INTO answers (id, question_id, content, correct) VALUES (21, 4, 'A21', 0)",
    ];
    for sql in statements {
        sqlx::query(sql).execute(&pool).await.expect("Should seed");
    }

    pool
}

/// Test helper: app with token enforcement off
async fn setup_app() -> (Router, SqlitePool) {
    let pool = setup_test_db().await;
    let app = build_router(AppState::new(pool.clone(), TokenPolicy::disabled()));
    (app, pool)
}

/// Test helper: app with token enforcement on
async fn setup_enforced_app() -> Router {
    let pool = setup_test_db().await;
    build_router(AppState::new(pool, TokenPolicy::enforced(TOKEN)))
}

fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    (status, extract_json(response.into_body()).await)
}

fn perfect_answers(openid: &str) -> Value {
    json!({
        "openid": openid,
        "topic_id": 2,
        "answers": [
            { "question_id": 3, "check": 18 },
            { "question_id": 4, "check": [19, 20] }
        ]
    })
}

async fn count_experiences(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM experiences")
        .fetch_one(pool)
        .await
        .unwrap()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_enforced_app().await;

    let (status, json) = send(&app, test_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "reading-exp");
    assert!(json["version"].is_string());
}

// =============================================================================
// Save → fetch → list
// =============================================================================

#[tokio::test]
async fn test_save_counts_flattened_replies() {
    let (app, _) = setup_app().await;

    let (status, json) = send(
        &app,
        json_request("POST", "/experiences", &perfect_answers("o-save")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["replies_count"], 3);
    assert!(json["data"]["experience_id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_saved_experience_is_scored() {
    let (app, _) = setup_app().await;

    let (_, saved) = send(
        &app,
        json_request("POST", "/experiences", &perfect_answers("o-score")),
    )
    .await;
    let id = saved["data"]["experience_id"].as_i64().unwrap();

    let (status, json) = send(&app, test_request("GET", &format!("/experiences/{}", id))).await;
    assert_eq!(status, StatusCode::OK);

    let data = &json["data"];
    assert_eq!(data["id"], id);
    assert_eq!(data["topic_id"], 2);
    assert_eq!(data["topic"]["name"], "考试脑科学");
    assert_eq!(data["topic"]["description"], "");
    assert_eq!(data["topic"]["cover_url"], "");
    assert_eq!(data["replies"].as_array().unwrap().len(), 3);

    let q3 = &data["questions"][0];
    assert_eq!(q3["id"], 3);
    assert_eq!(q3["has_multiple_answers"], false);
    assert_eq!(q3["answers"][0]["correct"], false);
    assert_eq!(q3["answers"][0]["selected"], false);
    assert_eq!(q3["answers"][1]["selected"], true);

    assert_eq!(
        data["summary"],
        json!({
            "total_questions": 2,
            "answered_questions": 2,
            "correct_answers": 2,
            "incorrect_answers": 0,
            "score_percentage": 100.0
        })
    );
}

#[tokio::test]
async fn test_partial_answers_score() {
    let (app, _) = setup_app().await;

    // Q3 wrong, Q4 missing one correct answer
    let body = json!({
        "openid": "o-partial",
        "topic_id": "2",
        "answers": [
            { "question_id": 3, "check": 17 },
            { "question_id": 4, "check": [19] }
        ]
    });
    let (_, saved) = send(&app, json_request("POST", "/experiences", &body)).await;
    let id = saved["data"]["experience_id"].as_i64().unwrap();

    let (_, json) = send(&app, test_request("GET", &format!("/experiences/{}", id))).await;
    let summary = &json["data"]["summary"];
    assert_eq!(summary["answered_questions"], 2);
    assert_eq!(summary["correct_answers"], 0);
    assert_eq!(summary["incorrect_answers"], 2);
    assert_eq!(summary["score_percentage"], 0.0);
}

#[tokio::test]
async fn test_list_newest_first_with_time_ago() {
    let (app, pool) = setup_app().await;

    for _ in 0..2 {
        send(
            &app,
            json_request("POST", "/experiences", &perfect_answers("o-list")),
        )
        .await;
    }
    sqlx::query("UPDATE experiences SET created_at = '2020-01-01T00:00:00.000Z' WHERE id = 1")
        .execute(&pool)
        .await
        .unwrap();

    let (status, json) = send(&app, test_request("GET", "/experiences?openid=%20o-list%20")).await;
    assert_eq!(status, StatusCode::OK);

    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], 2);
    assert_eq!(items[0]["time_ago"], "刚刚");
    assert_eq!(items[0]["topic"]["name"], "考试脑科学");
    assert_eq!(items[1]["id"], 1);
    assert!(items[1]["time_ago"].as_str().unwrap().ends_with("年前"));
}

// =============================================================================
// Listing errors
// =============================================================================

#[tokio::test]
async fn test_list_missing_openid() {
    let (app, _) = setup_app().await;

    for uri in ["/experiences", "/experiences?openid=", "/experiences?openid=%20%20"] {
        let (status, json) = send(&app, test_request("GET", uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(json["error"], "missing openid");
    }
}

#[tokio::test]
async fn test_list_malformed_query_is_json_error() {
    let (app, _) = setup_app().await;

    let (status, json) = send(&app, test_request("GET", "/experiences?openid=a&openid=b")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "missing openid");
}

#[tokio::test]
async fn test_list_unknown_user() {
    let (app, _) = setup_app().await;

    let (status, json) = send(&app, test_request("GET", "/experiences?openid=nobody")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "User not found");
}

#[tokio::test]
async fn test_list_token_enforced() {
    let app = setup_enforced_app().await;

    let (status, json) = send(&app, test_request("GET", "/experiences?openid=o1")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "unauthorized");

    let uri = format!("/experiences?openid=o1&internal_token={}", TOKEN);
    let (status, _) = send(&app, test_request("GET", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "token accepted, user unknown");

    // openid is validated before the token
    let (status, _) = send(&app, test_request("GET", "/experiences")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Save errors
// =============================================================================

#[tokio::test]
async fn test_save_token_enforced() {
    let app = setup_enforced_app().await;

    let (status, json) = send(
        &app,
        json_request("POST", "/experiences", &perfect_answers("o-tok")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "Forbidden: Invalid or missing internal token");

    let mut req = json_request("POST", "/experiences", &perfect_answers("o-tok"));
    req.headers_mut()
        .insert(INTERNAL_TOKEN_HEADER, TOKEN.parse().unwrap());
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    let mut body = perfect_answers("o-tok");
    body["internal_token"] = json!(TOKEN);
    let (status, _) = send(&app, json_request("POST", "/experiences", &body)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_save_validation_messages() {
    let (app, pool) = setup_app().await;

    let cases = [
        (
            json!({ "topic_id": 2, "answers": [{ "question_id": 3, "check": 18 }] }),
            "Bad Request: topic_id, openid and answers are required",
        ),
        (
            json!({ "openid": "o", "topic_id": "two", "answers": [{ "question_id": 3, "check": 18 }] }),
            "Bad Request: topic_id must be a valid number",
        ),
        (
            json!({ "openid": "o", "topic_id": 2, "answers": [] }),
            "Bad Request: answers must be a non-empty array",
        ),
        (
            json!({ "openid": "o", "topic_id": 2, "answers": [{ "question_id": 3 }] }),
            "Bad Request: each answer must have question_id and check",
        ),
    ];

    for (body, expected) in cases {
        let (status, json) = send(&app, json_request("POST", "/experiences", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], expected);
    }

    assert_eq!(count_experiences(&pool).await, 0);
}

#[tokio::test]
async fn test_save_malformed_json() {
    let (app, _) = setup_app().await;

    let req = Request::builder()
        .method("POST")
        .uri("/experiences")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, json) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_failed_reply_insert_leaves_no_experience() {
    let (app, pool) = setup_app().await;

    let body = json!({
        "openid": "o-orphan",
        "topic_id": 2,
        "answers": [
            { "question_id": 3, "check": 18 },
            { "question_id": 4, "check": [19, 9999] }
        ]
    });
    let (status, json) = send(&app, json_request("POST", "/experiences", &body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Internal Server Error: Failed to save experience");
    assert!(json["details"].is_string());
    assert_eq!(count_experiences(&pool).await, 0);
}

// =============================================================================
// Single experience errors
// =============================================================================

#[tokio::test]
async fn test_get_experience_errors() {
    let (app, _) = setup_app().await;

    let (status, json) = send(&app, test_request("GET", "/experiences/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Experience not found");

    let (status, _) = send(&app, test_request("GET", "/experiences/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_experience_store_failure_has_details() {
    let (app, pool) = setup_app().await;

    let (_, saved) = send(
        &app,
        json_request("POST", "/experiences", &perfect_answers("o-broken")),
    )
    .await;
    let id = saved["data"]["experience_id"].as_i64().unwrap();

    sqlx::query("DROP TABLE replies")
        .execute(&pool)
        .await
        .expect("Should drop replies");

    let (status, json) = send(&app, test_request("GET", &format!("/experiences/{}", id))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Experience lookup error");
    assert!(json["details"].is_string());
}

#[tokio::test]
async fn test_get_experience_not_gated() {
    let app = setup_enforced_app().await;

    let (status, _) = send(&app, test_request("GET", "/experiences/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Mark paid
// =============================================================================

#[tokio::test]
async fn test_mark_paid() {
    let (app, _) = setup_app().await;

    let (_, saved) = send(
        &app,
        json_request("POST", "/experiences", &perfect_answers("o-pay")),
    )
    .await;
    let id = saved["data"]["experience_id"].as_i64().unwrap();

    let uri = format!("/experiences/{}/paid", id);
    let (status, json) = send(&app, test_request("PUT", &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["id"], id);
    assert_eq!(json["data"]["paid"], true);
    assert!(json["data"]["updated_at"].is_string());

    // idempotent
    let (status, json) = send(&app, test_request("PUT", &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["paid"], true);
}

#[tokio::test]
async fn test_mark_paid_errors() {
    let (app, _) = setup_app().await;

    let (status, json) = send(&app, test_request("PUT", "/experiences/12345/paid")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Not Found: Experience not found");

    let (status, json) = send(&app, test_request("PUT", "/experiences/x1/paid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Bad Request: experience ID must be a valid number");
}

#[tokio::test]
async fn test_mark_paid_token_enforced() {
    let app = setup_enforced_app().await;

    let (status, _) = send(&app, test_request("PUT", "/experiences/1/paid")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/experiences/1/paid?internal_token={}", TOKEN);
    let (status, _) = send(&app, test_request("PUT", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
