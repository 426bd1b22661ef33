//! Response models for the experiences API
//!
//! Normalized, request-scoped views built by the scoring pipeline. Unlike
//! the storage records in [`crate::db::models`] every field here is filled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::models::{Reply, TopicRecord};

/// Topic with empty-string defaults for missing text fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub cover_url: String,
}

/// Answer annotated with the user's selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: i64,
    pub content: String,
    pub correct: bool,
    pub selected: bool,
}

/// Question with normalized answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub content: String,
    pub has_multiple_answers: bool,
    pub answers: Vec<Answer>,
}

/// Score statistics for one experience
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_questions: usize,
    pub answered_questions: usize,
    pub correct_answers: usize,
    pub incorrect_answers: usize,
    /// 0 to 100, rounded to two decimals
    pub score_percentage: f64,
}

/// Full view of one experience
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceDetail {
    pub id: i64,
    pub topic_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub topic: Option<Topic>,
    pub questions: Vec<Question>,
    pub replies: Vec<Reply>,
    pub summary: Summary,
}

/// Body of `GET /experiences/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceResponse {
    pub data: ExperienceDetail,
}

/// One entry of `GET /experiences`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceListItem {
    pub id: i64,
    pub topic_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Chinese relative time, e.g. `3天前`
    pub time_ago: String,
    pub topic: Option<TopicRecord>,
}

/// Body of `GET /experiences`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceListResponse {
    pub data: Vec<ExperienceListItem>,
}
