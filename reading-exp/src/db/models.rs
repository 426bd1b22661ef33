//! Storage-layer records
//!
//! These mirror what the store hands back, optional fields included. The
//! scoring pipeline fills defaults when it converts them into response
//! models (see [`crate::scoring::transform`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Experience row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceBase {
    pub id: i64,
    pub topic_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Topic row as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
}

/// Answer row as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAnswer {
    pub id: i64,
    pub content: String,
    #[serde(default)]
    pub correct: Option<bool>,
}

/// Question row with its answers joined in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuestion {
    pub id: i64,
    pub content: String,
    #[serde(default)]
    pub has_multiple_answers: Option<bool>,
    #[serde(default)]
    pub answers: Option<Vec<RawAnswer>>,
}

/// One selected answer of an experience
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: i64,
    pub experience_id: i64,
    pub answer_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<i64>,
}

/// Everything needed to score one experience, fetched in one go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub base: ExperienceBase,
    #[serde(default)]
    pub topic: Option<TopicRecord>,
    #[serde(default)]
    pub questions: Option<Vec<RawQuestion>>,
    #[serde(default)]
    pub replies: Option<Vec<Reply>>,
}

/// Experience row joined with its topic, for listings
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceListRow {
    pub id: i64,
    pub topic_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub topic: Option<TopicRecord>,
}

/// A reply to insert: one selected answer of one question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewReply {
    pub question_id: i64,
    pub answer_id: i64,
}

/// Outcome of saving an experience
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedExperience {
    pub experience_id: i64,
    pub replies_count: usize,
}
