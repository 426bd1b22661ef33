//! Response assembly

use crate::db::models::{ExperienceBase, Reply, TopicRecord};
use crate::models::{ExperienceDetail, ExperienceResponse, Question, Summary, Topic};

/// Topic with missing description / cover_url replaced by empty strings
pub fn normalize_topic(topic: TopicRecord) -> Topic {
    Topic {
        id: topic.id,
        name: topic.name,
        description: topic.description.unwrap_or_default(),
        cover_url: topic.cover_url.unwrap_or_default(),
    }
}

pub fn build_response(
    base: &ExperienceBase,
    topic: Option<TopicRecord>,
    questions: Vec<Question>,
    replies: Option<Vec<Reply>>,
    summary: Summary,
) -> ExperienceResponse {
    ExperienceResponse {
        data: ExperienceDetail {
            id: base.id,
            topic_id: base.topic_id,
            user_id: base.user_id,
            created_at: base.created_at,
            topic: topic.map(normalize_topic),
            questions,
            replies: replies.unwrap_or_default(),
            summary,
        },
    }
}
