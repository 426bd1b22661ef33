//! Experience scoring pipeline
//!
//! Transformer → Evaluator → Aggregator → Builder, run synchronously on one
//! [`ExperienceRecord`] per request. Nothing here touches the database or
//! keeps state between calls.

pub mod evaluate;
pub mod response;
pub mod summary;
pub mod transform;

pub use evaluate::{is_answered, is_question_correct};
pub use response::{build_response, normalize_topic};
pub use summary::{calculate_summary, round2};
pub use transform::{selected_answer_ids, transform_questions};

use crate::db::models::ExperienceRecord;
use crate::models::ExperienceResponse;

/// Score a loaded experience and assemble the response payload
pub fn score_experience(record: ExperienceRecord) -> ExperienceResponse {
    let ExperienceRecord {
        base,
        topic,
        questions,
        replies,
    } = record;

    let selected = selected_answer_ids(replies.as_deref().unwrap_or_default());
    let questions = transform_questions(questions.unwrap_or_default(), &selected);
    let summary = calculate_summary(&questions);

    build_response(&base, topic, questions, replies, summary)
}
