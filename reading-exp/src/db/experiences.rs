//! Experience database operations
//!
//! Listing, loading the full record for scoring, saving a quiz attempt with
//! its replies, and the one-way paid flag.

use reading_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::models::{
    ExperienceBase, ExperienceListRow, ExperienceRecord, NewReply, RawAnswer, RawQuestion, Reply,
    SavedExperience, TopicRecord,
};
use super::{now_timestamp, parse_timestamp};

/// All experiences of a user with their topics, newest first
pub async fn list_experiences_with_topics(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<ExperienceListRow>> {
    let rows = sqlx::query(
        r#"
        SELECT e.id, e.topic_id, e.created_at, e.updated_at,
               t.id AS t_id, t.name AS t_name, t.description AS t_description,
               t.cover_url AS t_cover_url
        FROM experiences e
        LEFT JOIN topics t ON t.id = e.topic_id
        WHERE e.user_id = ?
        ORDER BY e.created_at DESC, e.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<ExperienceListRow> {
            let topic = match row.try_get::<Option<i64>, _>("t_id")? {
                Some(id) => Some(TopicRecord {
                    id,
                    name: row.try_get("t_name")?,
                    description: row.try_get("t_description")?,
                    cover_url: row.try_get("t_cover_url")?,
                }),
                None => None,
            };

            Ok(ExperienceListRow {
                id: row.try_get("id")?,
                topic_id: row.try_get("topic_id")?,
                created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
                updated_at: parse_optional_timestamp(row.try_get("updated_at")?)?,
                topic,
            })
        })
        .collect()
}

/// Load an experience with its topic, questions, answers and replies
///
/// Questions and answers come back in id order. Returns `Ok(None)` when the
/// experience does not exist.
pub async fn load_experience_record(
    pool: &SqlitePool,
    experience_id: i64,
) -> Result<Option<ExperienceRecord>> {
    let mut conn = pool.acquire().await?;

    let row = sqlx::query(
        "SELECT id, topic_id, user_id, paid, created_at, updated_at FROM experiences WHERE id = ?",
    )
    .bind(experience_id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let base = experience_from_row(&row)?;

    let topic = fetch_topic(&mut conn, base.topic_id).await?;
    let questions = fetch_questions_with_answers(&mut conn, base.topic_id).await?;
    let replies = fetch_replies(&mut conn, base.id).await?;

    debug!(
        experience_id,
        questions = questions.len(),
        replies = replies.len(),
        "Loaded experience record"
    );

    Ok(Some(ExperienceRecord {
        base,
        topic,
        questions: Some(questions),
        replies: Some(replies),
    }))
}

/// Save a quiz attempt and its replies
///
/// Runs in one transaction: if any reply insert fails the experience row is
/// rolled back with it, so no experience is left without its replies.
pub async fn save_experience(
    pool: &SqlitePool,
    user_id: i64,
    topic_id: i64,
    replies: &[NewReply],
) -> Result<SavedExperience> {
    let now = now_timestamp();
    let mut tx = pool.begin().await?;

    let experience_id = sqlx::query(
        "INSERT INTO experiences (user_id, topic_id, created_at, updated_at, paid)
         VALUES (?, ?, ?, ?, 0)",
    )
    .bind(user_id)
    .bind(topic_id)
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    if let Err(e) = insert_replies(&mut tx, experience_id, replies, &now).await {
        warn!(
            experience_id,
            error = %e,
            "Reply insert failed, removing experience"
        );
        tx.rollback().await?;
        return Err(e);
    }

    tx.commit().await?;

    info!(
        experience_id,
        user_id,
        topic_id,
        replies = replies.len(),
        "Experience saved"
    );

    Ok(SavedExperience {
        experience_id,
        replies_count: replies.len(),
    })
}

/// Set `paid` on an experience
///
/// Only ever sets the flag, never clears it. Returns `Ok(None)` when the
/// experience does not exist.
pub async fn mark_experience_paid(
    pool: &SqlitePool,
    experience_id: i64,
) -> Result<Option<ExperienceBase>> {
    let row = sqlx::query(
        r#"
        UPDATE experiences SET paid = 1, updated_at = ?
        WHERE id = ?
        RETURNING id, topic_id, user_id, paid, created_at, updated_at
        "#,
    )
    .bind(now_timestamp())
    .bind(experience_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            info!(experience_id, "Experience marked paid");
            Ok(Some(experience_from_row(&row)?))
        }
        None => Ok(None),
    }
}

async fn insert_replies(
    conn: &mut SqliteConnection,
    experience_id: i64,
    replies: &[NewReply],
    now: &str,
) -> Result<()> {
    for reply in replies {
        sqlx::query(
            "INSERT INTO replies (experience_id, answer_id, question_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(experience_id)
        .bind(reply.answer_id)
        .bind(reply.question_id)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn fetch_topic(conn: &mut SqliteConnection, topic_id: i64) -> Result<Option<TopicRecord>> {
    let row = sqlx::query("SELECT id, name, description, cover_url FROM topics WHERE id = ?")
        .bind(topic_id)
        .fetch_optional(&mut *conn)
        .await?;

    row.map(|row| -> Result<TopicRecord> {
        Ok(TopicRecord {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            cover_url: row.try_get("cover_url")?,
        })
    })
    .transpose()
}

async fn fetch_questions_with_answers(
    conn: &mut SqliteConnection,
    topic_id: i64,
) -> Result<Vec<RawQuestion>> {
    let question_rows = sqlx::query(
        "SELECT id, content, has_multiple_answers FROM questions WHERE topic_id = ? ORDER BY id",
    )
    .bind(topic_id)
    .fetch_all(&mut *conn)
    .await?;

    let answer_rows = sqlx::query(
        r#"
        SELECT a.id, a.question_id, a.content, a.correct
        FROM answers a
        JOIN questions q ON q.id = a.question_id
        WHERE q.topic_id = ?
        ORDER BY a.id
        "#,
    )
    .bind(topic_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut answers_by_question: HashMap<i64, Vec<RawAnswer>> = HashMap::new();
    for row in &answer_rows {
        let question_id: i64 = row.try_get("question_id")?;
        answers_by_question
            .entry(question_id)
            .or_default()
            .push(RawAnswer {
                id: row.try_get("id")?,
                content: row.try_get("content")?,
                correct: row.try_get("correct")?,
            });
    }

    question_rows
        .iter()
        .map(|row| -> Result<RawQuestion> {
            let id: i64 = row.try_get("id")?;
            Ok(RawQuestion {
                id,
                content: row.try_get("content")?,
                has_multiple_answers: row.try_get("has_multiple_answers")?,
                answers: answers_by_question.remove(&id),
            })
        })
        .collect()
}

async fn fetch_replies(conn: &mut SqliteConnection, experience_id: i64) -> Result<Vec<Reply>> {
    let rows = sqlx::query(
        "SELECT id, experience_id, answer_id, question_id FROM replies
         WHERE experience_id = ? ORDER BY id",
    )
    .bind(experience_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter()
        .map(|row| -> Result<Reply> {
            Ok(Reply {
                id: row.try_get("id")?,
                experience_id: row.try_get("experience_id")?,
                answer_id: row.try_get("answer_id")?,
                question_id: row.try_get("question_id")?,
            })
        })
        .collect()
}

fn experience_from_row(row: &SqliteRow) -> Result<ExperienceBase> {
    Ok(ExperienceBase {
        id: row.try_get("id")?,
        topic_id: row.try_get("topic_id")?,
        user_id: row.try_get("user_id")?,
        paid: row.try_get("paid")?,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_optional_timestamp(row.try_get("updated_at")?)?,
    })
}

fn parse_optional_timestamp(
    raw: Option<String>,
) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
    raw.as_deref().map(parse_timestamp).transpose()
}
