//! User lookup by platform openid

use reading_common::Result;
use sqlx::SqlitePool;

use super::now_timestamp;

/// Find the internal user id for an openid
pub async fn find_user_id_by_open_id(pool: &SqlitePool, open_id: &str) -> Result<Option<i64>> {
    let id: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE open_id = ? LIMIT 1")
        .bind(open_id)
        .fetch_optional(pool)
        .await?;

    Ok(id)
}

/// Find the user for an openid, creating it on first sight
///
/// The insert is a no-op when the openid already exists, so concurrent
/// first requests for the same openid converge on one row.
pub async fn find_or_create_user(pool: &SqlitePool, open_id: &str) -> Result<i64> {
    let now = now_timestamp();

    let inserted = sqlx::query(
        "INSERT INTO users (open_id, created_at, updated_at) VALUES (?, ?, ?)
         ON CONFLICT(open_id) DO NOTHING",
    )
    .bind(open_id)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    if inserted.rows_affected() > 0 {
        tracing::info!(open_id, user_id = inserted.last_insert_rowid(), "Created user");
        return Ok(inserted.last_insert_rowid());
    }

    let id: i64 = sqlx::query_scalar("SELECT id FROM users WHERE open_id = ?")
        .bind(open_id)
        .fetch_one(pool)
        .await?;

    Ok(id)
}
