/// Comment model and database operations
///
/// A comment is written by a course member on one content item of that
/// course. The author is the user behind `member_id`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id BIGSERIAL PRIMARY KEY,
///     content_id BIGINT NOT NULL REFERENCES course_contents(id) ON DELETE CASCADE,
///     member_id BIGINT NOT NULL REFERENCES course_members(id) ON DELETE CASCADE,
///     comment TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub content_id: i64,
    pub member_id: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComment {
    pub content_id: i64,
    pub member_id: i64,
    pub comment: String,
}

const COMMENT_COLUMNS: &str = "id, content_id, member_id, comment, created_at, updated_at";

impl Comment {
    pub async fn create(pool: &PgPool, data: CreateComment) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (content_id, member_id, comment) \
             VALUES ($1, $2, $3) RETURNING {COMMENT_COLUMNS}"
        );

        sqlx::query_as::<_, Comment>(&query)
            .bind(data.content_id)
            .bind(data.member_id)
            .bind(data.comment)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");

        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists the comments on a content item, oldest first
    pub async fn list_by_content(pool: &PgPool, content_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments \
             WHERE content_id = $1 ORDER BY created_at ASC, id ASC"
        );

        sqlx::query_as::<_, Comment>(&query)
            .bind(content_id)
            .fetch_all(pool)
            .await
    }

    /// Deletes a comment, returning whether a row was removed
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
