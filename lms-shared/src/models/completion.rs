/// Completion tracking model and database operations
///
/// One row per `(student, content)` pair records whether the student has
/// finished a content item. Marking completion is an upsert, so repeating
/// it only refreshes `completed_at`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE completion_trackings (
///     id BIGSERIAL PRIMARY KEY,
///     student_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     content_id BIGINT NOT NULL REFERENCES course_contents(id) ON DELETE CASCADE,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     completed_at TIMESTAMPTZ,
///     CONSTRAINT completion_trackings_student_content_key UNIQUE (student_id, content_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompletionTracking {
    pub id: i64,
    pub student_id: i64,
    pub content_id: i64,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Completion row joined with the student's username and the content name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompletionEntry {
    pub id: i64,
    pub student_id: i64,
    pub student_username: String,
    pub content_id: i64,
    pub content_name: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl CompletionTracking {
    /// Marks a content as completed by a student
    ///
    /// Inserts a new row or flips an existing one to completed with a fresh
    /// timestamp. Never creates a second row for the same pair.
    pub async fn mark_completed(
        pool: &PgPool,
        student_id: i64,
        content_id: i64,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, CompletionTracking>(
            r#"
            INSERT INTO completion_trackings (student_id, content_id, completed, completed_at)
            VALUES ($1, $2, TRUE, NOW())
            ON CONFLICT (student_id, content_id)
            DO UPDATE SET completed = TRUE, completed_at = NOW()
            RETURNING id, student_id, content_id, completed, completed_at
            "#,
        )
        .bind(student_id)
        .bind(content_id)
        .fetch_one(pool)
        .await
    }

    /// Lists completions for every content of a course
    pub async fn list_by_course(
        pool: &PgPool,
        course_id: i64,
    ) -> Result<Vec<CompletionEntry>, sqlx::Error> {
        sqlx::query_as::<_, CompletionEntry>(
            r#"
            SELECT t.id, t.student_id, u.username AS student_username,
                   t.content_id, c.name AS content_name, t.completed, t.completed_at
            FROM completion_trackings t
            JOIN course_contents c ON c.id = t.content_id
            JOIN users u ON u.id = t.student_id
            WHERE c.course_id = $1
            ORDER BY t.completed_at DESC NULLS LAST, t.id ASC
            "#,
        )
        .bind(course_id)
        .fetch_all(pool)
        .await
    }

    /// Deletes the completion of a student on a content
    pub async fn delete(pool: &PgPool, student_id: i64, content_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM completion_trackings WHERE student_id = $1 AND content_id = $2",
        )
        .bind(student_id)
        .bind(content_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
