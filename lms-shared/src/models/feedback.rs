/// Course feedback model and database operations
///
/// Each student may leave at most one rated feedback per course. The
/// uniqueness is enforced by the `course_feedbacks_course_student_key`
/// constraint and surfaced by [`CourseFeedback::create_unique`] as `None`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE course_feedbacks (
///     id BIGSERIAL PRIMARY KEY,
///     course_id BIGINT NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
///     student_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
///     feedback TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT course_feedbacks_course_student_key UNIQUE (course_id, student_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use lms_shared::models::feedback::{CourseFeedback, CreateFeedback};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let data = CreateFeedback {
///     course_id: 1,
///     student_id: 5,
///     rating: 4,
///     feedback: Some("Materinya jelas".to_string()),
/// };
///
/// assert!(CourseFeedback::create_unique(&pool, data.clone()).await?.is_some());
/// assert!(CourseFeedback::create_unique(&pool, data).await?.is_none());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Lowest accepted rating, matching the `rating` CHECK constraint
pub const MIN_RATING: i32 = 1;

/// Highest accepted rating
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CourseFeedback {
    pub id: i64,
    pub course_id: i64,
    pub student_id: i64,
    pub rating: i32,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFeedback {
    pub course_id: i64,
    pub student_id: i64,
    pub rating: i32,
    pub feedback: Option<String>,
}

const FEEDBACK_COLUMNS: &str =
    "id, course_id, student_id, rating, feedback, created_at, updated_at";

impl CourseFeedback {
    /// Inserts feedback unless the student already rated the course
    ///
    /// Returns `Ok(None)` when a feedback for `(course_id, student_id)`
    /// already exists. The check and insert are one atomic statement.
    pub async fn create_unique(
        pool: &PgPool,
        data: CreateFeedback,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "INSERT INTO course_feedbacks (course_id, student_id, rating, feedback) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (course_id, student_id) DO NOTHING \
             RETURNING {FEEDBACK_COLUMNS}"
        );

        sqlx::query_as::<_, CourseFeedback>(&query)
            .bind(data.course_id)
            .bind(data.student_id)
            .bind(data.rating)
            .bind(data.feedback)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {FEEDBACK_COLUMNS} FROM course_feedbacks WHERE id = $1");

        sqlx::query_as::<_, CourseFeedback>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists the feedback of a course, newest first
    pub async fn list_by_course(pool: &PgPool, course_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {FEEDBACK_COLUMNS} FROM course_feedbacks \
             WHERE course_id = $1 ORDER BY created_at DESC, id DESC"
        );

        sqlx::query_as::<_, CourseFeedback>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// Replaces rating and text of an existing feedback
    pub async fn update(
        pool: &PgPool,
        id: i64,
        rating: i32,
        feedback: Option<String>,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "UPDATE course_feedbacks SET rating = $2, feedback = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING {FEEDBACK_COLUMNS}"
        );

        sqlx::query_as::<_, CourseFeedback>(&query)
            .bind(id)
            .bind(rating)
            .bind(feedback)
            .fetch_one(pool)
            .await
    }

    /// Deletes a feedback, returning whether a row was removed
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM course_feedbacks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
