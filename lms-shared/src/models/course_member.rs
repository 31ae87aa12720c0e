/// Course member model and database operations
///
/// A course member is the enrollment of a user in a course. Membership is
/// what grants the right to comment on the course's content.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE member_role AS ENUM ('std', 'ast');
///
/// CREATE TABLE course_members (
///     id BIGSERIAL PRIMARY KEY,
///     course_id BIGINT NOT NULL REFERENCES courses(id) ON DELETE RESTRICT,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
///     roles member_role NOT NULL DEFAULT 'std',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Duplicates
///
/// There is no uniqueness on `(course_id, user_id)`: enrolling twice creates
/// two rows. Lookups of "the" membership of a user pick the oldest row.
///
/// # Example
///
/// ```no_run
/// use lms_shared::models::course_member::{CourseMember, CreateCourseMember, MemberRole};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let member = CourseMember::create(&pool, CreateCourseMember {
///     course_id: 1,
///     user_id: 5,
///     roles: MemberRole::Std,
/// }).await?;
///
/// assert!(CourseMember::find(&pool, 1, 5).await?.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Role of a member inside a course
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Student
    #[default]
    Std,

    /// Teaching assistant
    Ast,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Std => "std",
            MemberRole::Ast => "ast",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CourseMember {
    pub id: i64,
    pub course_id: i64,
    pub user_id: i64,
    pub roles: MemberRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for enrolling a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourseMember {
    pub course_id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub roles: MemberRole,
}

const MEMBER_COLUMNS: &str = "id, course_id, user_id, roles, created_at, updated_at";

impl CourseMember {
    /// Enrolls a user in a course
    ///
    /// Always inserts a new row, even if the user is already enrolled.
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if the course or user does not exist.
    pub async fn create(pool: &PgPool, data: CreateCourseMember) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO course_members (course_id, user_id, roles) \
             VALUES ($1, $2, $3) RETURNING {MEMBER_COLUMNS}"
        );

        sqlx::query_as::<_, CourseMember>(&query)
            .bind(data.course_id)
            .bind(data.user_id)
            .bind(data.roles)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {MEMBER_COLUMNS} FROM course_members WHERE id = $1");

        sqlx::query_as::<_, CourseMember>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds the oldest membership of a user in a course
    pub async fn find(
        pool: &PgPool,
        course_id: i64,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {MEMBER_COLUMNS} FROM course_members \
             WHERE course_id = $1 AND user_id = $2 \
             ORDER BY id ASC LIMIT 1"
        );

        sqlx::query_as::<_, CourseMember>(&query)
            .bind(course_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Lists every enrollment of a user, oldest first
    pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {MEMBER_COLUMNS} FROM course_members \
             WHERE user_id = $1 ORDER BY created_at ASC, id ASC"
        );

        sqlx::query_as::<_, CourseMember>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Loads every membership whose ID is in `ids` in a single query
    pub async fn find_many(pool: &PgPool, ids: &[i64]) -> Result<Vec<Self>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {MEMBER_COLUMNS} FROM course_members WHERE id = ANY($1)");

        sqlx::query_as::<_, CourseMember>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
