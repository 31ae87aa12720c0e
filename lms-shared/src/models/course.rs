/// Course model and database operations
///
/// A course is owned by exactly one teacher and optionally filed under a
/// category. Only the teacher may change it (see
/// [`crate::auth::authorization::require_course_teacher`]).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE courses (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     price INTEGER NOT NULL,
///     teacher_id BIGINT NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
///     category_id BIGINT REFERENCES course_categories(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Partial updates
///
/// Updates are loaded, patched in memory with [`UpdateCourse::apply_to`] and
/// written back with [`Course::save`]. A `None` field is left untouched;
/// `category_id` uses `Some(None)` to clear the category.
///
/// # Example
///
/// ```no_run
/// use lms_shared::models::course::{Course, CreateCourse, UpdateCourse};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, teacher_id: i64) -> Result<(), sqlx::Error> {
/// let mut course = Course::create(&pool, CreateCourse {
///     name: "Pemrograman Web".to_string(),
///     description: "Dasar HTML, CSS dan JavaScript".to_string(),
///     price: 150_000,
///     teacher_id,
///     category_id: None,
/// }).await?;
///
/// UpdateCourse { price: Some(99_000), ..Default::default() }.apply_to(&mut course);
/// let course = Course::save(&pool, &course).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: i32,
    pub teacher_id: i64,
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourse {
    pub name: String,
    pub description: String,
    pub price: i32,
    pub teacher_id: i64,
    pub category_id: Option<i64>,
}

/// Field-by-field patch for a course
///
/// All fields are optional. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateCourse {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i32>,
    pub teacher_id: Option<i64>,
    /// New category (use `Some(None)` to clear)
    pub category_id: Option<Option<i64>>,
}

impl UpdateCourse {
    /// Overwrites the provided fields on `course`, leaving the rest untouched
    pub fn apply_to(self, course: &mut Course) {
        if let Some(name) = self.name {
            course.name = name;
        }
        if let Some(description) = self.description {
            course.description = description;
        }
        if let Some(price) = self.price {
            course.price = price;
        }
        if let Some(teacher_id) = self.teacher_id {
            course.teacher_id = teacher_id;
        }
        if let Some(category_id) = self.category_id {
            course.category_id = category_id;
        }
    }

    /// Whether the patch carries no field at all
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

const COURSE_COLUMNS: &str =
    "id, name, description, price, teacher_id, category_id, created_at, updated_at";

impl Course {
    /// Creates a new course
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if the teacher or category does not
    /// exist.
    pub async fn create(pool: &PgPool, data: CreateCourse) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses (name, description, price, teacher_id, category_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COURSE_COLUMNS}"
        );

        sqlx::query_as::<_, Course>(&query)
            .bind(data.name)
            .bind(data.description)
            .bind(data.price)
            .bind(data.teacher_id)
            .bind(data.category_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1");

        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Loads every course whose ID is in `ids` in a single query
    pub async fn find_many(pool: &PgPool, ids: &[i64]) -> Result<Vec<Self>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ANY($1)");

        sqlx::query_as::<_, Course>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Lists courses newest first, one page at a time
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {COURSE_COLUMNS} FROM courses \
             ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );

        sqlx::query_as::<_, Course>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Counts all courses
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM courses")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Writes every mutable column of `course` back and bumps `updated_at`
    ///
    /// # Errors
    ///
    /// Returns `RowNotFound` if the course was deleted in the meantime.
    pub async fn save(pool: &PgPool, course: &Course) -> Result<Self, sqlx::Error> {
        let query = format!(
            "UPDATE courses \
             SET name = $2, description = $3, price = $4, teacher_id = $5, \
                 category_id = $6, updated_at = NOW() \
             WHERE id = $1 RETURNING {COURSE_COLUMNS}"
        );

        sqlx::query_as::<_, Course>(&query)
            .bind(course.id)
            .bind(&course.name)
            .bind(&course.description)
            .bind(course.price)
            .bind(course.teacher_id)
            .bind(course.category_id)
            .fetch_one(pool)
            .await
    }
}
