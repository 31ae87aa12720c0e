/// Course category model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE course_categories (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     CONSTRAINT course_categories_name_key UNIQUE (name)
/// );
/// ```
///
/// Deleting a category sets `category_id` of its courses to NULL.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CourseCategory {
    pub id: i64,
    pub name: String,
}

impl CourseCategory {
    /// Creates a category; duplicate names violate `course_categories_name_key`
    pub async fn create(pool: &PgPool, name: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, CourseCategory>(
            "INSERT INTO course_categories (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, CourseCategory>(
            "SELECT id, name FROM course_categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists all categories alphabetically
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, CourseCategory>(
            "SELECT id, name FROM course_categories ORDER BY name ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Deletes a category, returning whether a row was removed
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM course_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
