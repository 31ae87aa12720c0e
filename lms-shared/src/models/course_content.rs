/// Course content model and database operations
///
/// Contents form a tree per course through `parent_id`. The database only
/// enforces that a parent exists; the tree shape (same course, no cycles)
/// is checked by [`check_parent`] before every write that sets a parent.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE course_contents (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(200) NOT NULL,
///     description TEXT NOT NULL DEFAULT '-',
///     video_url VARCHAR(200),
///     file_attachment VARCHAR(255),
///     course_id BIGINT NOT NULL REFERENCES courses(id) ON DELETE RESTRICT,
///     parent_id BIGINT REFERENCES course_contents(id) ON DELETE RESTRICT,
///     teacher_id BIGINT REFERENCES users(id) ON DELETE CASCADE,
///     is_published BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use lms_shared::models::course_content::{CourseContent, CreateCourseContent};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let chapter = CourseContent::create(&pool, CreateCourseContent {
///     name: "Bab 1".to_string(),
///     course_id: 1,
///     teacher_id: Some(3),
///     ..Default::default()
/// }).await?;
///
/// // Validate a child before inserting it
/// CourseContent::validate_parent(&pool, None, 1, chapter.id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CourseContent {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub video_url: Option<String>,
    pub file_attachment: Option<String>,
    pub course_id: i64,
    pub parent_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a content item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourseContent {
    pub name: String,
    pub description: String,
    pub video_url: Option<String>,
    pub file_attachment: Option<String>,
    pub course_id: i64,
    pub parent_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub is_published: bool,
}

impl Default for CreateCourseContent {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: "-".to_string(),
            video_url: None,
            file_attachment: None,
            course_id: 0,
            parent_id: None,
            teacher_id: None,
            is_published: false,
        }
    }
}

/// Field-by-field patch for a content item
///
/// Nullable columns take `Some(None)` to clear. Publication is not part of
/// the patch; it only changes through [`CourseContent::set_published`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateCourseContent {
    pub name: Option<String>,
    pub description: Option<String>,
    pub video_url: Option<Option<String>>,
    pub file_attachment: Option<Option<String>>,
    pub parent_id: Option<Option<i64>>,
}

impl UpdateCourseContent {
    /// Overwrites the provided fields on `content`
    pub fn apply_to(self, content: &mut CourseContent) {
        if let Some(name) = self.name {
            content.name = name;
        }
        if let Some(description) = self.description {
            content.description = description;
        }
        if let Some(video_url) = self.video_url {
            content.video_url = video_url;
        }
        if let Some(file_attachment) = self.file_attachment {
            content.file_attachment = file_attachment;
        }
        if let Some(parent_id) = self.parent_id {
            content.parent_id = parent_id;
        }
    }

    /// The new parent, if the patch sets one
    pub fn new_parent(&self) -> Option<i64> {
        self.parent_id.flatten()
    }
}

/// Rejected parent assignment
#[derive(Debug, Error)]
pub enum ParentError {
    #[error("Parent content {0} not found")]
    NotFound(i64),

    #[error("Parent content belongs to another course")]
    OtherCourse,

    #[error("Content cannot be its own parent")]
    SelfParent,

    #[error("Parent content is a descendant of this content")]
    Cycle,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Checks that `parent` may become the parent of a content item
///
/// `content_id` is `None` for a content that does not exist yet.
/// `parent_chain` holds the IDs of `parent` and all of its ancestors.
pub fn check_parent(
    content_id: Option<i64>,
    course_id: i64,
    parent: &CourseContent,
    parent_chain: &[i64],
) -> Result<(), ParentError> {
    if parent.course_id != course_id {
        return Err(ParentError::OtherCourse);
    }

    if let Some(id) = content_id {
        if parent.id == id {
            return Err(ParentError::SelfParent);
        }
        if parent_chain.contains(&id) {
            return Err(ParentError::Cycle);
        }
    }

    Ok(())
}

const CONTENT_COLUMNS: &str = "id, name, description, video_url, file_attachment, course_id, \
     parent_id, teacher_id, is_published, created_at, updated_at";

impl CourseContent {
    /// Creates a content item
    ///
    /// The parent is not checked here; call [`CourseContent::validate_parent`]
    /// first.
    pub async fn create(pool: &PgPool, data: CreateCourseContent) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO course_contents \
             (name, description, video_url, file_attachment, course_id, parent_id, teacher_id, is_published) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {CONTENT_COLUMNS}"
        );

        sqlx::query_as::<_, CourseContent>(&query)
            .bind(data.name)
            .bind(data.description)
            .bind(data.video_url)
            .bind(data.file_attachment)
            .bind(data.course_id)
            .bind(data.parent_id)
            .bind(data.teacher_id)
            .bind(data.is_published)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {CONTENT_COLUMNS} FROM course_contents WHERE id = $1");

        sqlx::query_as::<_, CourseContent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Loads every content whose ID is in `ids` in a single query
    pub async fn find_many(pool: &PgPool, ids: &[i64]) -> Result<Vec<Self>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {CONTENT_COLUMNS} FROM course_contents WHERE id = ANY($1)");

        sqlx::query_as::<_, CourseContent>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Lists all contents of a course, published or not
    pub async fn list_by_course(pool: &PgPool, course_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {CONTENT_COLUMNS} FROM course_contents WHERE course_id = $1 ORDER BY id ASC"
        );

        sqlx::query_as::<_, CourseContent>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// Lists the published contents of a course
    pub async fn list_published_by_course(
        pool: &PgPool,
        course_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {CONTENT_COLUMNS} FROM course_contents \
             WHERE course_id = $1 AND is_published = TRUE ORDER BY id ASC"
        );

        sqlx::query_as::<_, CourseContent>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// IDs of a content and all of its ancestors, nearest first
    ///
    /// `UNION` (not `UNION ALL`) stops the walk on a pre-existing loop.
    pub async fn ancestor_ids(pool: &PgPool, id: i64) -> Result<Vec<i64>, sqlx::Error> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"
            WITH RECURSIVE chain(id, parent_id) AS (
                SELECT id, parent_id FROM course_contents WHERE id = $1
                UNION
                SELECT c.id, c.parent_id
                FROM course_contents c
                JOIN chain ON c.id = chain.parent_id
            )
            SELECT id FROM chain
            "#,
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Loads `parent_id` and runs [`check_parent`] against its ancestor chain
    pub async fn validate_parent(
        pool: &PgPool,
        content_id: Option<i64>,
        course_id: i64,
        parent_id: i64,
    ) -> Result<(), ParentError> {
        let parent = Self::find_by_id(pool, parent_id)
            .await?
            .ok_or(ParentError::NotFound(parent_id))?;
        let chain = Self::ancestor_ids(pool, parent_id).await?;

        check_parent(content_id, course_id, &parent, &chain)
    }

    /// Writes the patchable columns back and bumps `updated_at`
    ///
    /// `is_published` is left alone.
    pub async fn save(pool: &PgPool, content: &CourseContent) -> Result<Self, sqlx::Error> {
        let query = format!(
            "UPDATE course_contents \
             SET name = $2, description = $3, video_url = $4, file_attachment = $5, \
                 parent_id = $6, updated_at = NOW() \
             WHERE id = $1 RETURNING {CONTENT_COLUMNS}"
        );

        sqlx::query_as::<_, CourseContent>(&query)
            .bind(content.id)
            .bind(&content.name)
            .bind(&content.description)
            .bind(&content.video_url)
            .bind(&content.file_attachment)
            .bind(content.parent_id)
            .fetch_one(pool)
            .await
    }

    /// Sets the publication flag
    pub async fn set_published(
        pool: &PgPool,
        id: i64,
        is_published: bool,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "UPDATE course_contents SET is_published = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {CONTENT_COLUMNS}"
        );

        sqlx::query_as::<_, CourseContent>(&query)
            .bind(id)
            .bind(is_published)
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(id: i64, course_id: i64, parent_id: Option<i64>) -> CourseContent {
        CourseContent {
            id,
            name: format!("Materi {id}"),
            description: "-".to_string(),
            video_url: Some("https://video.example.com/1".to_string()),
            file_attachment: None,
            course_id,
            parent_id,
            teacher_id: Some(3),
            is_published: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_check_parent_same_course_new_content() {
        let parent = content(10, 1, None);
        assert!(check_parent(None, 1, &parent, &[10]).is_ok());
    }

    #[test]
    fn test_check_parent_other_course() {
        let parent = content(10, 2, None);
        assert!(matches!(
            check_parent(None, 1, &parent, &[10]),
            Err(ParentError::OtherCourse)
        ));
    }

    #[test]
    fn test_check_parent_self() {
        let parent = content(10, 1, None);
        assert!(matches!(
            check_parent(Some(10), 1, &parent, &[10]),
            Err(ParentError::SelfParent)
        ));
    }

    #[test]
    fn test_check_parent_descendant_is_cycle() {
        // 12 -> 11 -> 10; making 12 the parent of 10 closes a loop
        let parent = content(12, 1, Some(11));
        assert!(matches!(
            check_parent(Some(10), 1, &parent, &[12, 11, 10]),
            Err(ParentError::Cycle)
        ));
        assert!(check_parent(Some(20), 1, &parent, &[12, 11, 10]).is_ok());
    }

    #[test]
    fn test_update_clears_nullable_fields() {
        let mut c = content(1, 1, Some(4));

        UpdateCourseContent {
            video_url: Some(None),
            parent_id: Some(None),
            ..Default::default()
        }
        .apply_to(&mut c);

        assert_eq!(c.video_url, None);
        assert_eq!(c.parent_id, None);
        assert_eq!(c.name, "Materi 1");
    }

    #[test]
    fn test_update_absent_fields_untouched() {
        let mut c = content(1, 1, Some(4));
        let before = c.clone();

        UpdateCourseContent {
            name: Some("Pengantar".to_string()),
            ..Default::default()
        }
        .apply_to(&mut c);

        assert_eq!(c.name, "Pengantar");
        assert_eq!(c.video_url, before.video_url);
        assert_eq!(c.parent_id, before.parent_id);
        assert_eq!(c.is_published, before.is_published);
    }

    #[test]
    fn test_new_parent() {
        let patch = UpdateCourseContent {
            parent_id: Some(Some(5)),
            ..Default::default()
        };
        assert_eq!(patch.new_parent(), Some(5));
        assert_eq!(UpdateCourseContent::default().new_parent(), None);
    }
}
