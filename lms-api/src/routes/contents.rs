/// Course content endpoints
///
/// # Endpoints
///
/// - `GET  /v1/courses/:id/contents` - All contents of a course (mini view)
/// - `POST /v1/courses/:id/contents` - Add content (course teacher)
/// - `GET  /v1/courses/:id/contents/:content_id` - Content detail
/// - `PUT  /v1/update-content/:id` - Partial content update
/// - `PUT  /v1/publish-content/:id` - Toggle publication (content teacher)
/// - `GET  /v1/course-content/:course_id` - Listing gated by the caller's role
///
/// Setting a parent is checked against the content tree: the parent must
/// exist in the same course and must not be the content or one of its
/// descendants.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{double_option, ValidJson},
    routes::courses::find_course,
    views::{self, ContentFull, ContentMini},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use lms_shared::{
    auth::{
        authorization::{require_content_editor, require_content_teacher},
        middleware::AuthContext,
    },
    models::{
        course_content::{CourseContent, CreateCourseContent, UpdateCourseContent},
        profile::Profile,
    },
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateContentRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1 to 200 characters"))]
    pub name: String,

    pub description: Option<String>,

    #[validate(url(message = "Invalid video URL"), length(max = 200))]
    pub video_url: Option<String>,

    #[validate(length(max = 255))]
    pub file_attachment: Option<String>,

    pub parent_id: Option<i64>,

    #[serde(default)]
    pub is_published: bool,
}

/// Partial content update
///
/// `video_url`, `file_attachment` and `parent_id` accept an explicit `null`
/// to clear the column. An `is_published` key is ignored; publication goes
/// through `publish-content`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateContentRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1 to 200 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub video_url: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub file_attachment: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<i64>>,
}

impl From<UpdateContentRequest> for UpdateCourseContent {
    fn from(req: UpdateContentRequest) -> Self {
        UpdateCourseContent {
            name: req.name,
            description: req.description,
            video_url: req.video_url,
            file_attachment: req.file_attachment,
            parent_id: req.parent_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct PublishContentRequest {
    pub is_published: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContentUpdatedResponse {
    pub message: String,
    pub content_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublishResponse {
    pub message: String,
    pub is_published: bool,
}

/// Entry of the role-gated listing
#[derive(Debug, Serialize, Deserialize)]
pub struct ContentEntry {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub video_url: Option<String>,
    pub file_attachment: Option<String>,
    pub is_published: bool,
}

impl From<CourseContent> for ContentEntry {
    fn from(content: CourseContent) -> Self {
        Self {
            id: content.id,
            name: content.name,
            description: content.description,
            video_url: content.video_url,
            file_attachment: content.file_attachment,
            is_published: content.is_published,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CourseContentsResponse {
    pub message: String,
    pub contents: Vec<ContentEntry>,
}

pub(crate) async fn find_content(pool: &PgPool, id: i64) -> ApiResult<CourseContent> {
    CourseContent::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Content", id))
}

pub async fn list_contents(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> ApiResult<Json<Vec<ContentMini>>> {
    find_course(&state.db, course_id).await?;

    let contents = CourseContent::list_by_course(&state.db, course_id).await?;
    Ok(Json(views::content_minis(&state.db, contents).await?))
}

/// Add content to a course
///
/// ```text
/// POST /v1/courses/:id/contents
/// Authorization: Bearer <token>
///
/// { "name": "Bab 2: Normalisasi", "parent_id": 14 }
/// ```
///
/// The caller becomes the content's teacher. Responds 201 with `ContentFull`.
///
/// # Errors
///
/// - `400 Bad Request`: parent missing or in another course
/// - `403 Forbidden`: caller does not teach the course
pub async fn create_content(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(course_id): Path<i64>,
    ValidJson(req): ValidJson<CreateContentRequest>,
) -> ApiResult<(StatusCode, Json<ContentFull>)> {
    let course = find_course(&state.db, course_id).await?;
    require_content_editor(&auth, &course, None)?;

    if let Some(parent_id) = req.parent_id {
        CourseContent::validate_parent(&state.db, None, course_id, parent_id).await?;
    }

    let content = CourseContent::create(
        &state.db,
        CreateCourseContent {
            name: req.name,
            description: req.description.unwrap_or_else(|| "-".to_string()),
            video_url: req.video_url,
            file_attachment: req.file_attachment,
            course_id,
            parent_id: req.parent_id,
            teacher_id: Some(auth.user_id),
            is_published: req.is_published,
        },
    )
    .await?;

    tracing::info!(course_id, content_id = content.id, "Content created");

    Ok((
        StatusCode::CREATED,
        Json(views::content_full(&state.db, content).await?),
    ))
}

/// Content detail
///
/// A content that exists but belongs to another course is reported as 404.
pub async fn detail_content(
    State(state): State<AppState>,
    Path((course_id, content_id)): Path<(i64, i64)>,
) -> ApiResult<Json<ContentFull>> {
    let content = find_content(&state.db, content_id).await?;

    if content.course_id != course_id {
        return Err(ApiError::NotFound(format!(
            "Content {} not found in course {}",
            content_id, course_id
        )));
    }

    Ok(Json(views::content_full(&state.db, content).await?))
}

pub async fn update_content(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(content_id): Path<i64>,
    ValidJson(req): ValidJson<UpdateContentRequest>,
) -> ApiResult<Json<ContentUpdatedResponse>> {
    let mut content = find_content(&state.db, content_id).await?;
    let course = find_course(&state.db, content.course_id).await?;
    require_content_editor(&auth, &course, Some(&content))?;

    let patch = UpdateCourseContent::from(req);
    if let Some(parent_id) = patch.new_parent() {
        CourseContent::validate_parent(&state.db, Some(content.id), content.course_id, parent_id)
            .await?;
    }

    patch.apply_to(&mut content);
    let content = CourseContent::save(&state.db, &content).await?;

    tracing::info!(content_id, user_id = auth.user_id, "Content updated");

    Ok(Json(ContentUpdatedResponse {
        message: "Course content updated successfully".to_string(),
        content_id: content.id,
    }))
}

/// Publish or unpublish content
///
/// ```text
/// PUT /v1/publish-content/:id
///
/// { "is_published": true }
/// ```
///
/// Only the teacher recorded on the content may do this (403 otherwise).
pub async fn publish_content(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(content_id): Path<i64>,
    ValidJson(req): ValidJson<PublishContentRequest>,
) -> ApiResult<Json<PublishResponse>> {
    let content = find_content(&state.db, content_id).await?;
    require_content_teacher(&auth, &content)?;

    let content = CourseContent::set_published(&state.db, content.id, req.is_published).await?;

    tracing::info!(content_id, is_published = content.is_published, "Content publication changed");

    Ok(Json(PublishResponse {
        message: "Course content publication status updated successfully".to_string(),
        is_published: content.is_published,
    }))
}

/// Contents visible to the caller
///
/// Callers whose profile role is `teacher` see drafts too; everybody else
/// only sees published contents.
pub async fn course_contents_for_role(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(course_id): Path<i64>,
) -> ApiResult<Json<CourseContentsResponse>> {
    find_course(&state.db, course_id).await?;

    let role = Profile::role_of(&state.db, auth.user_id).await?;
    let contents = if role.sees_unpublished() {
        CourseContent::list_by_course(&state.db, course_id).await?
    } else {
        CourseContent::list_published_by_course(&state.db, course_id).await?
    };

    Ok(Json(CourseContentsResponse {
        message: "Course content fetched successfully".to_string(),
        contents: contents.into_iter().map(ContentEntry::from).collect(),
    }))
}
