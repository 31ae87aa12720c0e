/// Content completion endpoints
///
/// # Endpoints
///
/// - `POST   /v1/add-completion` - Mark a content completed for a student
/// - `GET    /v1/show-completion?course_id=N` - Completions across a course
/// - `DELETE /v1/delete-completion?student_id=N&content_id=M` - Undo a completion
///
/// Adding and deleting are open to the student concerned and to the
/// teacher of the content's course (403 for anyone else). Marking twice
/// only refreshes `completed_at`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ValidJson, ValidQuery},
    routes::{
        comments::MessageResponse, contents::find_content, courses::find_course,
        feedback::CourseQuery,
    },
};
use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use lms_shared::{
    auth::{authorization::require_completion_access, middleware::AuthContext},
    models::{
        completion::{CompletionEntry, CompletionTracking},
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct AddCompletionRequest {
    #[validate(length(min = 1, message = "Student username is required"))]
    pub student_username: String,

    pub content_id: i64,

    pub course_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DeleteCompletionQuery {
    pub student_id: i64,
    pub content_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub student_username: String,
    pub content_id: i64,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompletionListResponse {
    pub course_id: i64,
    pub completions: Vec<CompletionEntry>,
}

/// Mark a content completed
///
/// ```text
/// POST /v1/add-completion
///
/// { "student_username": "budi", "content_id": 8, "course_id": 1 }
/// ```
///
/// `content_id` must belong to `course_id` (400 otherwise).
pub async fn add_completion(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidJson(req): ValidJson<AddCompletionRequest>,
) -> ApiResult<Json<CompletionResponse>> {
    let student = User::find_by_username(&state.db, &req.student_username)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", req.student_username)))?;

    let content = find_content(&state.db, req.content_id).await?;
    if content.course_id != req.course_id {
        return Err(ApiError::BadRequest(format!(
            "Content {} does not belong to course {}",
            content.id, req.course_id
        )));
    }

    let course = find_course(&state.db, content.course_id).await?;
    require_completion_access(&auth, student.id, &course)?;

    let completion = CompletionTracking::mark_completed(&state.db, student.id, content.id).await?;

    tracing::info!(student_id = student.id, content_id = content.id, "Content completed");

    Ok(Json(CompletionResponse {
        student_username: student.username,
        content_id: completion.content_id,
        completed: completion.completed,
        completed_at: completion.completed_at,
    }))
}

pub async fn show_completion(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<CourseQuery>,
) -> ApiResult<Json<CompletionListResponse>> {
    let course = find_course(&state.db, query.course_id).await?;
    let completions = CompletionTracking::list_by_course(&state.db, course.id).await?;

    Ok(Json(CompletionListResponse {
        course_id: course.id,
        completions,
    }))
}

pub async fn delete_completion(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidQuery(query): ValidQuery<DeleteCompletionQuery>,
) -> ApiResult<Json<MessageResponse>> {
    let student = User::find_by_id(&state.db, query.student_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", query.student_id))?;

    let content = find_content(&state.db, query.content_id).await?;
    let course = find_course(&state.db, content.course_id).await?;
    require_completion_access(&auth, student.id, &course)?;

    if !CompletionTracking::delete(&state.db, student.id, content.id).await? {
        return Err(ApiError::NotFound(
            "Completion not found for this student and content".to_string(),
        ));
    }

    tracing::info!(student_id = student.id, content_id = content.id, "Completion deleted");

    Ok(Json(MessageResponse::new("Completion successfully deleted")))
}
