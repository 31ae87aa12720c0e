/// Comment endpoints
///
/// # Endpoints
///
/// - `GET    /v1/contents/:id/comments` - Comments on a content
/// - `POST   /v1/contents/:id/comments` - Comment as a course member
/// - `DELETE /v1/comments/:id` - Delete an own comment
///
/// Non-members commenting and non-authors deleting get 401; nothing is
/// written in either case.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidJson,
    routes::contents::find_content,
    views::{self, CommentOut},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use lms_shared::{
    auth::{
        authorization::{require_comment_author, require_course_member},
        middleware::AuthContext,
    },
    models::{
        comment::{Comment, CreateComment},
        course_member::CourseMember,
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, message = "Comment must not be empty"))]
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(content_id): Path<i64>,
) -> ApiResult<Json<Vec<CommentOut>>> {
    find_content(&state.db, content_id).await?;

    let comments = Comment::list_by_content(&state.db, content_id).await?;
    Ok(Json(views::comment_views(&state.db, comments).await?))
}

/// Comment on a content
///
/// ```text
/// POST /v1/contents/:id/comments
/// Authorization: Bearer <token>
///
/// { "comment": "Terima kasih, materinya jelas" }
/// ```
///
/// The comment is attached to the caller's membership in the content's
/// course. Responds 201 with `CommentOut`.
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(content_id): Path<i64>,
    ValidJson(req): ValidJson<CommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentOut>)> {
    let content = find_content(&state.db, content_id).await?;
    let member = require_course_member(&state.db, &auth, content.course_id).await?;

    let comment = Comment::create(
        &state.db,
        CreateComment {
            content_id: content.id,
            member_id: member.id,
            comment: req.comment,
        },
    )
    .await?;

    tracing::debug!(comment_id = comment.id, content_id, member_id = member.id, "Comment created");

    Ok((
        StatusCode::CREATED,
        Json(views::comment_view(&state.db, comment).await?),
    ))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(comment_id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let comment = Comment::find_by_id(&state.db, comment_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment", comment_id))?;

    let author = CourseMember::find_by_id(&state.db, comment.member_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Member", comment.member_id))?;
    require_comment_author(&auth, &author)?;

    if !Comment::delete(&state.db, comment.id).await? {
        return Err(ApiError::not_found("Comment", comment_id));
    }

    tracing::debug!(comment_id, user_id = auth.user_id, "Comment deleted");

    Ok(Json(MessageResponse::new("Comment deleted")))
}
