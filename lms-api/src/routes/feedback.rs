/// Course feedback endpoints
///
/// # Endpoints
///
/// - `POST   /v1/feedbacks` - Rate a course (once per student)
/// - `GET    /v1/show-feedback?course_id=N` - Feedback of a course
/// - `PUT    /v1/edit-feedback/:id` - Change an own feedback
/// - `DELETE /v1/delete-feedback?student_id=N&feedback_id=M` - Remove an own feedback
///
/// The student is always the caller. A second feedback for the same course
/// is a 409; touching someone else's feedback is a 403.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ValidJson, ValidQuery},
    routes::{comments::MessageResponse, courses::find_course},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use lms_shared::{
    auth::{authorization::require_feedback_owner, middleware::AuthContext},
    models::{
        feedback::{CourseFeedback, CreateFeedback, MAX_RATING, MIN_RATING},
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFeedbackRequest {
    pub course_id: i64,

    #[validate(range(min = MIN_RATING, max = MAX_RATING, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    pub feedback: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditFeedbackRequest {
    #[validate(range(min = MIN_RATING, max = MAX_RATING, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    pub feedback: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CourseQuery {
    pub course_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DeleteFeedbackQuery {
    pub student_id: i64,
    pub feedback_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub message: String,
    pub feedback: CourseFeedback,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackListResponse {
    pub message: String,
    pub course_id: i64,
    pub feedbacks: Vec<CourseFeedback>,
}

/// Rate a course
///
/// ```text
/// POST /v1/feedbacks
/// Authorization: Bearer <token>
///
/// { "course_id": 1, "rating": 5, "feedback": "Sangat membantu" }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: course missing
/// - `409 Conflict`: caller already rated this course
pub async fn create_feedback(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidJson(req): ValidJson<CreateFeedbackRequest>,
) -> ApiResult<(StatusCode, Json<FeedbackResponse>)> {
    let course = find_course(&state.db, req.course_id).await?;

    let feedback = CourseFeedback::create_unique(
        &state.db,
        CreateFeedback {
            course_id: course.id,
            student_id: auth.user_id,
            rating: req.rating,
            feedback: req.feedback,
        },
    )
    .await?
    .ok_or_else(|| {
        ApiError::Conflict("You have already given feedback for this course".to_string())
    })?;

    tracing::info!(feedback_id = feedback.id, course_id = course.id, "Feedback added");

    Ok((
        StatusCode::CREATED,
        Json(FeedbackResponse {
            message: "Feedback added".to_string(),
            feedback,
        }),
    ))
}

pub async fn show_feedback(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<CourseQuery>,
) -> ApiResult<Json<FeedbackListResponse>> {
    let course = find_course(&state.db, query.course_id).await?;
    let feedbacks = CourseFeedback::list_by_course(&state.db, course.id).await?;

    Ok(Json(FeedbackListResponse {
        message: "Showing feedbacks".to_string(),
        course_id: course.id,
        feedbacks,
    }))
}

pub async fn edit_feedback(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(feedback_id): Path<i64>,
    ValidJson(req): ValidJson<EditFeedbackRequest>,
) -> ApiResult<Json<FeedbackResponse>> {
    let feedback = CourseFeedback::find_by_id(&state.db, feedback_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Feedback", feedback_id))?;
    require_feedback_owner(&auth, &feedback)?;

    let feedback = CourseFeedback::update(&state.db, feedback.id, req.rating, req.feedback).await?;

    Ok(Json(FeedbackResponse {
        message: "Feedback updated successfully".to_string(),
        feedback,
    }))
}

/// Delete a feedback
///
/// The feedback must belong to `student_id` (404 otherwise) and that student
/// must be the caller (403 otherwise).
pub async fn delete_feedback(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidQuery(query): ValidQuery<DeleteFeedbackQuery>,
) -> ApiResult<Json<MessageResponse>> {
    User::find_by_id(&state.db, query.student_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", query.student_id))?;

    let feedback = CourseFeedback::find_by_id(&state.db, query.feedback_id)
        .await?
        .filter(|f| f.student_id == query.student_id)
        .ok_or_else(|| ApiError::NotFound("Feedback not found for this student".to_string()))?;
    require_feedback_owner(&auth, &feedback)?;

    CourseFeedback::delete(&state.db, feedback.id).await?;

    tracing::info!(feedback_id = feedback.id, "Feedback deleted");

    Ok(Json(MessageResponse::new("Feedback successfully deleted")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_range() {
        for (rating, ok) in [(0, false), (1, true), (5, true), (6, false)] {
            let req = CreateFeedbackRequest {
                course_id: 1,
                rating,
                feedback: None,
            };
            assert_eq!(req.validate().is_ok(), ok, "rating {rating}");
        }
    }

    #[test]
    fn test_edit_rating_follows_model_bounds() {
        for (rating, ok) in [
            (MIN_RATING - 1, false),
            (MIN_RATING, true),
            (MAX_RATING, true),
            (MAX_RATING + 1, false),
        ] {
            let req = EditFeedbackRequest {
                rating,
                feedback: None,
            };
            assert_eq!(req.validate().is_ok(), ok, "rating {rating}");
        }
    }
}
