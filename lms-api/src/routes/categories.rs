/// Course category endpoints
///
/// - `POST   /v1/add-category` - `{ "name": "Pemrograman" }`, 201, 409 on a duplicate name
/// - `GET    /v1/show-categories`
/// - `DELETE /v1/delete-category/:id` - Courses in it lose their category

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    extract::ValidJson,
    routes::comments::MessageResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use lms_shared::models::category::CourseCategory;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: String,
}

impl CategoryRequest {
    /// The name without surrounding whitespace, rejected when nothing is left
    pub fn trimmed_name(&self) -> ApiResult<&str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ApiError::ValidationError(vec![ValidationErrorDetail::new(
                "name",
                "Name must not be blank",
            )]));
        }

        Ok(name)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryCreatedResponse {
    pub message: String,
    pub category_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryListResponse {
    pub categories: Vec<CourseCategory>,
}

pub async fn add_category(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CategoryRequest>,
) -> ApiResult<(StatusCode, Json<CategoryCreatedResponse>)> {
    let category = CourseCategory::create(&state.db, req.trimmed_name()?).await?;

    tracing::info!(category_id = category.id, name = %category.name, "Category added");

    Ok((
        StatusCode::CREATED,
        Json(CategoryCreatedResponse {
            message: "Category added successfully".to_string(),
            category_id: category.id,
        }),
    ))
}

pub async fn show_categories(
    State(state): State<AppState>,
) -> ApiResult<Json<CategoryListResponse>> {
    Ok(Json(CategoryListResponse {
        categories: CourseCategory::list(&state.db).await?,
    }))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    if !CourseCategory::delete(&state.db, category_id).await? {
        return Err(ApiError::not_found("Category", category_id));
    }

    tracing::info!(category_id, "Category deleted");

    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
