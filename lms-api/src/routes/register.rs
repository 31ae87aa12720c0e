/// User registration
///
/// # Endpoint
///
/// ```text
/// POST /v1/register
/// Content-Type: application/json
///
/// {
///   "username": "budi",
///   "email": "budi@example.com",
///   "password": "Rahasia#2024",
///   "full_name": "Budi Santoso",
///   "phone_number": "08123456789",
///   "description": "Mahasiswa TI",
///   "role": "student"
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// { "message": "Registration successful", "user_id": 12 }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed or the password is too weak
/// - `409 Conflict`: username already taken
///
/// The user and its profile are written in one transaction.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    extract::ValidJson,
};
use axum::{extract::State, http::StatusCode, Json};
use lms_shared::{
    auth::password,
    models::{
        profile::{CreateProfile, Profile, ProfileRole},
        user::{CreateUser, User},
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 150, message = "Username must be 1 to 150 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// First word becomes the first name, the rest the last name
    #[serde(default)]
    #[validate(length(max = 300, message = "Full name must be at most 300 characters"))]
    pub full_name: String,

    #[validate(length(max = 20, message = "Phone number must be at most 20 characters"))]
    pub phone_number: Option<String>,

    pub description: Option<String>,

    #[serde(default)]
    pub role: ProfileRole,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
}

fn check_username(username: &str) -> ApiResult<()> {
    if username.chars().any(char::is_whitespace) {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail::new(
            "username",
            "Username must not contain whitespace",
        )]));
    }

    Ok(())
}

pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    check_username(&req.username)?;
    password::validate_password_strength(&req.password)?;

    let password_hash = password::hash_password(&req.password)?;
    let (first_name, last_name) = CreateUser::split_full_name(&req.full_name);

    let mut tx = state.db.begin().await?;

    let user = User::create_in(
        &mut tx,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
            first_name,
            last_name,
        },
    )
    .await?;

    Profile::create_in(
        &mut tx,
        CreateProfile {
            user_id: user.id,
            role: req.role,
            phone_number: req.phone_number.filter(|p| !p.is_empty()),
            description: req.description.filter(|d| !d.is_empty()),
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        user_id = user.id,
        username = %user.username,
        name = %user.full_name(),
        role = req.role.as_str(),
        "User registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful".to_string(),
            user_id: user.id,
        }),
    ))
}
