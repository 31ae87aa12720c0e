/// Course endpoints
///
/// # Endpoints
///
/// - `GET  /v1/courses?page=N` - Paginated course list, newest first
/// - `GET  /v1/courses/:id` - Course detail
/// - `POST /v1/courses` - Create a course taught by the caller
/// - `POST /v1/courses/:id` - Partial update (course teacher only)
/// - `POST /v1/create-course` - Create a course for any teacher
/// - `PUT  /v1/update-course/:id` - Partial update returning IDs only
/// - `GET  /v1/mycourses` - Enrollments of the caller
/// - `POST /v1/courses/:id/enroll` - Enroll the caller as a student
///
/// Updates by anyone but the course teacher are rejected with 401.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{double_option, ValidJson, ValidQuery},
    pagination::{Page, PageQuery},
    views::{self, CourseMemberOut, CourseOut},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use lms_shared::{
    auth::{authorization::require_course_teacher, middleware::AuthContext},
    models::{
        category::CourseCategory,
        course::{Course, CreateCourse, UpdateCourse},
        course_member::{CourseMember, CreateCourseMember, MemberRole},
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: String,

    pub description: String,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price: i32,

    /// Teacher of the course; defaults to the caller
    pub teacher_id: Option<i64>,

    pub category_id: Option<i64>,
}

/// Partial course update
///
/// Absent or `null` fields are left untouched, except `category_id` where an
/// explicit `null` removes the category.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCourseRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price: Option<i32>,

    pub teacher_id: Option<i64>,

    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<i64>>,
}

impl From<UpdateCourseRequest> for UpdateCourse {
    fn from(req: UpdateCourseRequest) -> Self {
        UpdateCourse {
            name: req.name,
            description: req.description,
            price: req.price,
            teacher_id: req.teacher_id,
            category_id: req.category_id,
        }
    }
}

/// Response of the ID-only course endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct CourseIdsResponse {
    pub message: String,
    pub course_id: i64,
    pub category_id: Option<i64>,
    pub teacher_id: i64,
}

impl CourseIdsResponse {
    fn new(message: &str, course: &Course) -> Self {
        Self {
            message: message.to_string(),
            course_id: course.id,
            category_id: course.category_id,
            teacher_id: course.teacher_id,
        }
    }
}

pub(crate) async fn find_course(pool: &PgPool, id: i64) -> ApiResult<Course> {
    Course::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course", id))
}

/// Checks that the teacher and category a course should point to exist
async fn ensure_references(
    pool: &PgPool,
    teacher_id: Option<i64>,
    category_id: Option<i64>,
) -> ApiResult<()> {
    if let Some(id) = teacher_id {
        User::find_by_id(pool, id)
            .await?
            .ok_or_else(|| ApiError::not_found("User", id))?;
    }

    if let Some(id) = category_id {
        CourseCategory::find_by_id(pool, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Category", id))?;
    }

    Ok(())
}

async fn insert_course(
    pool: &PgPool,
    auth: &AuthContext,
    req: CreateCourseRequest,
) -> ApiResult<Course> {
    let teacher_id = req.teacher_id.unwrap_or(auth.user_id);
    ensure_references(pool, Some(teacher_id), req.category_id).await?;

    let course = Course::create(
        pool,
        CreateCourse {
            name: req.name,
            description: req.description,
            price: req.price,
            teacher_id,
            category_id: req.category_id,
        },
    )
    .await?;

    tracing::info!(course_id = course.id, teacher_id, "Course created");
    Ok(course)
}

/// Loads the course, checks the caller teaches it and applies the patch
async fn patch_course(
    pool: &PgPool,
    auth: &AuthContext,
    course_id: i64,
    req: UpdateCourseRequest,
) -> ApiResult<Course> {
    let mut course = find_course(pool, course_id).await?;
    require_course_teacher(auth, &course)?;

    let patch = UpdateCourse::from(req);
    ensure_references(pool, patch.teacher_id, patch.category_id.flatten()).await?;

    if patch.is_empty() {
        return Ok(course);
    }

    patch.apply_to(&mut course);
    let course = Course::save(pool, &course).await?;

    tracing::info!(course_id, user_id = auth.user_id, "Course updated");
    Ok(course)
}

/// List courses
///
/// ```text
/// GET /v1/courses?page=2
/// ```
///
/// Returns `{ "items": [CourseOut], "count": <total> }`.
pub async fn list_courses(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<PageQuery>,
) -> ApiResult<Json<Page<CourseOut>>> {
    let (limit, offset) = query.limit_offset(state.config.pagination.page_size);

    let courses = Course::list(&state.db, limit, offset).await?;
    let count = Course::count(&state.db).await?;

    Ok(Json(Page {
        items: views::course_views(&state.db, courses).await?,
        count,
    }))
}

pub async fn detail_course(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> ApiResult<Json<CourseOut>> {
    let course = find_course(&state.db, course_id).await?;
    Ok(Json(views::course_view(&state.db, course).await?))
}

/// Create a course taught by the caller
///
/// ```text
/// POST /v1/courses
/// Authorization: Bearer <token>
///
/// { "name": "Basis Data", "description": "SQL dasar", "price": 150000 }
/// ```
///
/// Responds 201 with the `CourseOut`.
pub async fn create_course(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidJson(mut req): ValidJson<CreateCourseRequest>,
) -> ApiResult<(StatusCode, Json<CourseOut>)> {
    req.teacher_id = None;
    let course = insert_course(&state.db, &auth, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(views::course_view(&state.db, course).await?),
    ))
}

/// Update a course (teacher only)
///
/// ```text
/// POST /v1/courses/:id
/// Authorization: Bearer <token>
///
/// { "price": 99000 }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: caller is not the course teacher
/// - `404 Not Found`: course, new teacher or new category missing
pub async fn update_course(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(course_id): Path<i64>,
    ValidJson(req): ValidJson<UpdateCourseRequest>,
) -> ApiResult<Json<CourseOut>> {
    let course = patch_course(&state.db, &auth, course_id, req).await?;
    Ok(Json(views::course_view(&state.db, course).await?))
}

/// Create a course for the given teacher (caller if omitted)
///
/// Responds 201 with `{ message, course_id, category_id, teacher_id }`.
pub async fn create_course_by_ids(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidJson(req): ValidJson<CreateCourseRequest>,
) -> ApiResult<(StatusCode, Json<CourseIdsResponse>)> {
    let course = insert_course(&state.db, &auth, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CourseIdsResponse::new("Course created successfully", &course)),
    ))
}

pub async fn update_course_by_ids(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(course_id): Path<i64>,
    ValidJson(req): ValidJson<UpdateCourseRequest>,
) -> ApiResult<Json<CourseIdsResponse>> {
    let course = patch_course(&state.db, &auth, course_id, req).await?;
    Ok(Json(CourseIdsResponse::new("Course updated successfully", &course)))
}

/// Courses the caller is enrolled in, one entry per enrollment row
pub async fn my_courses(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<CourseMemberOut>>> {
    let members = CourseMember::list_by_user(&state.db, auth.user_id).await?;
    Ok(Json(views::member_views(&state.db, members).await?))
}

/// Enroll the caller as a student
///
/// ```text
/// POST /v1/courses/:id/enroll
/// Authorization: Bearer <token>
/// ```
///
/// Enrolling again creates another membership row.
pub async fn enroll_course(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(course_id): Path<i64>,
) -> ApiResult<(StatusCode, Json<CourseMemberOut>)> {
    let course = find_course(&state.db, course_id).await?;

    let member = CourseMember::create(
        &state.db,
        CreateCourseMember {
            course_id: course.id,
            user_id: auth.user_id,
            roles: MemberRole::Std,
        },
    )
    .await?;

    tracing::info!(course_id, user_id = auth.user_id, member_id = member.id, "User enrolled");

    Ok((
        StatusCode::CREATED,
        Json(views::member_view(&state.db, member).await?),
    ))
}
