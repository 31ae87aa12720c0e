/// Response views with related entities embedded inline
///
/// Relations are resolved eagerly with one `ANY($1)` query per related
/// table, however many rows are being rendered. For example rendering 30
/// comments costs one query for contents, one for members, one for courses
/// and one for users.
///
/// # Shapes
///
/// ```text
/// CourseOut        { id, name, description, price, category_id, teacher: UserOut, ... }
/// CourseMemberOut  { id, course: CourseOut, user: UserOut, roles, created_at }
/// ContentMini      { id, name, description, course: CourseOut, ... }
/// ContentFull      { ContentMini + video_url, file_attachment, parent_id, is_published }
/// CommentOut       { id, content: ContentMini, member: CourseMemberOut, comment, ... }
/// ```

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use lms_shared::models::{
    comment::Comment,
    course::Course,
    course_content::CourseContent,
    course_member::{CourseMember, MemberRole},
    user::User,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserOut {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for UserOut {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseOut {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: i32,
    pub category_id: Option<i64>,
    pub teacher: UserOut,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CourseOut {
    pub fn new(course: Course, teacher: UserOut) -> Self {
        Self {
            id: course.id,
            name: course.name,
            description: course.description,
            price: course.price,
            category_id: course.category_id,
            teacher,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseMemberOut {
    pub id: i64,
    pub course: CourseOut,
    pub user: UserOut,
    pub roles: MemberRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentMini {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub course: CourseOut,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentFull {
    #[serde(flatten)]
    pub mini: ContentMini,
    pub video_url: Option<String>,
    pub file_attachment: Option<String>,
    pub parent_id: Option<i64>,
    pub is_published: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentOut {
    pub id: i64,
    pub content: ContentMini,
    pub member: CourseMemberOut,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Distinct IDs in first-seen order
fn unique_ids(ids: impl IntoIterator<Item = i64>) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

fn lookup<'a, T>(map: &'a HashMap<i64, T>, entity: &str, id: i64) -> ApiResult<&'a T> {
    map.get(&id)
        .ok_or_else(|| ApiError::InternalError(format!("Dangling reference to {} {}", entity, id)))
}

async fn users_by_id(pool: &PgPool, ids: Vec<i64>) -> ApiResult<HashMap<i64, UserOut>> {
    let users = User::find_many(pool, &unique_ids(ids)).await?;
    Ok(users.iter().map(|u| (u.id, UserOut::from(u))).collect())
}

async fn courses_by_id(pool: &PgPool, ids: Vec<i64>) -> ApiResult<HashMap<i64, CourseOut>> {
    let courses = Course::find_many(pool, &unique_ids(ids)).await?;
    let views = course_views(pool, courses).await?;
    Ok(views.into_iter().map(|c| (c.id, c)).collect())
}

/// Renders courses with their teacher embedded, preserving input order
pub async fn course_views(pool: &PgPool, courses: Vec<Course>) -> ApiResult<Vec<CourseOut>> {
    let teachers = users_by_id(pool, courses.iter().map(|c| c.teacher_id).collect()).await?;

    courses
        .into_iter()
        .map(|course| {
            let teacher = lookup(&teachers, "user", course.teacher_id)?.clone();
            Ok(CourseOut::new(course, teacher))
        })
        .collect()
}

pub async fn course_view(pool: &PgPool, course: Course) -> ApiResult<CourseOut> {
    single(course_views(pool, vec![course]).await?)
}

pub async fn member_views(
    pool: &PgPool,
    members: Vec<CourseMember>,
) -> ApiResult<Vec<CourseMemberOut>> {
    let courses = courses_by_id(pool, members.iter().map(|m| m.course_id).collect()).await?;
    let users = users_by_id(pool, members.iter().map(|m| m.user_id).collect()).await?;

    members
        .into_iter()
        .map(|member| {
            Ok(CourseMemberOut {
                id: member.id,
                course: lookup(&courses, "course", member.course_id)?.clone(),
                user: lookup(&users, "user", member.user_id)?.clone(),
                roles: member.roles,
                created_at: member.created_at,
            })
        })
        .collect()
}

pub async fn member_view(pool: &PgPool, member: CourseMember) -> ApiResult<CourseMemberOut> {
    single(member_views(pool, vec![member]).await?)
}

fn mini(content: &CourseContent, course: CourseOut) -> ContentMini {
    ContentMini {
        id: content.id,
        name: content.name.clone(),
        description: content.description.clone(),
        course,
        created_at: content.created_at,
        updated_at: content.updated_at,
    }
}

pub async fn content_minis(
    pool: &PgPool,
    contents: Vec<CourseContent>,
) -> ApiResult<Vec<ContentMini>> {
    let courses = courses_by_id(pool, contents.iter().map(|c| c.course_id).collect()).await?;

    contents
        .iter()
        .map(|content| {
            let course = lookup(&courses, "course", content.course_id)?.clone();
            Ok(mini(content, course))
        })
        .collect()
}

pub async fn content_full(pool: &PgPool, content: CourseContent) -> ApiResult<ContentFull> {
    let course = Course::find_by_id(pool, content.course_id)
        .await?
        .ok_or_else(|| ApiError::InternalError(format!("Dangling reference to course {}", content.course_id)))?;
    let course = course_view(pool, course).await?;

    Ok(ContentFull {
        mini: mini(&content, course),
        video_url: content.video_url,
        file_attachment: content.file_attachment,
        parent_id: content.parent_id,
        is_published: content.is_published,
    })
}

pub async fn comment_views(pool: &PgPool, comments: Vec<Comment>) -> ApiResult<Vec<CommentOut>> {
    let contents =
        CourseContent::find_many(pool, &unique_ids(comments.iter().map(|c| c.content_id))).await?;
    let contents: HashMap<i64, ContentMini> = content_minis(pool, contents)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let members =
        CourseMember::find_many(pool, &unique_ids(comments.iter().map(|c| c.member_id))).await?;
    let members: HashMap<i64, CourseMemberOut> = member_views(pool, members)
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    comments
        .into_iter()
        .map(|comment| {
            Ok(CommentOut {
                id: comment.id,
                content: lookup(&contents, "content", comment.content_id)?.clone(),
                member: lookup(&members, "member", comment.member_id)?.clone(),
                comment: comment.comment,
                created_at: comment.created_at,
                updated_at: comment.updated_at,
            })
        })
        .collect()
}

pub async fn comment_view(pool: &PgPool, comment: Comment) -> ApiResult<CommentOut> {
    single(comment_views(pool, vec![comment]).await?)
}

fn single<T>(views: Vec<T>) -> ApiResult<T> {
    views
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::InternalError("Empty view".to_string()))
}
