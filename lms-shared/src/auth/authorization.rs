/// Permission checks for course resources
///
/// Every check takes the caller's [`AuthContext`] and the already-loaded
/// target entity and returns `Ok(())` or a typed [`AuthzError`]. Nothing is
/// mutated on denial. Only [`require_course_member`] touches the database.
///
/// # Rules
///
/// | Action | Allowed for |
/// |---|---|
/// | Update course | the course teacher |
/// | Comment on content | members of the content's course |
/// | Delete comment | the user behind the comment's member row |
/// | Edit/delete feedback | the feedback's student |
/// | Publish content | the content's teacher |
/// | Create/update content | the course teacher or the content's teacher |
/// | Add/delete completion | the student concerned or the course teacher |
///
/// # Example
///
/// ```no_run
/// use lms_shared::auth::authorization::{require_course_member, require_course_teacher};
/// use lms_shared::auth::middleware::AuthContext;
/// use lms_shared::models::course::Course;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, auth: AuthContext, course: Course) -> Result<(), Box<dyn std::error::Error>> {
/// require_course_teacher(&auth, &course)?;
/// let member = require_course_member(&pool, &auth, course.id).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;

use super::middleware::AuthContext;
use crate::models::{
    course::Course, course_content::CourseContent, course_member::CourseMember,
    feedback::CourseFeedback,
};

#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    #[error("Only the course teacher can modify course {0}")]
    NotCourseTeacher(i64),

    #[error("Not a member of course {0}")]
    NotCourseMember(i64),

    #[error("Only the author can delete this comment")]
    NotCommentAuthor,

    #[error("Only the student who wrote this feedback can change it")]
    NotFeedbackOwner,

    #[error("Only the content teacher can do this")]
    NotContentTeacher,

    #[error("Only the student or the course teacher can change this completion")]
    NotCompletionParticipant,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub fn require_course_teacher(auth: &AuthContext, course: &Course) -> Result<(), AuthzError> {
    if course.teacher_id != auth.user_id {
        return Err(AuthzError::NotCourseTeacher(course.id));
    }

    Ok(())
}

/// Loads the caller's membership in a course
///
/// # Errors
///
/// `NotCourseMember` when the caller never enrolled.
pub async fn require_course_member(
    pool: &PgPool,
    auth: &AuthContext,
    course_id: i64,
) -> Result<CourseMember, AuthzError> {
    CourseMember::find(pool, course_id, auth.user_id)
        .await?
        .ok_or(AuthzError::NotCourseMember(course_id))
}

/// `author` is the member row the comment was written through
pub fn require_comment_author(auth: &AuthContext, author: &CourseMember) -> Result<(), AuthzError> {
    if author.user_id != auth.user_id {
        return Err(AuthzError::NotCommentAuthor);
    }

    Ok(())
}

pub fn require_feedback_owner(
    auth: &AuthContext,
    feedback: &CourseFeedback,
) -> Result<(), AuthzError> {
    if feedback.student_id != auth.user_id {
        return Err(AuthzError::NotFeedbackOwner);
    }

    Ok(())
}

/// Publishing is reserved to the teacher recorded on the content itself
pub fn require_content_teacher(
    auth: &AuthContext,
    content: &CourseContent,
) -> Result<(), AuthzError> {
    if content.teacher_id != Some(auth.user_id) {
        return Err(AuthzError::NotContentTeacher);
    }

    Ok(())
}

/// Editing content is open to the course teacher as well
///
/// Pass `None` for a content that is about to be created.
pub fn require_content_editor(
    auth: &AuthContext,
    course: &Course,
    content: Option<&CourseContent>,
) -> Result<(), AuthzError> {
    let is_course_teacher = course.teacher_id == auth.user_id;
    let is_content_teacher = content.is_some_and(|c| c.teacher_id == Some(auth.user_id));

    if !is_course_teacher && !is_content_teacher {
        return Err(AuthzError::NotContentTeacher);
    }

    Ok(())
}

pub fn require_completion_access(
    auth: &AuthContext,
    student_id: i64,
    course: &Course,
) -> Result<(), AuthzError> {
    if auth.user_id != student_id && course.teacher_id != auth.user_id {
        return Err(AuthzError::NotCompletionParticipant);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn course(teacher_id: i64) -> Course {
        Course {
            id: 1,
            name: "Jaringan Komputer".to_string(),
            description: "-".to_string(),
            price: 0,
            teacher_id,
            category_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn content(teacher_id: Option<i64>) -> CourseContent {
        CourseContent {
            id: 4,
            name: "Topologi".to_string(),
            description: "-".to_string(),
            video_url: None,
            file_attachment: None,
            course_id: 1,
            parent_id: None,
            teacher_id,
            is_published: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_course_teacher() {
        assert!(require_course_teacher(&AuthContext::new(3), &course(3)).is_ok());
        assert!(matches!(
            require_course_teacher(&AuthContext::new(4), &course(3)),
            Err(AuthzError::NotCourseTeacher(1))
        ));
    }

    #[test]
    fn test_comment_author() {
        let member = CourseMember {
            id: 9,
            course_id: 1,
            user_id: 5,
            roles: Default::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(require_comment_author(&AuthContext::new(5), &member).is_ok());
        assert!(matches!(
            require_comment_author(&AuthContext::new(6), &member),
            Err(AuthzError::NotCommentAuthor)
        ));
    }

    #[test]
    fn test_feedback_owner() {
        let feedback = CourseFeedback {
            id: 2,
            course_id: 1,
            student_id: 5,
            rating: 4,
            feedback: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(require_feedback_owner(&AuthContext::new(5), &feedback).is_ok());
        assert!(require_feedback_owner(&AuthContext::new(3), &feedback).is_err());
    }

    #[test]
    fn test_content_teacher_for_publish() {
        assert!(require_content_teacher(&AuthContext::new(3), &content(Some(3))).is_ok());
        assert!(require_content_teacher(&AuthContext::new(3), &content(None)).is_err());
        assert!(require_content_teacher(&AuthContext::new(8), &content(Some(3))).is_err());
    }

    #[test]
    fn test_content_editor() {
        let c = course(3);

        // course teacher, with or without an existing content
        assert!(require_content_editor(&AuthContext::new(3), &c, None).is_ok());
        assert!(require_content_editor(&AuthContext::new(3), &c, Some(&content(None))).is_ok());

        // content teacher who does not own the course
        assert!(require_content_editor(&AuthContext::new(7), &c, Some(&content(Some(7)))).is_ok());

        assert!(matches!(
            require_content_editor(&AuthContext::new(7), &c, None),
            Err(AuthzError::NotContentTeacher)
        ));
    }

    #[test]
    fn test_completion_access() {
        let c = course(3);

        assert!(require_completion_access(&AuthContext::new(5), 5, &c).is_ok());
        assert!(require_completion_access(&AuthContext::new(3), 5, &c).is_ok());
        assert!(matches!(
            require_completion_access(&AuthContext::new(6), 5, &c),
            Err(AuthzError::NotCompletionParticipant)
        ));
    }
}
