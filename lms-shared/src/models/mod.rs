/// Database models for the LMS
///
/// One module per table, each with its row struct, input structs and CRUD
/// operations.
///
/// # Models
///
/// - `user`: User accounts
/// - `profile`: Per-user role (teacher/student) and contact details
/// - `category`: Course categories
/// - `course`: Courses owned by a teacher
/// - `course_member`: Enrollment of users in courses
/// - `course_content`: Content tree of a course
/// - `comment`: Member comments on content
/// - `feedback`: One rated feedback per student and course
/// - `completion`: Per-student content completion
///
/// # Example
///
/// ```no_run
/// use lms_shared::models::course::Course;
/// use lms_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let newest = Course::list(&pool, 10, 0).await?;
/// # Ok(())
/// # }
/// ```

pub mod category;
pub mod comment;
pub mod completion;
pub mod course;
pub mod course_content;
pub mod course_member;
pub mod feedback;
pub mod profile;
pub mod user;
