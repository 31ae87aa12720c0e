/// API route handlers, one module per resource
///
/// - `health`: Health check
/// - `register`: User registration
/// - `courses`: Courses and enrollment
/// - `contents`: Course content tree and publication
/// - `comments`: Comments on content
/// - `feedback`: Course ratings
/// - `categories`: Course categories
/// - `completion`: Content completion tracking

pub mod categories;
pub mod comments;
pub mod completion;
pub mod contents;
pub mod courses;
pub mod feedback;
pub mod health;
pub mod register;
