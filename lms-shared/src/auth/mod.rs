/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength rules
/// - [`jwt`]: HS256 access token creation and validation
/// - [`middleware`]: Bearer header extraction into an [`middleware::AuthContext`]
/// - [`authorization`]: Ownership and membership checks on course resources
///
/// # Example
///
/// ```no_run
/// use lms_shared::auth::password::hash_password;
/// use lms_shared::auth::jwt::{create_token, validate_access_token, Claims, TokenType};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("Kuat#Sekali9")?;
/// assert!(hash.starts_with("$argon2id$"));
///
/// let secret = "a-secret-key-of-at-least-32-bytes!!";
/// let token = create_token(&Claims::new(1, TokenType::Access), secret)?;
/// assert_eq!(validate_access_token(&token, secret)?.sub, 1);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
