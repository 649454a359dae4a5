/// Authentication primitives for TaskDeck
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Signed, time-limited access tokens carrying the user's email
/// - [`middleware`]: The `CurrentUser` extractor filled in by the API's auth layer
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::auth::jwt::{create_token, Claims};
/// use taskdeck_shared::auth::password::{hash_password, verify_password};
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new("user@example.com", Duration::minutes(30));
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
