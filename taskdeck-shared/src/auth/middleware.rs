/// Request authentication context
///
/// The API's auth layer validates the bearer token, resolves the subject
/// email to a [`User`](crate::models::user::User) row, and inserts the user
/// into the request extensions. Protected handlers then receive the caller
/// as an explicit [`CurrentUser`] argument; there is no ambient or
/// thread-local identity.
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::auth::middleware::CurrentUser;
///
/// async fn protected_handler(CurrentUser(user): CurrentUser) -> String {
///     format!("Hello, {}!", user.email)
/// }
/// ```

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};

use crate::models::user::User;

/// Errors raised while authenticating a request
///
/// All variants except `DatabaseError` surface to the client as the same
/// generic 401 so a response cannot reveal whether a subject exists.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Authorization header absent or not a Bearer credential
    #[error("Missing credentials")]
    MissingCredentials,

    /// Token failed validation (bad signature, malformed, expired)
    #[error("Invalid or expired token: {0}")]
    InvalidToken(String),

    /// Token was valid but its subject no longer maps to a user
    #[error("Unknown subject")]
    UnknownSubject,

    /// Store failure during user lookup
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            // Same body for every credential failure; a 401 must not reveal
            // whether the subject exists
            AuthError::MissingCredentials
            | AuthError::InvalidToken(_)
            | AuthError::UnknownSubject => (
                StatusCode::UNAUTHORIZED,
                axum::Json(serde_json::json!({
                    "error": "unauthorized",
                    "message": "Not authenticated",
                })),
            )
                .into_response(),
            AuthError::DatabaseError(e) => {
                tracing::error!("Auth lookup failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    axum::Json(serde_json::json!({
                        "error": "internal_error",
                        "message": "Internal server error",
                    })),
                )
                    .into_response()
            }
        }
    }
}

/// The authenticated caller, resolved by the auth layer
///
/// Extraction fails with `AuthError::MissingCredentials` if the auth layer
/// did not run for this route; protected handlers must sit behind it.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AuthError::MissingCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        assert_eq!(AuthError::MissingCredentials.to_string(), "Missing credentials");
        assert_eq!(AuthError::UnknownSubject.to_string(), "Unknown subject");
    }
}
