/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register a new user, returns `{user, token}`
/// - `POST /api/auth/login` - Form login, returns `{user, token}`
/// - `GET  /api/auth/me` - The caller's own profile (bearer)
/// - `POST /api/auth/logout` - Stateless acknowledgement
///
/// Tokens are self-contained and expire on their own; logout therefore has
/// nothing to invalidate server-side and only acknowledges.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, http::StatusCode, Form, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{jwt, middleware::CurrentUser, password},
    models::user::{CreateUser, User},
};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (minimum length checked before any store mutation)
    pub password: String,

    /// Optional display name
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,
}

/// Form-encoded login request
///
/// OAuth2-style password form: `username` carries the email address.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Email address
    pub username: String,

    /// Password
    pub password: String,
}

/// User profile as exposed on the wire
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User ID
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Optional display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        }
    }
}

/// Response for register and login: the profile plus a fresh access token
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The user's profile
    pub user: UserProfile,

    /// Signed access token (send as `Authorization: Bearer <token>`)
    pub token: String,
}

/// Logout acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    /// Acknowledgement message
    pub message: String,
}

/// Register a new user
///
/// Validation (email format, password length) runs before any store
/// mutation. A duplicate email is a 409 Conflict and never creates a second
/// row.
///
/// # Errors
///
/// - `409 Conflict`: Email already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    password::validate_password_length(&req.password).map_err(|message| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message,
        }])
    })?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    // The unique constraint on email backstops the existence check above if
    // two registrations race; the violation also maps to Conflict
    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
            name: req.name,
        },
    )
    .await?;

    let claims = jwt::Claims::new(&user.email, state.token_ttl());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "Registered new user");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

/// Login with email and password
///
/// The same generic 401 is returned whether the email is unknown or the
/// password is wrong.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<AuthResponse>> {
    let user = User::find_by_email(&state.db, &form.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Incorrect email or password".to_string()))?;

    let valid = password::verify_password(&form.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Incorrect email or password".to_string(),
        ));
    }

    let claims = jwt::Claims::new(&user.email, state.token_ttl());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(AuthResponse {
        user: user.into(),
        token,
    }))
}

/// The caller's own profile
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(user.into())
}

/// Logout acknowledgement
///
/// The server holds no session state; the client discards its token.
pub async fn logout() -> Json<LogoutResponse> {
    Json(LogoutResponse {
        message: "Logged out successfully".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_profile_is_camel_case() {
        let profile = UserProfile {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            name: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("createdAt"));
        assert!(!json.contains("created_at"));
        // Absent name is suppressed, not serialized as null
        assert!(!json.contains("name"));
    }

    #[test]
    fn test_register_request_email_validation() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
            name: None,
        };
        assert!(req.validate().is_err());

        let req = RegisterRequest {
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
            name: None,
        };
        assert!(req.validate().is_ok());
    }
}
