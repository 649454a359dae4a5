/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Test user creation with a known password
/// - JWT token generation
/// - Request building and response parsing helpers

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use taskdeck_api::app::{build_router, AppState};
use taskdeck_api::config::Config;
use taskdeck_shared::auth::jwt::{create_token, Claims};
use taskdeck_shared::auth::password::hash_password;
use taskdeck_shared::models::user::{CreateUser, User};
use tower::Service as _;
use uuid::Uuid;

/// Known password for all test users
pub const TEST_PASSWORD: &str = "password123";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    pub user: User,
    pub jwt_token: String,
}

impl TestContext {
    /// Creates a new test context with a fresh user
    pub async fn new() -> anyhow::Result<Self> {
        // Load test configuration
        let config = Config::from_env()?;

        // Connect to database
        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../migrations").run(&db).await?;

        // Create test user with a real hash so login works
        let user = User::create(
            &db,
            CreateUser {
                email: format!("test-{}@example.com", Uuid::new_v4()),
                password_hash: hash_password(TEST_PASSWORD)?,
                name: Some("Test User".to_string()),
            },
        )
        .await?;

        // Generate JWT token
        let claims = Claims::new(&user.email, config.jwt.token_ttl());
        let jwt_token = create_token(&claims, &config.jwt.secret)?;

        // Build app
        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            user,
            jwt_token,
        })
    }

    /// Creates an additional user with its own token
    pub async fn create_other_user(&self) -> anyhow::Result<(User, String)> {
        let user = User::create(
            &self.db,
            CreateUser {
                email: format!("other-{}@example.com", Uuid::new_v4()),
                password_hash: hash_password(TEST_PASSWORD)?,
                name: None,
            },
        )
        .await?;

        let claims = Claims::new(&user.email, self.config.jwt.token_ttl());
        let token = create_token(&claims, &self.config.jwt.secret)?;

        Ok((user, token))
    }

    /// Sends a JSON request and returns (status, parsed body)
    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    /// Sends a form-encoded request (login uses this)
    pub async fn send_form(&self, uri: &str, form: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, body)
    }

    /// Cleans up test data
    ///
    /// Deleting the user cascades to tasks and subtasks.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        User::delete(&self.db, self.user.id).await?;
        Ok(())
    }
}

/// Helper to create a task through the API and return its id
pub async fn create_test_task(ctx: &TestContext, body: Value) -> Uuid {
    let (status, json) = ctx
        .send_json("POST", "/api/tasks", Some(ctx.jwt_token.as_str()), Some(body))
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", json);

    json["id"].as_str().unwrap().parse().unwrap()
}
