/// Database models for TaskDeck
///
/// Each model owns its CRUD operations; entities are only ever created,
/// mutated, and deleted through these methods, never through ad-hoc SQL in
/// handlers.
///
/// # Models
///
/// - `user`: User accounts (owners of tasks)
/// - `task`: Tasks with status/priority/category and optional scheduling fields
/// - `subtask`: Checklist items belonging to a task
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::user::{CreateUser, User};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     name: Some("Jane Doe".to_string()),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod subtask;
pub mod task;
pub mod user;
