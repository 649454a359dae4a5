/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`: Service banner and health check
/// - `auth`: Registration, login, logout, and the caller's profile
/// - `tasks`: Task CRUD with owner-scoped filtering
/// - `subtasks`: Subtask completion toggling

pub mod auth;
pub mod health;
pub mod subtasks;
pub mod tasks;
