/// Task endpoints
///
/// All task routes sit behind the bearer auth layer and are scoped to the
/// caller: a task owned by someone else is indistinguishable from a missing
/// one (404 either way).
///
/// # Endpoints
///
/// - `GET    /api/tasks` - List with status/priority/category/search filters
/// - `POST   /api/tasks` - Create (optionally with initial subtasks)
/// - `GET    /api/tasks/:id`
/// - `PUT    /api/tasks/:id` - Partial update
/// - `DELETE /api/tasks/:id`
///
/// Response payloads use camelCase field names (`dueDate`, `userId`,
/// `createdAt`, ...) while storage stays snake_case; the DTOs in this module
/// own that mapping.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Query;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use taskdeck_shared::{
    auth::middleware::CurrentUser,
    models::{
        subtask::NewSubtask,
        task::{CreateTask, Task, TaskFilter, TaskPriority, TaskStatus, UpdateTask},
    },
};
use uuid::Uuid;
use validator::Validate;

/// Task as exposed on the wire
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub category: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            category: task.category,
            due_date: task.due_date,
            start_time: task.start_time,
            end_time: task.end_time,
            user_id: task.user_id,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// List filters from the query string
///
/// `status`, `priority`, and `category` may be repeated
/// (`?status=TODO&status=IN_PROGRESS`); values outside the closed
/// enumerations are rejected at extraction.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    #[serde(default)]
    pub status: Vec<TaskStatus>,

    #[serde(default)]
    pub priority: Vec<TaskPriority>,

    #[serde(default)]
    pub category: Vec<String>,

    pub search: Option<String>,
}

impl From<TaskListQuery> for TaskFilter {
    fn from(query: TaskListQuery) -> Self {
        Self {
            status: query.status,
            priority: query.priority,
            category: query.category,
            search: query.search,
        }
    }
}

/// Create request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Title (required, 1-200 characters)
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    pub description: Option<String>,

    /// Default TODO
    #[serde(default)]
    pub status: TaskStatus,

    /// Default MEDIUM
    #[serde(default)]
    pub priority: TaskPriority,

    pub category: Option<String>,

    pub due_date: Option<DateTime<Utc>>,

    /// "HH:MM"; not validated against end_time
    pub start_time: Option<String>,

    pub end_time: Option<String>,

    /// Initial subtasks, created atomically with the task
    #[serde(default)]
    pub subtasks: Vec<NewSubtask>,
}

/// Keeps an explicit `null` distinguishable from an absent field
///
/// A bare `Option<Option<T>>` field loses the distinction: serde hands the
/// outer `Option` the `null`, collapsing it to `None`. Deserializing the
/// inner value and wrapping it means a present field always lands in
/// `Some(..)`; only truly absent fields fall back to the `None` default.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Partial update request
///
/// Field presence is tri-state: an absent field keeps its prior value, an
/// explicit `null` clears a nullable field, and a value replaces it. The
/// nullable fields deserialize through [`double_option`] so the three cases
/// stay distinct: absent → `None`, `null` → `Some(None)`, value →
/// `Some(Some(v))`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// Non-nullable; absent (or null) keeps the prior title
    pub title: Option<String>,

    pub status: Option<TaskStatus>,

    pub priority: Option<TaskPriority>,

    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,

    #[serde(default, deserialize_with = "double_option")]
    pub start_time: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub end_time: Option<Option<String>>,
}

impl UpdateTaskRequest {
    fn validate_title(&self) -> Result<(), ApiError> {
        if let Some(ref title) = self.title {
            let len = title.chars().count();
            if len == 0 || len > 200 {
                return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
                    field: "title".to_string(),
                    message: "Title must be 1-200 characters".to_string(),
                }]));
            }
        }
        Ok(())
    }
}

impl From<UpdateTaskRequest> for UpdateTask {
    fn from(req: UpdateTaskRequest) -> Self {
        Self {
            title: req.title,
            status: req.status,
            priority: req.priority,
            description: req.description,
            category: req.category,
            due_date: req.due_date,
            start_time: req.start_time,
            end_time: req.end_time,
        }
    }
}

/// List the caller's tasks
///
/// Filters are conjunctive across dimensions and disjunctive within one;
/// `search` matches title or description case-insensitively. Newest first.
pub async fn list_tasks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let tasks = Task::list_by_user(&state.db, user.id, &query.into()).await?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Create a task owned by the caller
///
/// Initial subtasks, if supplied, persist atomically with the task.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Title out of bounds
pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    req.validate()?;

    let task = Task::create(
        &state.db,
        CreateTask {
            user_id: user.id,
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            category: req.category,
            due_date: req.due_date,
            start_time: req.start_time,
            end_time: req.end_time,
            subtasks: req.subtasks,
        },
    )
    .await?;

    tracing::debug!(task_id = %task.id, user_id = %user.id, "Created task");

    Ok((StatusCode::CREATED, Json(task.into())))
}

/// Get a single task
pub async fn get_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskResponse>> {
    let task = Task::find_by_id_and_user(&state.db, id, user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task.into()))
}

/// Partially update a task
///
/// Only fields present in the request change; `updated_at` is refreshed on
/// success.
pub async fn update_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    req.validate_title()?;

    let task = Task::update(&state.db, id, user.id, req.into())
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task.into()))
}

/// Delete a task
///
/// Subtasks cascade. Deleting an already-gone task is the same 404, so the
/// failure mode is idempotent.
pub async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Task::delete(&state.db, id, user.id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_response_is_camel_case() {
        let response = TaskResponse {
            id: Uuid::new_v4(),
            title: "T".to_string(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            category: None,
            due_date: None,
            start_time: None,
            end_time: None,
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&response).unwrap();
        for field in ["dueDate", "startTime", "endTime", "userId", "createdAt", "updatedAt"] {
            assert!(json.contains(field), "missing {} in {}", field, json);
        }
        assert!(!json.contains("user_id"));
    }

    #[test]
    fn test_create_request_defaults() {
        let req: CreateTaskRequest = serde_json::from_str(r#"{"title": "T"}"#).unwrap();
        assert_eq!(req.status, TaskStatus::Todo);
        assert_eq!(req.priority, TaskPriority::Medium);
        assert!(req.subtasks.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_bad_enum() {
        let result = serde_json::from_str::<CreateTaskRequest>(r#"{"title": "T", "status": "DONE"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_create_request_title_bounds() {
        let req: CreateTaskRequest = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(req.validate().is_err());

        let long_title = "x".repeat(201);
        let req: CreateTaskRequest =
            serde_json::from_str(&format!(r#"{{"title": "{}"}}"#, long_title)).unwrap();
        assert!(req.validate().is_err());

        let max_title = "x".repeat(200);
        let req: CreateTaskRequest =
            serde_json::from_str(&format!(r#"{{"title": "{}"}}"#, max_title)).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_request_absent_vs_null() {
        // Absent field: untouched
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"title": "T"}"#).unwrap();
        assert_eq!(req.title.as_deref(), Some("T"));
        assert!(req.description.is_none());

        // Explicit null: clear
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(req.description, Some(None));
        assert!(req.title.is_none());

        // Value: replace
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert_eq!(req.description, Some(Some("x".to_string())));
    }

    #[test]
    fn test_update_request_camel_case_fields() {
        let req: UpdateTaskRequest =
            serde_json::from_str(r#"{"dueDate": null, "startTime": "09:00"}"#).unwrap();
        assert_eq!(req.due_date, Some(None));
        assert_eq!(req.start_time, Some(Some("09:00".to_string())));
    }

    #[test]
    fn test_update_request_title_validation() {
        let req = UpdateTaskRequest {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(req.validate_title().is_err());

        let req = UpdateTaskRequest {
            title: None,
            ..Default::default()
        };
        assert!(req.validate_title().is_ok());
    }

    #[test]
    fn test_list_query_parses_repeated_values() {
        let query: TaskListQuery =
            serde_html_form::from_str("status=TODO&status=IN_PROGRESS&priority=LOW&search=report")
                .unwrap();
        assert_eq!(query.status, vec![TaskStatus::Todo, TaskStatus::InProgress]);
        assert_eq!(query.priority, vec![TaskPriority::Low]);
        assert!(query.category.is_empty());
        assert_eq!(query.search.as_deref(), Some("report"));
    }
}
