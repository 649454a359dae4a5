/// Subtask endpoints
///
/// Subtasks are created and listed through their parent task; the only
/// standalone operation is toggling completion.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::middleware::CurrentUser,
    models::{subtask::SubTask, task::Task},
};
use uuid::Uuid;

/// Subtask as exposed on the wire
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTaskResponse {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    pub task_id: Uuid,
}

impl From<SubTask> for SubTaskResponse {
    fn from(subtask: SubTask) -> Self {
        Self {
            id: subtask.id,
            title: subtask.title,
            completed: subtask.completed,
            task_id: subtask.task_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateSubTaskQuery {
    pub completed: bool,
}

/// Set a subtask's completion flag
///
/// `PATCH /api/subtasks/:id?completed=true`
///
/// Setting the flag to its current value succeeds and is a no-op.
///
/// # Errors
///
/// - `404 Not Found`: No subtask with that id
/// - `403 Forbidden`: Subtask exists but its parent task belongs to someone
///   else
pub async fn update_subtask(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Query(query): Query<UpdateSubTaskQuery>,
) -> ApiResult<Json<SubTaskResponse>> {
    let subtask = SubTask::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Subtask not found".to_string()))?;

    let owned = Task::find_by_id(&state.db, subtask.task_id)
        .await?
        .is_some_and(|task| task.user_id == user.id);
    if !owned {
        return Err(ApiError::Forbidden(
            "Not authorized to update this subtask".to_string(),
        ));
    }

    let subtask = SubTask::set_completed(&state.db, id, query.completed)
        .await?
        .ok_or_else(|| ApiError::NotFound("Subtask not found".to_string()))?;

    tracing::debug!(subtask_id = %subtask.id, completed = subtask.completed, "Updated subtask");

    Ok(Json(subtask.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtask_response_is_camel_case() {
        let response = SubTaskResponse {
            id: Uuid::new_v4(),
            title: "S".to_string(),
            completed: false,
            task_id: Uuid::new_v4(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("taskId"));
        assert!(!json.contains("task_id"));
    }

    #[test]
    fn test_query_requires_completed() {
        assert!(serde_json::from_str::<UpdateSubTaskQuery>("{}").is_err());
    }
}
