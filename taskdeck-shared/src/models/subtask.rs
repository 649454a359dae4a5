/// Subtask model and database operations
///
/// Subtasks are checklist items hanging off a task. They carry no owner of
/// their own; authorization is enforced at the service boundary through the
/// parent task's owner.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE subtasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     completed BOOLEAN NOT NULL DEFAULT FALSE
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Subtask model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SubTask {
    /// Unique subtask ID
    pub id: Uuid,

    /// Parent task
    pub task_id: Uuid,

    /// Title (required)
    pub title: String,

    /// Completion flag (default false)
    pub completed: bool,
}

/// Input for creating a subtask under a task
#[derive(Debug, Clone, Deserialize)]
pub struct NewSubtask {
    /// Title (required)
    pub title: String,

    /// Completion flag
    #[serde(default)]
    pub completed: bool,
}

impl SubTask {
    /// Creates a subtask under `task_id`
    ///
    /// Takes any Postgres executor so it can run inside the task-creation
    /// transaction as well as against the plain pool.
    pub async fn create<'e, E>(executor: E, task_id: Uuid, data: NewSubtask) -> Result<Self, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let subtask = sqlx::query_as::<_, SubTask>(
            r#"
            INSERT INTO subtasks (task_id, title, completed)
            VALUES ($1, $2, $3)
            RETURNING id, task_id, title, completed
            "#,
        )
        .bind(task_id)
        .bind(data.title)
        .bind(data.completed)
        .fetch_one(executor)
        .await?;

        Ok(subtask)
    }

    /// Finds a subtask by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let subtask = sqlx::query_as::<_, SubTask>(
            "SELECT id, task_id, title, completed FROM subtasks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(subtask)
    }

    /// Lists a task's subtasks
    ///
    /// Ordered by id so repeated listings are stable; subtasks carry no
    /// creation timestamp to sort on.
    pub async fn list_by_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let subtasks = sqlx::query_as::<_, SubTask>(
            "SELECT id, task_id, title, completed FROM subtasks WHERE task_id = $1 ORDER BY id",
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(subtasks)
    }

    /// Updates only the completed flag
    ///
    /// # Returns
    ///
    /// The updated subtask, or `None` if no subtask with that ID exists
    pub async fn set_completed(
        pool: &PgPool,
        id: Uuid,
        completed: bool,
    ) -> Result<Option<Self>, sqlx::Error> {
        let subtask = sqlx::query_as::<_, SubTask>(
            r#"
            UPDATE subtasks
            SET completed = $2
            WHERE id = $1
            RETURNING id, task_id, title, completed
            "#,
        )
        .bind(id)
        .bind(completed)
        .fetch_optional(pool)
        .await?;

        Ok(subtask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_subtask_completed_defaults_to_false() {
        let parsed: NewSubtask = serde_json::from_str(r#"{"title": "buy milk"}"#).unwrap();
        assert_eq!(parsed.title, "buy milk");
        assert!(!parsed.completed);

        let parsed: NewSubtask =
            serde_json::from_str(r#"{"title": "done already", "completed": true}"#).unwrap();
        assert!(parsed.completed);
    }

    // Database operations are covered by the API integration tests.
}
