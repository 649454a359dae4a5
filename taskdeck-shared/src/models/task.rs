/// Task model and database operations
///
/// Tasks belong to exactly one user; ownership is set at creation and never
/// changes. Every query that serves an API request is scoped by `user_id`, so
/// another user's task is indistinguishable from a missing one.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(200) NOT NULL,
///     description TEXT,
///     status VARCHAR(20) NOT NULL DEFAULT 'TODO',
///     priority VARCHAR(20) NOT NULL DEFAULT 'MEDIUM',
///     category VARCHAR(100),
///     due_date TIMESTAMPTZ,
///     start_time VARCHAR(5),
///     end_time VARCHAR(5),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::task::{CreateTask, Task, TaskFilter};
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     user_id,
///     title: "Write report".to_string(),
///     ..Default::default()
/// }).await?;
///
/// let tasks = Task::list_by_user(&pool, user_id, &TaskFilter::default()).await?;
/// assert_eq!(tasks[0].id, task.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::subtask::{NewSubtask, SubTask};

/// Task workflow status
///
/// Stored as text; values outside this enumeration are rejected at the
/// schema layer, never coerced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "VARCHAR", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started yet (the default)
    #[default]
    Todo,

    /// Work in progress
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    /// String form as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "VARCHAR", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,

    /// The default
    #[default]
    Medium,

    High,

    Urgent,
}

impl TaskPriority {
    /// String form as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "LOW",
            TaskPriority::Medium => "MEDIUM",
            TaskPriority::High => "HIGH",
            TaskPriority::Urgent => "URGENT",
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owning user; immutable after creation
    pub user_id: Uuid,

    /// Title (1-200 characters)
    pub title: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional free-form category label
    pub category: Option<String>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Optional start time, "HH:MM" (not validated against end_time)
    pub start_time: Option<String>,

    /// Optional end time, "HH:MM"
    pub end_time: Option<String>,

    /// When the task was created; set once
    pub created_at: DateTime<Utc>,

    /// Refreshed on every successful mutation
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// Initial subtasks, if any, are created atomically with the task: either
/// everything persists or nothing does.
#[derive(Debug, Clone, Default)]
pub struct CreateTask {
    /// Owning user
    pub user_id: Uuid,

    /// Title (required, 1-200 characters; validated at the API boundary)
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Status (default TODO)
    pub status: TaskStatus,

    /// Priority (default MEDIUM)
    pub priority: TaskPriority,

    /// Optional category label
    pub category: Option<String>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Optional start time ("HH:MM")
    pub start_time: Option<String>,

    /// Optional end time ("HH:MM")
    pub end_time: Option<String>,

    /// Initial subtasks, created in the same transaction
    pub subtasks: Vec<NewSubtask>,
}

/// Input for a partial task update
///
/// Tri-state semantics: a `None` outer value leaves the field untouched; for
/// nullable fields, `Some(None)` explicitly clears the stored value while
/// `Some(Some(v))` replaces it. This mirrors the wire contract where an
/// absent JSON field retains the prior value and an explicit `null` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    /// New title (non-nullable; absent = keep)
    pub title: Option<String>,

    /// New status (non-nullable; absent = keep)
    pub status: Option<TaskStatus>,

    /// New priority (non-nullable; absent = keep)
    pub priority: Option<TaskPriority>,

    /// New description (Some(None) clears)
    pub description: Option<Option<String>>,

    /// New category (Some(None) clears)
    pub category: Option<Option<String>>,

    /// New due date (Some(None) clears)
    pub due_date: Option<Option<DateTime<Utc>>>,

    /// New start time (Some(None) clears)
    pub start_time: Option<Option<String>>,

    /// New end time (Some(None) clears)
    pub end_time: Option<Option<String>>,
}

impl UpdateTask {
    /// True when no field is present and the update would change nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.due_date.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
    }
}

/// Owner-scoped list filter
///
/// Each dimension is a disjunction within itself and a conjunction across
/// dimensions; `search` is a case-insensitive substring match over title or
/// description. Empty dimensions are not applied.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Status values to include (OR)
    pub status: Vec<TaskStatus>,

    /// Priority values to include (OR)
    pub priority: Vec<TaskPriority>,

    /// Category labels to include (OR)
    pub category: Vec<String>,

    /// Case-insensitive substring over title OR description
    pub search: Option<String>,
}

const TASK_COLUMNS: &str = "id, user_id, title, description, status, priority, category, \
                            due_date, start_time, end_time, created_at, updated_at";

impl Task {
    /// Creates a task, with any initial subtasks, in one transaction
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; in that case the whole
    /// transaction rolls back and nothing persists.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (user_id, title, description, status, priority, category,
                               due_date, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.category)
        .bind(data.due_date)
        .bind(data.start_time)
        .bind(data.end_time)
        .fetch_one(&mut *tx)
        .await?;

        for subtask in data.subtasks {
            SubTask::create(&mut *tx, task.id, subtask).await?;
        }

        tx.commit().await?;

        Ok(task)
    }

    /// Finds a task by ID without an ownership check
    ///
    /// Only for internal use (e.g., resolving a subtask's parent); API
    /// lookups go through [`Task::find_by_id_and_user`].
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, scoped to its owner
    ///
    /// This is the lookup used by every task endpoint: a task owned by
    /// someone else comes back as `None`, the same as a task that does not
    /// exist.
    pub async fn find_by_id_and_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2",
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists a user's tasks, newest first, applying the filter
    ///
    /// Filter dimensions are ANDed together; values within a dimension are
    /// ORed (`= ANY`). The search term matches title or description,
    /// case-insensitively.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        filter: &TaskFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        // Build the query incrementally based on which filters are present
        let mut query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1");
        let mut bind_count = 1;

        if !filter.status.is_empty() {
            bind_count += 1;
            query.push_str(&format!(" AND status = ANY(${})", bind_count));
        }
        if !filter.priority.is_empty() {
            bind_count += 1;
            query.push_str(&format!(" AND priority = ANY(${})", bind_count));
        }
        if !filter.category.is_empty() {
            bind_count += 1;
            query.push_str(&format!(" AND category = ANY(${})", bind_count));
        }
        if filter.search.is_some() {
            bind_count += 1;
            query.push_str(&format!(
                " AND (title ILIKE ${n} OR description ILIKE ${n})",
                n = bind_count
            ));
        }

        query.push_str(" ORDER BY created_at DESC");

        let mut q = sqlx::query_as::<_, Task>(&query).bind(user_id);

        if !filter.status.is_empty() {
            let statuses: Vec<String> =
                filter.status.iter().map(|s| s.as_str().to_string()).collect();
            q = q.bind(statuses);
        }
        if !filter.priority.is_empty() {
            let priorities: Vec<String> =
                filter.priority.iter().map(|p| p.as_str().to_string()).collect();
            q = q.bind(priorities);
        }
        if !filter.category.is_empty() {
            q = q.bind(filter.category.clone());
        }
        if let Some(ref search) = filter.search {
            q = q.bind(format!("%{}%", search));
        }

        let tasks = q.fetch_all(pool).await?;

        Ok(tasks)
    }

    /// Applies a partial update to a task, scoped to its owner
    ///
    /// Only fields present in `data` change; `updated_at` is refreshed on any
    /// successful update.
    ///
    /// # Returns
    ///
    /// The updated task, or `None` if no task with that ID is owned by
    /// `user_id`.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // An empty update mutates nothing, so updated_at stays put too
        if data.is_empty() {
            return Self::find_by_id_and_user(pool, id, user_id).await;
        }

        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.category.is_some() {
            bind_count += 1;
            query.push_str(&format!(", category = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }
        if data.start_time.is_some() {
            bind_count += 1;
            query.push_str(&format!(", start_time = ${}", bind_count));
        }
        if data.end_time.is_some() {
            bind_count += 1;
            query.push_str(&format!(", end_time = ${}", bind_count));
        }

        query.push_str(&format!(
            " WHERE id = $1 AND user_id = $2 RETURNING {TASK_COLUMNS}"
        ));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id).bind(user_id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(category) = data.category {
            q = q.bind(category);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(start_time) = data.start_time {
            q = q.bind(start_time);
        }
        if let Some(end_time) = data.end_time {
            q = q.bind(end_time);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task, scoped to its owner
    ///
    /// Subtasks are removed by the declared `ON DELETE CASCADE`. Deleting an
    /// already-gone task returns false, so repeated deletes surface the same
    /// NotFound to the caller.
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
