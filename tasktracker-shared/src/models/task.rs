/// Task model
///
/// Tasks belong to exactly one project (immutable after creation) and can
/// be assigned to at most one user. For authorization purposes a task's
/// effective owner is its project's owner, not the task itself; the
/// assignee is the sole authority over status transitions.
///
/// There is no enforced status transition graph — any status may follow
/// any other.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'done');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL,
///     priority task_priority NOT NULL,
///     due_date DATE,
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     assigned_user_id UUID REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL,
///     updated_at TIMESTAMPTZ NOT NULL
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Task workflow status (informally ordered, no enforced transitions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Converts status to string for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// Converts priority to string for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "LOW",
            TaskPriority::Medium => "MEDIUM",
            TaskPriority::High => "HIGH",
        }
    }
}

/// Task entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// Owning project (exactly one, never reassignable)
    pub project_id: Uuid,

    /// Assigned user, if any
    pub assigned_user_id: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// Status and priority default to TODO/MEDIUM when absent. The optional
/// assignee must resolve to an existing user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status (default: TODO)
    pub status: Option<TaskStatus>,

    /// Initial priority (default: MEDIUM)
    pub priority: Option<TaskPriority>,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// Optional initial assignee
    pub assigned_user_id: Option<Uuid>,
}

/// Partial update for a task
///
/// Only present fields overwrite the stored entity; the owning project is
/// never reassignable. The assignee field is doubly optional so that an
/// absent field (no change) is distinguishable from an explicit `null`
/// (clear to unassigned).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New due date
    pub due_date: Option<NaiveDate>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New assignee: absent = no change, `null` = unassign, id = reassign
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_user_id: Option<Option<Uuid>>,
}

/// Conjunctive (AND) filter applied by paginated task listings
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TaskFilter {
    /// Match this status exactly
    pub status: Option<TaskStatus>,

    /// Match this priority exactly
    pub priority: Option<TaskPriority>,
}

impl Task {
    /// Builds a new task record in the given project
    pub fn new(project_id: Uuid, data: CreateTask) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            status: data.status.unwrap_or(TaskStatus::Todo),
            priority: data.priority.unwrap_or(TaskPriority::Medium),
            due_date: data.due_date,
            project_id,
            assigned_user_id: data.assigned_user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the entity as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Whether `user_id` is the current assignee
    pub fn is_assigned_to(&self, user_id: Uuid) -> bool {
        self.assigned_user_id == Some(user_id)
    }
}

/// Deserializes a field where JSON `null` must become `Some(None)` rather
/// than `None`, so patches can express "clear this field".
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(TaskStatus::Todo.as_str(), "TODO");
        assert_eq!(TaskStatus::InProgress.as_str(), "IN_PROGRESS");
        assert_eq!(TaskStatus::Done.as_str(), "DONE");
    }

    #[test]
    fn test_status_serde_matches_wire_format() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        let status: TaskStatus = serde_json::from_str("\"DONE\"").unwrap();
        assert_eq!(status, TaskStatus::Done);
    }

    #[test]
    fn test_new_task_defaults() {
        let project_id = Uuid::new_v4();
        let task = Task::new(
            project_id,
            CreateTask {
                title: "Ship it".to_string(),
                description: None,
                status: None,
                priority: None,
                due_date: None,
                assigned_user_id: None,
            },
        );

        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.project_id, project_id);
        assert!(task.assigned_user_id.is_none());
    }

    #[test]
    fn test_patch_assignee_absent_vs_null() {
        let absent: TaskPatch = serde_json::from_str(r#"{"title": "X"}"#).unwrap();
        assert_eq!(absent.assigned_user_id, None);

        let cleared: TaskPatch =
            serde_json::from_str(r#"{"assigned_user_id": null}"#).unwrap();
        assert_eq!(cleared.assigned_user_id, Some(None));

        let id = Uuid::new_v4();
        let reassigned: TaskPatch =
            serde_json::from_str(&format!(r#"{{"assigned_user_id": "{}"}}"#, id)).unwrap();
        assert_eq!(reassigned.assigned_user_id, Some(Some(id)));
    }

    #[test]
    fn test_is_assigned_to() {
        let user_id = Uuid::new_v4();
        let mut task = Task::new(
            Uuid::new_v4(),
            CreateTask {
                title: "Review".to_string(),
                description: None,
                status: None,
                priority: None,
                due_date: None,
                assigned_user_id: Some(user_id),
            },
        );

        assert!(task.is_assigned_to(user_id));
        assert!(!task.is_assigned_to(Uuid::new_v4()));

        task.assigned_user_id = None;
        assert!(!task.is_assigned_to(user_id));
    }
}
