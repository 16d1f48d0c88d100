/// Task lifecycle endpoints
///
/// # Endpoints
///
/// - `POST /api/tasks` - Create a task in a project
/// - `GET /api/tasks` - Paginated listing by assignee (self, or any user for ADMIN)
/// - `GET /api/tasks/all` - Paginated listing of every task (ADMIN)
/// - `GET /api/tasks/project/:project_id` - Paginated listing for one project
/// - `GET /api/tasks/:id` - Fetch a task
/// - `PUT /api/tasks/:id` - Partially update a task
/// - `PUT /api/tasks/:id/assign` - Reassign a task
/// - `PUT /api/tasks/:id/status` - Change status (current assignee only)
/// - `DELETE /api/tasks/:id` - Delete a task
///
/// List endpoints share the same query shape: optional `status` and
/// `priority` filters (ANDed) plus zero-based `page`/`size` pagination.

use crate::{
    app::AppState,
    error::{validation_failed, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tasktracker_shared::{
    auth::identity::Principal,
    models::{
        page::{Page, PageRequest},
        task::{CreateTask, Task, TaskFilter, TaskPatch, TaskPriority, TaskStatus},
    },
};
use uuid::Uuid;
use validator::Validate;

/// Task creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Project the task belongs to
    pub project_id: Uuid,

    /// Task title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Optional description
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
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

/// Query parameters shared by the paginated task listings
///
/// `Query` rejects unknown enum values with a 400 before the handler runs.
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    /// Assignee to list for; ADMIN-only when not the caller
    pub user_id: Option<Uuid>,

    /// Filter by exact status
    pub status: Option<TaskStatus>,

    /// Filter by exact priority
    pub priority: Option<TaskPriority>,

    /// Zero-based page index
    #[serde(default)]
    pub page: u32,

    /// Page size
    pub size: Option<u32>,
}

impl TaskListQuery {
    fn filter(&self) -> TaskFilter {
        TaskFilter {
            status: self.status,
            priority: self.priority,
        }
    }

    fn page_request(&self) -> PageRequest {
        let mut request = PageRequest {
            page: self.page,
            ..PageRequest::default()
        };
        if let Some(size) = self.size {
            request.size = size;
        }
        request
    }
}

/// Reassignment query
#[derive(Debug, Deserialize)]
pub struct AssignQuery {
    /// New assignee
    pub user_id: Uuid,
}

/// Status change query
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    /// New status
    pub status: TaskStatus,
}

/// Create a task in a project
///
/// # Errors
///
/// - `403 Forbidden`: Caller is neither ADMIN nor the project owner
/// - `404 Not Found`: Project or requested assignee does not exist
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate().map_err(validation_failed)?;

    let task = state
        .tasks
        .create_task(
            &principal,
            req.project_id,
            CreateTask {
                title: req.title,
                description: req.description,
                status: req.status,
                priority: req.priority,
                due_date: req.due_date,
                assigned_user_id: req.assigned_user_id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// List tasks by assignee
///
/// Without `user_id` this lists the caller's own tasks. An explicit
/// `user_id` is honored only for ADMIN callers.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Page<Task>>> {
    let page = state
        .tasks
        .list_tasks_by_assignee(&principal, query.user_id, query.filter(), query.page_request())
        .await?;
    Ok(Json(page))
}

/// List every task in the system (ADMIN only)
pub async fn list_all_tasks(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Page<Task>>> {
    let page = state
        .tasks
        .list_all_tasks(&principal, query.filter(), query.page_request())
        .await?;
    Ok(Json(page))
}

/// List tasks for one project
pub async fn list_project_tasks(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Page<Task>>> {
    let page = state
        .tasks
        .list_tasks_by_project(&principal, project_id, query.filter(), query.page_request())
        .await?;
    Ok(Json(page))
}

/// Fetch a single task
pub async fn get_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = state.tasks.get_task(&principal, id).await?;
    Ok(Json(task))
}

/// Partially update a task
///
/// Absent fields are left unchanged; `"assigned_user_id": null` explicitly
/// unassigns. The owning project cannot be changed.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(patch): Json<TaskPatch>,
) -> ApiResult<Json<Task>> {
    let task = state.tasks.update_task(&principal, id, patch).await?;
    Ok(Json(task))
}

/// Reassign a task to another user
pub async fn assign_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Query(query): Query<AssignQuery>,
) -> ApiResult<Json<Task>> {
    let task = state.tasks.assign_task(&principal, id, query.user_id).await?;
    Ok(Json(task))
}

/// Change a task's status
///
/// Reserved for the current assignee; every transition is legal.
pub async fn update_task_status(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<Task>> {
    let task = state
        .tasks
        .update_task_status(&principal, id, query.status)
        .await?;
    Ok(Json(task))
}

/// Delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.tasks.delete_task(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
