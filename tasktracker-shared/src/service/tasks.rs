/// Task authorization and lifecycle
///
/// A task's effective owner for authorization purposes is its project's
/// owner; the task itself carries only an optional assignee. The helper
/// `owning_project` re-reads that project on every check — a task whose
/// project is missing is a data-integrity fault, not a NotFound.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::auth::identity::{resolve_caller, Principal};
use crate::error::{ServiceError, ServiceResult};
use crate::models::page::{Page, PageRequest};
use crate::models::project::Project;
use crate::models::task::{CreateTask, Task, TaskFilter, TaskPatch, TaskStatus};
use crate::service::access;
use crate::store::Store;

/// Task operations over a shared store
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn Store>,
}

impl TaskService {
    /// Creates a service over the given store
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn owning_project(&self, task: &Task) -> ServiceResult<Project> {
        self.store
            .find_project(task.project_id)
            .await?
            .ok_or_else(|| {
                ServiceError::Inconsistency(format!(
                    "Task {} references missing project {}",
                    task.id, task.project_id
                ))
            })
    }

    /// Creates a task in a project
    ///
    /// The caller must be ADMIN or the project's owner. An explicit
    /// assignee must exist; absent assignee means unassigned.
    pub async fn create_task(
        &self,
        principal: &Principal,
        project_id: Uuid,
        data: CreateTask,
    ) -> ServiceResult<Task> {
        let caller = resolve_caller(self.store.as_ref(), principal).await?;
        let project = self
            .store
            .find_project(project_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project", project_id))?;

        access::require_task_management(&caller, &project)?;

        if let Some(assignee_id) = data.assigned_user_id {
            self.store
                .find_user(assignee_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("User", assignee_id))?;
        }

        let task = Task::new(project_id, data);
        self.store.save_task(&task).await?;

        info!(task_id = %task.id, project_id = %project_id, "Task created");
        Ok(task)
    }

    /// Fetches one task, enforcing the task access rule
    pub async fn get_task(&self, principal: &Principal, id: Uuid) -> ServiceResult<Task> {
        let caller = resolve_caller(self.store.as_ref(), principal).await?;
        let task = self
            .store
            .find_task(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task", id))?;
        let project = self.owning_project(&task).await?;

        access::require_task_access(&caller, &task, &project)?;
        Ok(task)
    }

    /// Lists a project's tasks, optionally filtered, paginated
    pub async fn list_tasks_by_project(
        &self,
        principal: &Principal,
        project_id: Uuid,
        filter: TaskFilter,
        page: PageRequest,
    ) -> ServiceResult<Page<Task>> {
        let caller = resolve_caller(self.store.as_ref(), principal).await?;
        let project = self
            .store
            .find_project(project_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project", project_id))?;

        access::require_task_management(&caller, &project)?;

        self.store
            .list_tasks_by_project(project_id, filter, page)
            .await
            .map_err(Into::into)
    }

    /// Lists tasks by assignee
    ///
    /// An explicit `user_id` is ADMIN-only and the target must exist; with
    /// no `user_id` the caller lists their own assignments.
    pub async fn list_tasks_by_assignee(
        &self,
        principal: &Principal,
        user_id: Option<Uuid>,
        filter: TaskFilter,
        page: PageRequest,
    ) -> ServiceResult<Page<Task>> {
        let caller = resolve_caller(self.store.as_ref(), principal).await?;

        let target_id = match user_id {
            Some(user_id) => {
                if !caller.is_admin() {
                    return Err(ServiceError::forbidden(
                        "Only ADMIN may fetch tasks for other users",
                    ));
                }
                self.store
                    .find_user(user_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("User", user_id))?;
                user_id
            }
            None => caller.id,
        };

        self.store
            .list_tasks_by_assignee(target_id, filter, page)
            .await
            .map_err(Into::into)
    }

    /// Lists every task in the system; ADMIN only
    pub async fn list_all_tasks(
        &self,
        principal: &Principal,
        filter: TaskFilter,
        page: PageRequest,
    ) -> ServiceResult<Page<Task>> {
        let caller = resolve_caller(self.store.as_ref(), principal).await?;
        access::require_admin(&caller)?;

        self.store.list_tasks(filter, page).await.map_err(Into::into)
    }

    /// Applies a partial update under the task access rule
    ///
    /// Present fields overwrite; the owning project is never reassignable.
    /// An assignee patch either resolves a new user id or clears the task
    /// to unassigned.
    pub async fn update_task(
        &self,
        principal: &Principal,
        id: Uuid,
        patch: TaskPatch,
    ) -> ServiceResult<Task> {
        let caller = resolve_caller(self.store.as_ref(), principal).await?;
        let mut task = self
            .store
            .find_task(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task", id))?;
        let project = self.owning_project(&task).await?;

        access::require_task_access(&caller, &task, &project)?;

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        match patch.assigned_user_id {
            Some(Some(assignee_id)) => {
                self.store
                    .find_user(assignee_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("User", assignee_id))?;
                task.assigned_user_id = Some(assignee_id);
            }
            Some(None) => task.assigned_user_id = None,
            None => {}
        }

        task.touch();
        self.store.save_task(&task).await?;

        info!(task_id = %task.id, "Task updated");
        Ok(task)
    }

    /// Assigns a task to a user
    ///
    /// ADMIN always; MANAGER only when they own the task's project; a
    /// plain USER never, regardless of relationship to the task.
    pub async fn assign_task(
        &self,
        principal: &Principal,
        task_id: Uuid,
        user_id: Uuid,
    ) -> ServiceResult<Task> {
        let caller = resolve_caller(self.store.as_ref(), principal).await?;
        let mut task = self
            .store
            .find_task(task_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task", task_id))?;
        let project = self.owning_project(&task).await?;

        access::require_assign_rights(&caller, &project)?;

        let assignee = self
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))?;

        task.assigned_user_id = Some(assignee.id);
        task.touch();
        self.store.save_task(&task).await?;

        info!(task_id = %task.id, assignee_id = %assignee.id, "Task assigned");
        Ok(task)
    }

    /// Sets a task's status; the current assignee exactly, nobody else
    ///
    /// No transition-order validation: any status may follow any other.
    pub async fn update_task_status(
        &self,
        principal: &Principal,
        task_id: Uuid,
        status: TaskStatus,
    ) -> ServiceResult<Task> {
        let caller = resolve_caller(self.store.as_ref(), principal).await?;
        let mut task = self
            .store
            .find_task(task_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task", task_id))?;

        access::require_status_change(&caller, &task)?;

        task.status = status;
        task.touch();
        self.store.save_task(&task).await?;

        info!(task_id = %task.id, status = status.as_str(), "Task status updated");
        Ok(task)
    }

    /// Deletes a task under the task access rule; a second delete of the
    /// same id yields NotFound
    pub async fn delete_task(&self, principal: &Principal, id: Uuid) -> ServiceResult<()> {
        let caller = resolve_caller(self.store.as_ref(), principal).await?;
        let task = self
            .store
            .find_task(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task", id))?;
        let project = self.owning_project(&task).await?;

        access::require_task_access(&caller, &task, &project)?;

        self.store.delete_task(id).await?;
        info!(task_id = %id, "Task deleted");
        Ok(())
    }
}
