/// Access guards
///
/// Every rule in the system is one explicit function here, called at the
/// top of the operation that needs it. Guards are pure over the caller
/// and the live target entities; they never touch the store.
///
/// # Rule summary
///
/// | guard                    | ADMIN | MANAGER        | USER           |
/// |--------------------------|-------|----------------|----------------|
/// | `require_admin`          | yes   | no             | no             |
/// | `require_project_access` | yes   | iff owner      | no             |
/// | `require_task_management`| yes   | iff owner      | iff owner      |
/// | `require_task_access`    | yes   | owner/assignee | owner/assignee |
/// | `require_assign_rights`  | yes   | iff owner      | no             |
/// | `require_status_change`  | assignee only, regardless of role         |

use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::project::Project;
use crate::models::task::Task;
use crate::models::user::{Role, User};

/// ADMIN-only operations (owner overrides, cross-user listings, user creation)
pub fn require_admin(caller: &User) -> ServiceResult<()> {
    if caller.role != Role::Admin {
        return Err(ServiceError::forbidden("Requires ADMIN role"));
    }
    Ok(())
}

/// Project read/update/delete
///
/// ADMIN always; MANAGER only for projects they own; every other role has
/// no access path to a project, even one they own or hold task assignments
/// in.
pub fn require_project_access(caller: &User, project: &Project) -> ServiceResult<()> {
    match caller.role {
        Role::Admin => Ok(()),
        Role::Manager if project.owner_id == caller.id => Ok(()),
        _ => Err(ServiceError::forbidden(format!(
            "No permission on project: {}",
            project.id
        ))),
    }
}

/// Task creation and per-project listing: ADMIN or the project's owner
pub fn require_task_management(caller: &User, project: &Project) -> ServiceResult<()> {
    if caller.role == Role::Admin || project.owner_id == caller.id {
        return Ok(());
    }
    Err(ServiceError::forbidden(format!(
        "Not allowed to manage tasks for project: {}",
        project.id
    )))
}

/// Task read/update/delete: ADMIN, the owning project's owner, or the
/// current assignee
///
/// The task's effective owner is its project's owner — tasks carry no
/// ownership of their own.
pub fn require_task_access(caller: &User, task: &Task, project: &Project) -> ServiceResult<()> {
    let is_owner = project.owner_id == caller.id;
    let is_assignee = task.is_assigned_to(caller.id);
    if caller.role == Role::Admin || is_owner || is_assignee {
        return Ok(());
    }
    Err(ServiceError::forbidden(format!(
        "No permission on task: {}",
        task.id
    )))
}

/// Task assignment: ADMIN always; MANAGER only for projects they own; a
/// plain USER never, regardless of relationship to the task
pub fn require_assign_rights(caller: &User, project: &Project) -> ServiceResult<()> {
    match caller.role {
        Role::Admin => Ok(()),
        Role::Manager if project.owner_id == caller.id => Ok(()),
        Role::Manager => Err(ServiceError::forbidden(
            "Managers can only assign tasks for their own projects",
        )),
        _ => Err(ServiceError::forbidden("Only MANAGER or ADMIN can assign tasks")),
    }
}

/// Status transition: the current assignee exactly; not ADMIN, not the
/// project owner.
pub fn require_status_change(caller: &User, task: &Task) -> ServiceResult<()> {
    if task.is_assigned_to(caller.id) {
        return Ok(());
    }
    Err(ServiceError::forbidden(
        "Only the assigned user can update task status",
    ))
}

/// Whether `caller` may set an explicit project owner at creation time
pub fn require_owner_override(caller: &User) -> ServiceResult<()> {
    if caller.role != Role::Admin {
        return Err(ServiceError::forbidden("Only ADMIN can assign project owner"));
    }
    Ok(())
}

/// Whether `caller` may transfer ownership of an existing project
pub fn require_owner_transfer(caller: &User) -> ServiceResult<()> {
    if caller.role != Role::Admin {
        return Err(ServiceError::forbidden("Only ADMIN can change project owner"));
    }
    Ok(())
}

/// Convenience for tests and callers that only have ids
pub fn is_owner(project: &Project, user_id: Uuid) -> bool {
    project.owner_id == user_id
}
