/// Project authorization and lifecycle
///
/// State-free: each operation independently resolves the caller and
/// re-checks permission against the live project record. Ownership rules:
/// a project always has exactly one owner; setting an owner other than the
/// caller (at creation) and transferring ownership (on update) are
/// ADMIN-only.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::auth::identity::{resolve_caller, Principal};
use crate::error::{ServiceError, ServiceResult};
use crate::models::project::{CreateProject, Project, ProjectPatch};
use crate::models::user::Role;
use crate::service::access;
use crate::store::Store;

/// Project operations over a shared store
#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn Store>,
}

impl ProjectService {
    /// Creates a service over the given store
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Creates a project
    ///
    /// With an explicit `owner_id` the caller must be ADMIN and the target
    /// owner must exist; otherwise the caller becomes the owner.
    pub async fn create_project(
        &self,
        principal: &Principal,
        data: CreateProject,
    ) -> ServiceResult<Project> {
        let caller = resolve_caller(self.store.as_ref(), principal).await?;

        let owner_id = match data.owner_id {
            Some(owner_id) => {
                access::require_owner_override(&caller)?;
                self.store
                    .find_user(owner_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("User", owner_id))?;
                owner_id
            }
            None => caller.id,
        };

        let project = Project::new(data.name, data.description, owner_id);
        self.store.save_project(&project).await?;

        info!(project_id = %project.id, owner_id = %owner_id, "Project created");
        Ok(project)
    }

    /// Fetches one project, enforcing the project access rule
    pub async fn get_project(&self, principal: &Principal, id: Uuid) -> ServiceResult<Project> {
        let caller = resolve_caller(self.store.as_ref(), principal).await?;
        let project = self
            .store
            .find_project(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project", id))?;

        access::require_project_access(&caller, &project)?;
        Ok(project)
    }

    /// Lists projects: all of them for ADMIN, owned ones for everyone else
    pub async fn list_projects(&self, principal: &Principal) -> ServiceResult<Vec<Project>> {
        let caller = resolve_caller(self.store.as_ref(), principal).await?;

        if caller.role == Role::Admin {
            self.store.list_projects().await.map_err(Into::into)
        } else {
            self.store
                .list_projects_by_owner(caller.id)
                .await
                .map_err(Into::into)
        }
    }

    /// Applies a partial update
    ///
    /// Name/description overwrite only when present. An owner change
    /// (present and different from the current owner) is ADMIN-only and
    /// the new owner must exist.
    pub async fn update_project(
        &self,
        principal: &Principal,
        id: Uuid,
        patch: ProjectPatch,
    ) -> ServiceResult<Project> {
        let caller = resolve_caller(self.store.as_ref(), principal).await?;
        let mut project = self
            .store
            .find_project(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project", id))?;

        access::require_project_access(&caller, &project)?;

        if let Some(new_owner_id) = patch.owner_id {
            if new_owner_id != project.owner_id {
                access::require_owner_transfer(&caller)?;
                self.store
                    .find_user(new_owner_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("User", new_owner_id))?;
                project.owner_id = new_owner_id;
            }
        }
        if let Some(name) = patch.name {
            project.name = name;
        }
        if let Some(description) = patch.description {
            project.description = Some(description);
        }

        project.touch();
        self.store.save_project(&project).await?;

        info!(project_id = %project.id, "Project updated");
        Ok(project)
    }

    /// Deletes a project (and, by cascade, its tasks); irreversible
    pub async fn delete_project(&self, principal: &Principal, id: Uuid) -> ServiceResult<()> {
        let caller = resolve_caller(self.store.as_ref(), principal).await?;
        let project = self
            .store
            .find_project(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project", id))?;

        access::require_project_access(&caller, &project)?;

        self.store.delete_project(id).await?;
        info!(project_id = %id, "Project deleted");
        Ok(())
    }
}
