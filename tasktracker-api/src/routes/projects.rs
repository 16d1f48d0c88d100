/// Project CRUD endpoints
///
/// # Endpoints
///
/// - `POST /api/projects` - Create a project
/// - `GET /api/projects` - List projects visible to the caller
/// - `GET /api/projects/:id` - Fetch a project
/// - `PUT /api/projects/:id` - Partially update a project
/// - `DELETE /api/projects/:id` - Delete a project and its tasks
///
/// Who may do what is decided entirely by the service layer; handlers only
/// translate HTTP to service calls.

use crate::{
    app::AppState,
    error::{validation_failed, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use tasktracker_shared::{
    auth::identity::Principal,
    models::project::{CreateProject, Project, ProjectPatch},
};
use uuid::Uuid;
use validator::Validate;

/// Project creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    /// Optional description
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    /// Explicit owner (ADMIN only); defaults to the caller
    pub owner_id: Option<Uuid>,
}

/// Create a project
///
/// # Errors
///
/// - `403 Forbidden`: Caller may not set the requested owner
/// - `404 Not Found`: Requested owner does not exist
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    req.validate().map_err(validation_failed)?;

    let project = state
        .projects
        .create_project(
            &principal,
            CreateProject {
                name: req.name,
                description: req.description,
                owner_id: req.owner_id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// List projects visible to the caller
///
/// ADMIN sees everything; everyone else sees only projects they own.
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = state.projects.list_projects(&principal).await?;
    Ok(Json(projects))
}

/// Fetch a single project
pub async fn get_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = state.projects.get_project(&principal, id).await?;
    Ok(Json(project))
}

/// Partially update a project
///
/// Absent fields are left unchanged. Changing the owner is ADMIN-only.
pub async fn update_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ProjectPatch>,
) -> ApiResult<Json<Project>> {
    let project = state.projects.update_project(&principal, id, patch).await?;
    Ok(Json(project))
}

/// Delete a project and all tasks in it
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.projects.delete_project(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
