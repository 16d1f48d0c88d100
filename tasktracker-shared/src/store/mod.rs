/// Persistence seam
///
/// The service layer only ever talks to the traits in this module; it never
/// sees SQL or connection pools. Two backends implement them:
///
/// - [`postgres::PgStore`]: the production backend (sqlx/PostgreSQL)
/// - [`memory::InMemoryStore`]: a map-backed store used by the service
///   tests and handy for demos
///
/// `save_*` methods are upserts keyed by id — the service layer owns id
/// generation and timestamps, so both backends behave identically.
/// `delete_*` methods report whether a record was actually removed, which
/// the services use to make repeated deletes surface as `NotFound`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::page::{Page, PageRequest};
use crate::models::project::Project;
use crate::models::task::{Task, TaskFilter};
use crate::models::user::User;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// User records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by id
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Finds a user by email
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Whether an account with this email already exists
    async fn email_exists(&self, email: &str) -> StoreResult<bool>;

    /// Inserts or updates a user record
    async fn save_user(&self, user: &User) -> StoreResult<()>;
}

/// Project records
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Finds a project by id
    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>>;

    /// All projects, newest first
    async fn list_projects(&self) -> StoreResult<Vec<Project>>;

    /// Projects owned by `owner_id`, newest first
    async fn list_projects_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Project>>;

    /// Inserts or updates a project record
    async fn save_project(&self, project: &Project) -> StoreResult<()>;

    /// Deletes a project and its tasks; returns false if it did not exist
    async fn delete_project(&self, id: Uuid) -> StoreResult<bool>;
}

/// Task records
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Finds a task by id
    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    /// All tasks matching `filter`, paginated
    async fn list_tasks(&self, filter: TaskFilter, page: PageRequest)
        -> StoreResult<Page<Task>>;

    /// Tasks in a project matching `filter`, paginated
    async fn list_tasks_by_project(
        &self,
        project_id: Uuid,
        filter: TaskFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Task>>;

    /// Tasks assigned to a user matching `filter`, paginated
    async fn list_tasks_by_assignee(
        &self,
        user_id: Uuid,
        filter: TaskFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Task>>;

    /// Inserts or updates a task record
    async fn save_task(&self, task: &Task) -> StoreResult<()>;

    /// Deletes a task; returns false if it did not exist
    async fn delete_task(&self, id: Uuid) -> StoreResult<bool>;
}

/// Everything the services need from persistence, as one trait object
pub trait Store: UserStore + ProjectStore + TaskStore {}

impl<T: UserStore + ProjectStore + TaskStore> Store for T {}
