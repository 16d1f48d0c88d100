/// Domain models for tasktracker
///
/// # Models
///
/// - `user`: user accounts and the three-role RBAC model
/// - `project`: projects with a single required owner
/// - `task`: tasks scoped to a project, optionally assigned to a user
/// - `page`: pagination request/response types shared by the list operations

pub mod page;
pub mod project;
pub mod task;
pub mod user;
