/// Authorization and lifecycle services
///
/// The decision logic of the system lives here. Each operation is a single
/// independent unit of work — resolve the caller, look up the target,
/// consult a guard from [`access`], then mutate and persist — with no
/// cached permission decisions and no cross-operation state.
///
/// # Modules
///
/// - `access`: the explicit guard functions, one per rule
/// - `projects`: project CRUD and ownership transfer
/// - `tasks`: task CRUD, assignment, and the assignee-only status rule
/// - `users`: registration and admin-only account creation

pub mod access;
pub mod projects;
pub mod tasks;
pub mod users;
