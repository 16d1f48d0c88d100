/// Service-level error taxonomy
///
/// Every operation in the service layer returns `ServiceResult<T>`. The
/// variants map one-to-one onto the failure kinds the boundary layer
/// translates into HTTP statuses:
///
/// - `Unauthenticated`: no valid caller identity (401)
/// - `Forbidden`: authenticated but insufficient role/ownership (403)
/// - `NotFound`: a referenced entity id does not exist (404); dangling
///   foreign references (assignee, new owner) surface the same way
/// - `Conflict`: uniqueness violation, e.g. duplicate email (409)
/// - `Inconsistency`: a data-integrity fault such as an authenticated
///   principal with no backing user record (500, fatal, never retried)
/// - `Store`: the persistence collaborator failed (500)
///
/// Authorization and lookup failures are policy decisions, not transient
/// faults; none of them is retried anywhere in the system.

use crate::store::StoreError;

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Unified error type for the service layer
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No authenticated caller in the request context
    #[error("No authenticated user")]
    Unauthenticated,

    /// Caller is authenticated but not allowed to perform the operation
    #[error("{0}")]
    Forbidden(String),

    /// Referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation (e.g. email already taken)
    #[error("{0}")]
    Conflict(String),

    /// Data-integrity fault; fatal, not a normal error path
    #[error("Data inconsistency: {0}")]
    Inconsistency(String),

    /// Persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Builds a `NotFound` for an entity kind and id
    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("{} not found: {}", kind, id))
    }

    /// Builds a `Forbidden` with a message
    pub fn forbidden(msg: impl Into<String>) -> Self {
        ServiceError::Forbidden(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_not_found_message() {
        let id = Uuid::nil();
        let err = ServiceError::not_found("Project", id);
        assert_eq!(
            err.to_string(),
            format!("Project not found: {}", id)
        );
    }

    #[test]
    fn test_unauthenticated_message() {
        assert_eq!(
            ServiceError::Unauthenticated.to_string(),
            "No authenticated user"
        );
    }

    #[test]
    fn test_inconsistency_is_prefixed() {
        let err = ServiceError::Inconsistency("user record missing".to_string());
        assert!(err.to_string().starts_with("Data inconsistency:"));
    }
}
