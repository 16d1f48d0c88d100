/// Caller identity resolution
///
/// The HTTP layer turns a validated token into a [`Principal`] and threads
/// it explicitly into every service call — there is no ambient security
/// context anywhere in the system, so authorization is testable by handing
/// a service any principal you like.
///
/// Resolution failure modes:
///
/// - no authenticated principal present → `ServiceError::Unauthenticated`
/// - principal resolves to no stored user → `ServiceError::Inconsistency`,
///   a fatal data-integrity fault (a live session referencing a deleted
///   account), never treated as a normal error

use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};
use crate::models::user::User;
use crate::store::UserStore;

/// The authenticated identity attached to a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// Principal name — the account email carried in the token
    pub email: String,

    /// Whether a valid credential backed this principal
    pub authenticated: bool,
}

impl Principal {
    /// Builds an authenticated principal for `email`
    pub fn authenticated(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            authenticated: true,
        }
    }

    /// Builds an anonymous, unauthenticated principal
    pub fn anonymous() -> Self {
        Self {
            email: String::new(),
            authenticated: false,
        }
    }
}

/// Resolves the principal to its stored user record
///
/// Every service operation calls this first; role and identity are always
/// re-read live, never cached across calls.
pub async fn resolve_caller(
    store: &dyn UserStore,
    principal: &Principal,
) -> ServiceResult<User> {
    if !principal.authenticated {
        return Err(ServiceError::Unauthenticated);
    }

    store
        .find_user_by_email(&principal.email)
        .await?
        .ok_or_else(|| {
            ServiceError::Inconsistency(format!(
                "Authenticated principal has no user record: {}",
                principal.email
            ))
        })
}
