/// User account management
///
/// Two creation paths exist and no others: public registration (always a
/// USER-role account) and ADMIN-created accounts with an arbitrary role.
/// Roles are immutable after creation and accounts are never deleted.

use std::sync::Arc;

use tracing::info;

use crate::auth::identity::{resolve_caller, Principal};
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{CreateUser, Role, User};
use crate::service::access;
use crate::store::Store;

/// User operations over a shared store
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
}

impl UserService {
    /// Creates a service over the given store
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Registers a new USER-role account; no authentication required
    pub async fn register(&self, email: String, password_hash: String) -> ServiceResult<User> {
        if self.store.email_exists(&email).await? {
            return Err(ServiceError::Conflict("Email is already in use".to_string()));
        }

        let user = User::new(CreateUser {
            email,
            password_hash,
            role: Role::User,
        });
        self.store.save_user(&user).await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Creates an account with any role; ADMIN only
    pub async fn create_user(
        &self,
        principal: &Principal,
        data: CreateUser,
    ) -> ServiceResult<User> {
        let caller = resolve_caller(self.store.as_ref(), principal).await?;
        access::require_admin(&caller)?;

        if self.store.email_exists(&data.email).await? {
            return Err(ServiceError::Conflict("Email is already taken".to_string()));
        }

        let role = data.role;
        let user = User::new(data);
        self.store.save_user(&user).await?;

        info!(user_id = %user.id, role = role.as_str(), "User created by admin");
        Ok(user)
    }
}
