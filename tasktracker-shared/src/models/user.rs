/// User model and roles
///
/// Users carry exactly one role, assigned at creation and immutable
/// afterwards — there is no role-change operation anywhere in the system.
/// The role is the sole capability source; no per-user ACL lists exist.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('admin', 'manager', 'user');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL,
///     updated_at TIMESTAMPTZ NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RBAC role
///
/// - `Admin`: may touch any project or task, assign owners, create users
/// - `Manager`: may touch only projects they own and the tasks within them
/// - `User`: may touch only tasks assigned to them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Manager,
    User,
}

impl Role {
    /// Converts role to string for logging and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::User => "USER",
        }
    }
}

/// User account
///
/// Passwords are stored as Argon2id hashes, never in plaintext, and the
/// hash is never serialized into responses.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, unique across all users; doubles as the principal
    /// name carried in JWT claims
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Role, immutable after creation
    pub role: Role,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user account
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address (must not already be taken)
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Role for the new account
    pub role: Role,
}

impl User {
    /// Builds a new user record with a fresh id and timestamps
    pub fn new(data: CreateUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this user holds the ADMIN role
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
