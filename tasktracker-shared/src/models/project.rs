/// Project model
///
/// Every project has exactly one owner. The owner is the authorization
/// anchor for MANAGER access: a manager may only touch projects they own.
/// Ownership is transferable only by an ADMIN.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL,
///     updated_at TIMESTAMPTZ NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Project entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID (UUID v4)
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Owning user (exactly one, required)
    pub owner_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    /// Project name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Explicit owner. Setting this is ADMIN-only; when absent the caller
    /// becomes the owner.
    pub owner_id: Option<Uuid>,
}

/// Partial update for a project
///
/// Only present fields overwrite the stored entity. An owner change is
/// ADMIN-only and the new owner must exist.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPatch {
    /// New name
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New owner
    pub owner_id: Option<Uuid>,
}

impl Project {
    /// Builds a new project record owned by `owner_id`
    pub fn new(name: String, description: Option<String>, owner_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the entity as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
