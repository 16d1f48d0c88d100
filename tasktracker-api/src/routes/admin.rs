/// User administration endpoints
///
/// # Endpoints
///
/// - `POST /api/admin/users` - Create a user with an explicit role (ADMIN only)

use crate::{
    app::AppState,
    error::{validation_failed, ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use tasktracker_shared::{
    auth::{identity::Principal, password},
    models::user::{CreateUser, Role, User},
};
use validator::Validate;

/// Admin user-creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (will be validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Role granted to the new account
    pub role: Role,
}

/// Create a user with any role
///
/// Unlike self-service registration this can mint MANAGER and ADMIN
/// accounts. The service layer rejects non-ADMIN callers.
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an ADMIN
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    req.validate().map_err(validation_failed)?;

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    let password_hash = password::hash_password(&req.password)?;
    let user = state
        .users
        .create_user(
            &principal,
            CreateUser {
                email: req.email,
                password_hash,
                role: req.role,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}
