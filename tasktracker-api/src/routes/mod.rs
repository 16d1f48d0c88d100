/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login)
/// - `admin`: User administration endpoints
/// - `projects`: Project CRUD endpoints
/// - `tasks`: Task lifecycle endpoints

pub mod health;
pub mod auth;
pub mod admin;
pub mod projects;
pub mod tasks;
