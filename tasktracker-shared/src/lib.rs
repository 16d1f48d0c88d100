//! # Tasktracker Shared Library
//!
//! This crate contains the domain types and business logic shared by the
//! tasktracker API server: entities, the persistence seam, authentication
//! primitives, and the authorization/lifecycle services.
//!
//! ## Module Organization
//!
//! - `models`: domain entities (users, projects, tasks) and pagination
//! - `store`: persistence traits plus Postgres and in-memory backends
//! - `auth`: password hashing, JWT tokens, and caller identity resolution
//! - `service`: project/task/user operations with explicit access guards
//! - `error`: the service-level error taxonomy

pub mod auth;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

/// Current version of the tasktracker shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
