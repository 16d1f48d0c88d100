/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - A router wired to an in-memory store (no database required)
/// - Seeded users per role
/// - JWT token generation
/// - Request helpers

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use chrono::Duration;
use serde_json::Value;
use tasktracker_api::app::{build_router, AppState};
use tasktracker_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use tasktracker_shared::auth::{jwt, password};
use tasktracker_shared::models::user::{CreateUser, Role, User};
use tasktracker_shared::store::memory::InMemoryStore;
use tasktracker_shared::store::UserStore;

/// Password used for every seeded account
pub const TEST_PASSWORD: &str = "password123";

const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context containing the router and seeded accounts
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub app: axum::Router,
    pub admin: User,
    pub manager: User,
    pub user: User,
}

impl TestContext {
    /// Creates a new test context with a fresh in-memory store
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());

        let admin = seed_user(&store, "admin@example.com", Role::Admin).await;
        let manager = seed_user(&store, "manager@example.com", Role::Manager).await;
        let user = seed_user(&store, "user@example.com", Role::User).await;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://unused/test".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: TEST_SECRET.to_string(),
                expiration_hours: 1,
            },
        };

        let app = build_router(AppState::new(store.clone(), config));

        Self {
            store,
            app,
            admin,
            manager,
            user,
        }
    }

    /// Bearer header value for the given seeded account
    pub fn auth_header(&self, user: &User) -> String {
        let claims = jwt::Claims::new(user.id, &user.email, Duration::hours(1));
        let token = jwt::create_token(&claims, TEST_SECRET).unwrap();
        format!("Bearer {}", token)
    }
}

async fn seed_user(store: &InMemoryStore, email: &str, role: Role) -> User {
    let user = User::new(CreateUser {
        email: email.to_string(),
        password_hash: password::hash_password(TEST_PASSWORD).unwrap(),
        role,
    });
    store.save_user(&user).await.unwrap();
    user
}

/// Builds an authenticated JSON request
pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Builds a body-less request, optionally authenticated
pub fn bare_request(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::empty()).unwrap()
}

/// Reads a response body as JSON
pub async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
