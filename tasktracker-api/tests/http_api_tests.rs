/// Integration tests for the HTTP surface
///
/// These drive the full router (middleware included) against the in-memory
/// store and check status codes and response shapes:
/// - Public vs authenticated routes
/// - Registration and login flow
/// - Project and task endpoints end-to-end
/// - Error mapping (401/403/404/409/422)

mod common;

use axum::http::StatusCode;
use common::{bare_request, json_request, response_json, TestContext, TEST_PASSWORD};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_is_public() {
    let ctx = TestContext::new().await;

    let response = ctx
        .app
        .clone()
        .oneshot(bare_request("GET", "/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "connected");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let ctx = TestContext::new().await;

    let response = ctx
        .app
        .clone()
        .oneshot(bare_request("GET", "/api/projects", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = ctx
        .app
        .clone()
        .oneshot(bare_request(
            "GET",
            "/api/projects",
            Some("Bearer not-a-token"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_and_login_flow() {
    let ctx = TestContext::new().await;

    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({ "email": "new@example.com", "password": "secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["email"], "new@example.com");
    assert_eq!(body["role"], "USER");
    // The stored hash must never leak through the API
    assert!(body.get("password_hash").is_none());

    // Same email again is a conflict
    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({ "email": "new@example.com", "password": "secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "new@example.com", "password": "secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let token = body["access_token"].as_str().unwrap();

    // The issued token opens protected routes
    let response = ctx
        .app
        .clone()
        .oneshot(bare_request(
            "GET",
            "/api/projects",
            Some(&format!("Bearer {}", token)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let ctx = TestContext::new().await;

    // Long enough but digit-free
    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({ "email": "weak@example.com", "password": "abcdefghij" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let ctx = TestContext::new().await;

    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "admin@example.com", "password": "wrong-password1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "ghost@example.com", "password": TEST_PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_user_creation() {
    let ctx = TestContext::new().await;

    // Managers may not mint accounts
    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/users",
            Some(&ctx.auth_header(&ctx.manager)),
            json!({ "email": "m2@example.com", "password": "secret123", "role": "MANAGER" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/users",
            Some(&ctx.auth_header(&ctx.admin)),
            json!({ "email": "m2@example.com", "password": "secret123", "role": "MANAGER" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["role"], "MANAGER");
}

#[tokio::test]
async fn test_project_lifecycle_over_http() {
    let ctx = TestContext::new().await;
    let manager_auth = ctx.auth_header(&ctx.manager);

    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/projects",
            Some(&manager_auth),
            json!({ "name": "Website", "description": "Relaunch" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let project = response_json(response).await;
    let project_id = project["id"].as_str().unwrap().to_string();
    assert_eq!(project["owner_id"], json!(ctx.manager.id));

    // Plain users have no read path into projects
    let response = ctx
        .app
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!("/api/projects/{}", project_id),
            Some(&ctx.auth_header(&ctx.user)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Partial update keeps the untouched fields
    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/projects/{}", project_id),
            Some(&manager_auth),
            json!({ "name": "Website v2" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = response_json(response).await;
    assert_eq!(updated["name"], "Website v2");
    assert_eq!(updated["description"], "Relaunch");

    let response = ctx
        .app
        .clone()
        .oneshot(bare_request(
            "DELETE",
            &format!("/api/projects/{}", project_id),
            Some(&manager_auth),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .app
        .clone()
        .oneshot(bare_request(
            "GET",
            &format!("/api/projects/{}", project_id),
            Some(&manager_auth),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_flow_assignment_and_status() {
    let ctx = TestContext::new().await;
    let manager_auth = ctx.auth_header(&ctx.manager);
    let user_auth = ctx.auth_header(&ctx.user);

    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/projects",
            Some(&manager_auth),
            json!({ "name": "P" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let project = response_json(response).await;

    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tasks",
            Some(&manager_auth),
            json!({
                "project_id": project["id"],
                "title": "Ship it",
                "assigned_user_id": ctx.user.id,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let task = response_json(response).await;
    let task_id = task["id"].as_str().unwrap().to_string();
    assert_eq!(task["status"], "TODO");
    assert_eq!(task["priority"], "MEDIUM");

    // Status changes belong to the assignee, not the manager
    let response = ctx
        .app
        .clone()
        .oneshot(bare_request(
            "PUT",
            &format!("/api/tasks/{}/status?status=IN_PROGRESS", task_id),
            Some(&manager_auth),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .app
        .clone()
        .oneshot(bare_request(
            "PUT",
            &format!("/api/tasks/{}/status?status=IN_PROGRESS", task_id),
            Some(&user_auth),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let task = response_json(response).await;
    assert_eq!(task["status"], "IN_PROGRESS");

    // The assignee sees the task in their own listing
    let response = ctx
        .app
        .clone()
        .oneshot(bare_request("GET", "/api/tasks", Some(&user_auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = response_json(response).await;
    assert_eq!(page["total_elements"], 1);
    assert_eq!(page["items"][0]["id"], json!(task_id));

    // Reassignment via the manager who owns the project
    let response = ctx
        .app
        .clone()
        .oneshot(bare_request(
            "PUT",
            &format!("/api/tasks/{}/assign?user_id={}", task_id, ctx.admin.id),
            Some(&manager_auth),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let task = response_json(response).await;
    assert_eq!(task["assigned_user_id"], json!(ctx.admin.id));

    // Explicit null unassigns through the generic update
    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/tasks/{}", task_id),
            Some(&manager_auth),
            json!({ "assigned_user_id": null }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let task = response_json(response).await;
    assert!(task["assigned_user_id"].is_null());
}

#[tokio::test]
async fn test_list_all_tasks_is_admin_only() {
    let ctx = TestContext::new().await;

    let response = ctx
        .app
        .clone()
        .oneshot(bare_request(
            "GET",
            "/api/tasks/all",
            Some(&ctx.auth_header(&ctx.manager)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .app
        .clone()
        .oneshot(bare_request(
            "GET",
            "/api/tasks/all?status=TODO&page=0&size=10",
            Some(&ctx.auth_header(&ctx.admin)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = response_json(response).await;
    assert_eq!(page["total_elements"], 0);
    assert_eq!(page["size"], 10);
}
