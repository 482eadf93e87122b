//! Integration tests for registration, login, refresh, and profile routes.

mod common;

use axum::http::{Method, StatusCode};
use tower::ServiceExt;

use common::{
    get_request_with_auth, json_request, json_request_with_auth, parse_response_body,
    register_test_user, try_test_pool, TestUser,
};

#[tokio::test]
async fn test_register_returns_user_and_tokens() {
    let Some(pool) = try_test_pool().await else { return };
    let app = common::create_test_app(pool);

    let user = TestUser::new();
    let auth = register_test_user(&app, &user).await;

    assert_eq!(auth.username, user.username);
    assert!(!auth.access_token.is_empty());
    assert!(!auth.refresh_token.is_empty());
}

#[tokio::test]
async fn test_register_rejects_duplicate_username() {
    let Some(pool) = try_test_pool().await else { return };
    let app = common::create_test_app(pool);

    let user = TestUser::new();
    register_test_user(&app, &user).await;

    let request = json_request(
        Method::POST,
        "/api/v1/auth/register",
        serde_json::json!({
            "username": user.username,
            "email": format!("other_{}", user.email),
            "password": user.password,
            "first_name": "Other",
            "last_name": "User"
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let Some(pool) = try_test_pool().await else { return };
    let app = common::create_test_app(pool);

    let user = TestUser::new();
    let request = json_request(
        Method::POST,
        "/api/v1/auth/register",
        serde_json::json!({
            "username": user.username,
            "email": user.email,
            "password": "weak",
            "first_name": "Test",
            "last_name": "User"
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_round_trip() {
    let Some(pool) = try_test_pool().await else { return };
    let app = common::create_test_app(pool);

    let user = TestUser::new();
    register_test_user(&app, &user).await;

    let request = json_request(
        Method::POST,
        "/api/v1/auth/login",
        serde_json::json!({
            "username": user.username,
            "password": user.password
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = parse_response_body(response).await;
    assert_eq!(json["user"]["username"], user.username.as_str());
    assert!(json["tokens"]["access_token"].as_str().is_some());
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let Some(pool) = try_test_pool().await else { return };
    let app = common::create_test_app(pool);

    let user = TestUser::new();
    register_test_user(&app, &user).await;

    let request = json_request(
        Method::POST,
        "/api/v1/auth/login",
        serde_json::json!({
            "username": user.username,
            "password": "WrongP4ssword"
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_unknown_user() {
    let Some(pool) = try_test_pool().await else { return };
    let app = common::create_test_app(pool);

    let request = json_request(
        Method::POST,
        "/api/v1/auth/login",
        serde_json::json!({
            "username": "no_such_user",
            "password": "SecureP4ssword"
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_issues_new_tokens() {
    let Some(pool) = try_test_pool().await else { return };
    let app = common::create_test_app(pool);

    let user = TestUser::new();
    let auth = register_test_user(&app, &user).await;

    let request = json_request(
        Method::POST,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": auth.refresh_token }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = parse_response_body(response).await;
    assert!(json["access_token"].as_str().is_some());
    assert!(json["refresh_token"].as_str().is_some());
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let Some(pool) = try_test_pool().await else { return };
    let app = common::create_test_app(pool);

    let user = TestUser::new();
    let auth = register_test_user(&app, &user).await;

    // An access token must not work as a refresh token.
    let request = json_request(
        Method::POST,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": auth.access_token }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_profile_requires_auth() {
    let Some(pool) = try_test_pool().await else { return };
    let app = common::create_test_app(pool);

    let request = common::get_request("/api/v1/users/me");
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_update_round_trip() {
    let Some(pool) = try_test_pool().await else { return };
    let app = common::create_test_app(pool);

    let user = TestUser::new();
    let auth = register_test_user(&app, &user).await;

    let request = json_request_with_auth(
        Method::PUT,
        "/api/v1/users/me",
        serde_json::json!({
            "first_name": "Updated",
            "last_name": "Name",
            "job_title": "Team Lead",
            "company": "Acme"
        }),
        &auth.access_token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = get_request_with_auth("/api/v1/users/me", &auth.access_token);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = parse_response_body(response).await;
    assert_eq!(json["first_name"], "Updated");
    assert_eq!(json["job_title"], "Team Lead");
    assert_eq!(json["company"], "Acme");
}
