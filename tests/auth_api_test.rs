mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{basic_auth, json_request, send, spawn_app, ADMIN_EMAIL, ADMIN_PASSWORD};

#[tokio::test]
async fn register_then_login() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/register",
            &json!({"username": "cadet", "email": "Cadet@Example.com", "password": "pw123"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["username"], "cadet");
    assert_eq!(body["user"]["is_admin"], false);
    assert!(body["user"]["last_login"].is_null());
    assert!(body["user"].get("password").is_none());

    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/login",
            &json!({"email": "cadet@example.com", "password": "pw123"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["user"].get("password").is_none());
    let last_login = body["user"]["last_login"].as_str().unwrap();
    assert!(last_login.ends_with("+05:30"), "{}", last_login);
}

#[tokio::test]
async fn emails_are_unique_regardless_of_case() {
    let app = spawn_app().await;
    let first = json!({"username": "one", "email": "same@example.com", "password": "pw"});
    let second = json!({"username": "two", "email": "SAME@example.com", "password": "pw"});

    let (status, _) = send(&app.router, json_request("POST", "/api/register", &first, None)).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app.router, json_request("POST", "/api/register", &second, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already in use");
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let app = spawn_app().await;
    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/register",
            &json!({"username": "admin", "email": "other@example.com", "password": "pw"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username already in use");
}

#[tokio::test]
async fn login_failures_are_unauthorized() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/login",
            &json!({"email": "ghost@example.com", "password": "pw"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "You need to register first");

    let (status, _) = send(
        &app.router,
        json_request(
            "POST",
            "/api/login",
            &json!({"email": ADMIN_EMAIL, "password": "wrong"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_registration_reports_fields() {
    let app = spawn_app().await;
    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/register",
            &json!({"username": "x", "email": "not-an-email", "password": "pw"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["email"].is_array());

    let (status, _) = send(
        &app.router,
        json_request("POST", "/api/login", &json!({"email": ADMIN_EMAIL}), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn legacy_plaintext_admin_still_authorizes_after_upgrade() {
    let app = spawn_app().await;
    app.state
        .user_service
        .import("legacy", "legacy@example.com", "OldSecret1", true, None)
        .await
        .unwrap()
        .unwrap();

    let auth = basic_auth("legacy", "OldSecret1");
    for _ in 0..2 {
        let (status, _) = send(
            &app.router,
            json_request("POST", "/api/wat", &json!({"words": ["Dawn"]}), Some(&auth)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let stored = app
        .state
        .user_service
        .find_by_username("legacy")
        .await
        .unwrap()
        .unwrap();
    assert!(stored.password.starts_with("$argon2"));
    assert!(stored.last_login.is_some());

    let (status, _) = send(
        &app.router,
        json_request(
            "POST",
            "/api/login",
            &json!({"email": "legacy@example.com", "password": ADMIN_PASSWORD}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
