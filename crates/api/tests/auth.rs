mod common;

use axum::http::StatusCode;
use common::{build_test_app, get, post_json};
use serde_json::json;

#[tokio::test]
async fn signup_creates_session_and_profile() {
    let app = build_test_app();

    let (status, json) = post_json(
        &app,
        "/api/v1/auth/signup",
        json!({ "email": "ada@example.com", "password": "hunter22", "name": "Ada Lovelace" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["user"]["email"], "ada@example.com");
    assert!(json["session"]["access_token"].is_string());

    let user_id = json["user"]["id"].as_str().unwrap();
    let (status, profile) = get(&app, &format!("/api/v1/profile/{user_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["firstName"], "Ada");
    assert_eq!(profile["lastName"], "Lovelace");
}

#[tokio::test]
async fn short_password_is_rejected() {
    let app = build_test_app();

    let (status, json) = post_json(
        &app,
        "/api/v1/auth/signup",
        json!({ "email": "ada@example.com", "password": "123" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn duplicate_email_is_rejected_by_provider() {
    let app = build_test_app();
    let body = json!({ "email": "ada@example.com", "password": "hunter22" });

    post_json(&app, "/api/v1/auth/signup", body.clone()).await;
    let (status, json) = post_json(&app, "/api/v1/auth/signup", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "IDENTITY_REJECTED");
}
