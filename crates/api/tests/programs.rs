mod common;

use axum::http::StatusCode;
use common::{build_test_app, delete, get, post_json, put_json};
use serde_json::json;

#[tokio::test]
async fn program_crud_lifecycle() {
    let app = build_test_app();

    let (status, created) = post_json(
        &app,
        "/api/v1/programs",
        json!({ "id": "strength-101", "title": "Strength 101", "weeks": 8 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], "strength-101");

    let (status, fetched) = get(&app, "/api/v1/programs/strength-101").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["weeks"], 8);

    let (status, updated) = put_json(
        &app,
        "/api/v1/programs/strength-101",
        json!({ "id": "ignored", "title": "Strength 102" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], "strength-101");
    assert!(updated.get("weeks").is_none());

    let (status, _) = delete(&app, "/api/v1/programs/strength-101").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, json) = get(&app, "/api/v1/programs/strength-101").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn create_without_id_generates_one() {
    let app = build_test_app();

    let (status, created) = post_json(&app, "/api/v1/programs", json!({ "title": "Mobility" })).await;

    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap();
    assert_eq!(id.len(), 36);

    let (status, _) = get(&app, &format!("/api/v1/programs/{id}")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn list_returns_all_programs() {
    let app = build_test_app();
    for id in ["b", "a"] {
        post_json(&app, "/api/v1/programs", json!({ "id": id })).await;
    }

    let (status, list) = get(&app, "/api/v1/programs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([{ "id": "a" }, { "id": "b" }]));
}

#[tokio::test]
async fn non_object_body_is_rejected() {
    let app = build_test_app();

    let (status, json) = post_json(&app, "/api/v1/programs", json!([1, 2, 3])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn update_and_delete_of_missing_program_are_404() {
    let app = build_test_app();

    let (status, _) = put_json(&app, "/api/v1/programs/ghost", json!({ "title": "x" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = delete(&app, "/api/v1/programs/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
