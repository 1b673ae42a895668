mod common;

use axum::http::StatusCode;
use common::{build_test_app, post_json};
use serde_json::json;

#[tokio::test]
async fn enquiry_is_delivered() {
    let app = build_test_app();

    let (status, json) = post_json(
        &app,
        "/api/v1/enquiries",
        json!({
            "name": "Sam",
            "email": "sam@example.com",
            "subject": "Coaching",
            "message": "Do you offer 1:1 sessions?"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let sent = app.mailer.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject.as_deref(), Some("Coaching"));
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let app = build_test_app();

    let (status, json) = post_json(
        &app,
        "/api/v1/enquiries",
        json!({ "name": "Sam", "email": "sam@example.com", "message": "" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(app.mailer.sent().await.is_empty());
}
