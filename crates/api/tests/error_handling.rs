//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no router needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use programking_api::error::AppError;
use programking_core::error::CoreError;
use programking_core::rewards::{RewardError, RewardId};
use programking_identity::IdentityError;
use programking_payments::PaymentError;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Program",
        id: "p1".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Program with id p1 not found");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Validation("email: required".into()))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "email: required");
}

#[tokio::test]
async fn already_claimed_carries_existing_code() {
    let err = AppError::Reward(RewardError::AlreadyClaimed {
        code: "PKUSER5ABCD".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "ALREADY_CLAIMED");
    assert_eq!(json["promotionCode"], "PKUSER5ABCD");
}

#[tokio::test]
async fn insufficient_progress_reports_counts() {
    let err = AppError::Reward(RewardError::InsufficientProgress {
        reward_id: RewardId::FivePrograms,
        required: 5,
        completed: 3,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INSUFFICIENT_PROGRESS");
    assert_eq!(json["required"], 5);
    assert_eq!(json["completed"], 3);
}

#[tokio::test]
async fn unknown_codes_are_404() {
    let (status, json) =
        error_to_response(AppError::Reward(RewardError::InvalidCode("X".into()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "INVALID_CODE");

    let (status, json) =
        error_to_response(AppError::Reward(RewardError::CodeNotFound("X".into()))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "CODE_NOT_FOUND");
}

#[tokio::test]
async fn payment_provider_failure_is_500_with_details() {
    let err = AppError::Payment(PaymentError::Api {
        status: 402,
        message: "Your card was declined".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "PAYMENT_PROVIDER_ERROR");
    assert!(json["details"]
        .as_str()
        .unwrap()
        .contains("Your card was declined"));
}

#[tokio::test]
async fn identity_rejection_is_400() {
    let err = AppError::Identity(IdentityError::Api {
        status: 422,
        message: "User already registered".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "IDENTITY_REJECTED");
    assert_eq!(json["details"], "User already registered");
}

#[tokio::test]
async fn internal_error_hides_message() {
    let (status, json) =
        error_to_response(AppError::InternalError("secret db password".into())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}
