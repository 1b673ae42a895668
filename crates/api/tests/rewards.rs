mod common;

use axum::http::StatusCode;
use common::{build_test_app, complete_programs, get, post_json};
use programking_payments::memory::Operation;
use programking_payments::PaymentProvider;
use serde_json::json;

async fn claim(app: &common::TestApp, user_id: &str, reward_id: &str) -> (StatusCode, serde_json::Value) {
    post_json(
        app,
        "/api/v1/rewards/claim",
        json!({ "userId": user_id, "rewardId": reward_id, "discountPercent": 20 }),
    )
    .await
}

#[tokio::test]
async fn unknown_user_has_empty_state() {
    let app = build_test_app();

    let (status, json) = get(&app, "/api/v1/rewards/nobody").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "completedPrograms": 0, "rewards": {} }));
}

#[tokio::test]
async fn completing_the_same_program_twice_counts_once() {
    let app = build_test_app();
    let body = json!({ "userId": "u1", "programId": "p1" });

    let (_, first) = post_json(&app, "/api/v1/progress/complete", body.clone()).await;
    let (status, second) = post_json(&app, "/api/v1/progress/complete", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["completedPrograms"], 1);
    assert_eq!(second["completedPrograms"], 1);
    assert_eq!(second["programs"], json!(["p1"]));
}

#[tokio::test]
async fn claim_is_gated_on_threshold() {
    let app = build_test_app();
    complete_programs(&app, "u1", 4).await;

    let (status, json) = claim(&app, "u1", "reward-5-programs").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INSUFFICIENT_PROGRESS");
    assert_eq!(json["completed"], 4);

    complete_programs(&app, "u1", 5).await;
    let (status, _) = claim(&app, "u1", "reward-5-programs").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_reward_is_rejected() {
    let app = build_test_app();
    complete_programs(&app, "u1", 10).await;

    let (status, json) = claim(&app, "u1", "reward-3-programs").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_REWARD");
}

#[tokio::test]
async fn out_of_range_discount_is_rejected() {
    let app = build_test_app();
    complete_programs(&app, "u1", 2).await;

    let (status, json) = post_json(
        &app,
        "/api/v1/rewards/claim",
        json!({ "userId": "u1", "rewardId": "reward-2-programs", "discountPercent": 150 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(app.payments.coupon_count().await, 0);
}

#[tokio::test]
async fn second_claim_returns_original_code() {
    let app = build_test_app();
    complete_programs(&app, "u1", 2).await;

    let (_, first) = claim(&app, "u1", "reward-2-programs").await;
    let (status, second) = claim(&app, "u1", "reward-2-programs").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(second["code"], "ALREADY_CLAIMED");
    assert_eq!(second["promotionCode"], first["code"]);
    assert_eq!(app.payments.promotion_codes().await.len(), 1);
}

#[tokio::test]
async fn second_claim_with_bad_discount_still_returns_original_code() {
    let app = build_test_app();
    complete_programs(&app, "u1", 2).await;
    let (_, first) = claim(&app, "u1", "reward-2-programs").await;

    let (status, second) = post_json(
        &app,
        "/api/v1/rewards/claim",
        json!({ "userId": "u1", "rewardId": "reward-2-programs", "discountPercent": 0 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(second["code"], "ALREADY_CLAIMED");
    assert_eq!(second["promotionCode"], first["code"]);
    assert_eq!(app.payments.coupon_count().await, 1);
}

#[tokio::test]
async fn concurrent_claims_mint_one_code() {
    let app = build_test_app();
    complete_programs(&app, "u1", 2).await;

    let (a, b) = tokio::join!(
        claim(&app, "u1", "reward-2-programs"),
        claim(&app, "u1", "reward-2-programs"),
    );

    let mut statuses = [a.0, b.0];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::BAD_REQUEST]);
    assert_eq!(app.payments.promotion_codes().await.len(), 1);
}

#[tokio::test]
async fn claim_validate_redeem_scenario() {
    let app = build_test_app();
    complete_programs(&app, "user-1", 5).await;

    let (_, state) = get(&app, "/api/v1/rewards/user-1").await;
    assert_eq!(state["completedPrograms"], 5);

    let (status, claimed) = claim(&app, "user-1", "reward-5-programs").await;
    assert_eq!(status, StatusCode::OK);
    let code = claimed["code"].as_str().unwrap().to_string();
    assert!(code.starts_with("PKUSER5"), "{code}");

    let (status, validation) = post_json(
        &app,
        "/api/v1/rewards/validate",
        json!({ "code": code, "userId": "user-1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(validation["valid"], true);
    assert_eq!(validation["discountPercent"], 20.0);
    assert_eq!(validation["rewardId"], "reward-5-programs");

    let (status, redeemed) = post_json(
        &app,
        "/api/v1/rewards/redeem",
        json!({ "userId": "user-1", "code": code }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(redeemed["used"], true);

    // Exhaustion is tracked by the provider, not by the local flag.
    let (status, _) = post_json(&app, "/api/v1/rewards/validate", json!({ "code": code })).await;
    assert_eq!(status, StatusCode::OK);

    let (_, state) = get(&app, "/api/v1/rewards/user-1").await;
    assert_eq!(state["rewards"]["reward-5-programs"]["used"], true);
    assert_eq!(state["rewards"]["reward-5-programs"]["claimed"], true);
}

#[tokio::test]
async fn redeem_twice_keeps_first_timestamp() {
    let app = build_test_app();
    complete_programs(&app, "u1", 2).await;
    let (_, claimed) = claim(&app, "u1", "reward-2-programs").await;
    let body = json!({ "userId": "u1", "code": claimed["code"] });

    let (_, first) = post_json(&app, "/api/v1/rewards/redeem", body.clone()).await;
    let (status, second) = post_json(&app, "/api/v1/payment/mark-code-used", json!({
        "userId": "u1",
        "promotionCode": claimed["code"],
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["alreadyUsed"], false);
    assert_eq!(second["alreadyUsed"], true);
    assert_eq!(second["used"], true);
    assert_eq!(second["usedAt"], first["usedAt"]);
}

#[tokio::test]
async fn redeem_is_case_insensitive() {
    let app = build_test_app();
    complete_programs(&app, "u1", 2).await;
    let (_, claimed) = claim(&app, "u1", "reward-2-programs").await;
    let lower = claimed["code"].as_str().unwrap().to_lowercase();

    let (status, _) = post_json(
        &app,
        "/api/v1/rewards/redeem",
        json!({ "userId": "u1", "code": lower }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn redeem_unknown_code_is_404() {
    let app = build_test_app();

    let (status, json) = post_json(
        &app,
        "/api/v1/rewards/redeem",
        json!({ "userId": "u1", "code": "PKNOPE" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "CODE_NOT_FOUND");
}

#[tokio::test]
async fn validate_rejects_other_users_code() {
    let app = build_test_app();
    complete_programs(&app, "u1", 2).await;
    let (_, claimed) = claim(&app, "u1", "reward-2-programs").await;

    let (status, json) = post_json(
        &app,
        "/api/v1/rewards/validate",
        json!({ "code": claimed["code"], "userId": "u2" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "CODE_NOT_OWNED");
}

#[tokio::test]
async fn validate_reports_exhausted_and_unknown_codes() {
    let app = build_test_app();
    complete_programs(&app, "u1", 2).await;
    let (_, claimed) = claim(&app, "u1", "reward-2-programs").await;
    let code = claimed["code"].as_str().unwrap();

    app.payments.redeem(code).await.unwrap();
    let (status, json) = post_json(&app, "/api/v1/rewards/validate", json!({ "code": code })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "CODE_EXHAUSTED");

    let (status, json) =
        post_json(&app, "/api/v1/rewards/validate", json!({ "code": "PKMISSING" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "INVALID_CODE");
}

#[tokio::test]
async fn validate_reports_inactive_codes() {
    let app = build_test_app();
    complete_programs(&app, "u1", 2).await;
    let (_, claimed) = claim(&app, "u1", "reward-2-programs").await;
    let promotion_code_id = claimed["promotionCodeId"].as_str().unwrap();

    app.payments
        .deactivate_promotion_code(promotion_code_id)
        .await
        .unwrap();

    let (status, json) = post_json(
        &app,
        "/api/v1/rewards/validate",
        json!({ "code": claimed["code"], "userId": "u1" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "CODE_INACTIVE");
}

#[tokio::test]
async fn failed_promotion_code_deletes_coupon() {
    let app = build_test_app();
    complete_programs(&app, "u1", 2).await;
    app.payments.fail_next(Operation::CreatePromotionCode).await;

    let (status, json) = claim(&app, "u1", "reward-2-programs").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "PAYMENT_PROVIDER_ERROR");
    assert_eq!(app.payments.coupon_count().await, 0);

    let (_, state) = get(&app, "/api/v1/rewards/u1").await;
    assert_eq!(state["rewards"], json!({}));
}

#[tokio::test]
async fn failed_state_save_deactivates_promotion_code() {
    let app = build_test_app();
    complete_programs(&app, "u1", 2).await;
    app.store.fail_writes(true);

    let (status, json) = claim(&app, "u1", "reward-2-programs").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "STORE_ERROR");
    let codes = app.payments.promotion_codes().await;
    assert_eq!(codes.len(), 1);
    assert!(!codes[0].active);

    // The reward can be claimed again once the store recovers.
    app.store.fail_writes(false);
    let (status, _) = claim(&app, "u1", "reward-2-programs").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_fields_are_validation_errors() {
    let app = build_test_app();

    let (status, json) = post_json(
        &app,
        "/api/v1/rewards/redeem",
        json!({ "userId": "", "code": "PK" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let (status, json) = post_json(&app, "/api/v1/rewards/claim", json!({ "userId": "u1" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn progress_endpoint_reports_completed_programs() {
    let app = build_test_app();

    let (status, empty) = get(&app, "/api/v1/progress/u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty, json!({ "completedPrograms": 0, "programs": [] }));

    complete_programs(&app, "u1", 3).await;
    let (_, progress) = get(&app, "/api/v1/progress/u1").await;
    assert_eq!(progress["completedPrograms"], 3);
    assert_eq!(progress["programs"], json!(["p1", "p2", "p3"]));
}
