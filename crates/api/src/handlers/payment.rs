//! Handlers for checkout: payment intents, status, code consumption and
//! the provider webhook.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use programking_core::rewards::RewardError;
use programking_core::webhook::{verify_signature, DEFAULT_TOLERANCE_SECS};
use programking_payments::Metadata;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::engine::checkout::{CreatedPaymentIntent, PaymentEvent, PaymentStatus};
use crate::engine::rewards::{RedeemedCode, METADATA_USER_ID};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// Header carrying the provider's webhook signature.
const SIGNATURE_HEADER: &str = "stripe-signature";

fn default_currency() -> String {
    "usd".to_string()
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    /// Amount in the smallest currency unit.
    #[validate(range(min = 1, message = "amount must be positive"))]
    pub amount: i64,
    #[serde(default = "default_currency")]
    #[validate(length(equal = 3, message = "currency must be a 3-letter ISO code"))]
    pub currency: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub promotion_code: Option<String>,
    /// Recorded on the intent so a successful payment can redeem the code.
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    #[validate(length(min = 1, message = "paymentIntentId is required"))]
    pub payment_intent_id: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MarkCodeUsedRequest {
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "promotionCode is required"))]
    pub promotion_code: String,
}

/// POST /payment/create-intent
///
/// An unknown or unusable promotion code does not fail the request; the
/// intent is created at full price and `discountOutcome` says why.
pub async fn create_intent(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreatePaymentIntentRequest>,
) -> AppResult<Json<CreatedPaymentIntent>> {
    let mut metadata = input.metadata;
    if let Some(user_id) = input.user_id.filter(|u| !u.trim().is_empty()) {
        metadata.insert(METADATA_USER_ID.to_string(), user_id);
    }

    let created = state
        .checkout
        .create_payment_intent(
            input.amount,
            &input.currency,
            metadata,
            input.promotion_code.as_deref(),
        )
        .await?;
    Ok(Json(created))
}

/// POST /payment/confirm
pub async fn confirm_payment(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ConfirmPaymentRequest>,
) -> AppResult<Json<PaymentStatus>> {
    let status = state
        .checkout
        .confirm_payment_status(&input.payment_intent_id)
        .await?;
    Ok(Json(status))
}

/// POST /payment/mark-code-used
///
/// Same operation as `/rewards/redeem`, kept for the checkout client.
pub async fn mark_code_used(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<MarkCodeUsedRequest>,
) -> AppResult<Json<RedeemedCode>> {
    let redeemed = state
        .rewards
        .redeem(&input.user_id, &input.promotion_code)
        .await?;
    Ok(Json(redeemed))
}

/// POST /payment/webhook
///
/// Verifies the signature when a webhook secret is configured, then redeems
/// the reward code of a successful payment. Events we do not act on are
/// acknowledged so the provider stops retrying them.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<Value>> {
    if let Some(secret) = state.config.payment_webhook_secret.as_deref() {
        let header = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::BadRequest("Missing webhook signature".into()))?;

        verify_signature(
            secret,
            header,
            &body,
            Utc::now().timestamp(),
            DEFAULT_TOLERANCE_SECS,
        )
        .map_err(|e| {
            tracing::warn!(error = %e, "Rejected payment webhook");
            AppError::BadRequest(format!("Invalid webhook signature: {e}"))
        })?;
    }

    let event: PaymentEvent = serde_json::from_str(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid webhook payload: {e}")))?;

    let Some((user_id, code)) = event.redemption() else {
        tracing::debug!(event_type = %event.event_type, "Ignoring payment webhook event");
        return Ok(Json(json!({ "received": true })));
    };

    match state.rewards.redeem(user_id, code).await {
        Ok(redeemed) => {
            tracing::info!(
                user_id,
                reward_id = %redeemed.reward_id,
                already_used = redeemed.already_used,
                "Reward code redeemed from payment webhook",
            );
        }
        // The code was not a reward code for this user (e.g. a generic promotion).
        Err(AppError::Reward(RewardError::CodeNotFound(_))) => {
            tracing::warn!(user_id, code, "Paid promotion code is not a stored reward");
        }
        Err(e) => return Err(e),
    }

    Ok(Json(json!({ "received": true })))
}
