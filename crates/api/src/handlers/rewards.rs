//! Handlers for reward state, claiming, validation and redemption.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::engine::rewards::{ClaimedReward, CodeValidation, RedeemedCode, RewardsOverview};
use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRewardRequest {
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "rewardId is required"))]
    pub reward_id: String,
    pub discount_percent: f64,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCodeRequest {
    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RedeemCodeRequest {
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,
}

/// GET /rewards/{user_id}
pub async fn get_rewards(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<RewardsOverview>> {
    let overview = state.rewards.fetch_state(&user_id).await?;
    Ok(Json(overview))
}

/// POST /rewards/claim
///
/// Mint a promotion code for an unlocked reward. Claiming the same reward
/// twice fails with `ALREADY_CLAIMED` and echoes the original code.
pub async fn claim_reward(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ClaimRewardRequest>,
) -> AppResult<Json<ClaimedReward>> {
    let claimed = state
        .rewards
        .claim(&input.user_id, &input.reward_id, input.discount_percent)
        .await?;
    Ok(Json(claimed))
}

/// POST /rewards/validate
pub async fn validate_code(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ValidateCodeRequest>,
) -> AppResult<Json<CodeValidation>> {
    let validation = state
        .rewards
        .validate_code(&input.code, input.user_id.as_deref())
        .await?;
    Ok(Json(validation))
}

/// POST /rewards/redeem
pub async fn redeem_code(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RedeemCodeRequest>,
) -> AppResult<Json<RedeemedCode>> {
    let redeemed = state.rewards.redeem(&input.user_id, &input.code).await?;
    Ok(Json(redeemed))
}
