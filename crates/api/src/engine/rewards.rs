//! Reward issuance and redemption.
//!
//! Per user and reward the lifecycle is `Unclaimed -> Claimed -> Used`.
//! Unclaimed is the absence of an entry. Claiming mints a single-use
//! coupon and promotion code at the payment provider and records them;
//! redeeming flips the local `used` flag. The provider's own redemption
//! counter is what actually stops a code from being reused at checkout.

use std::sync::Arc;

use chrono::Utc;
use programking_core::discount::validate_discount_percent;
use programking_core::rewards::{coupon_name, generate_promotion_code, RewardError, RewardId};
use programking_core::types::Timestamp;
use programking_db::models::reward::{MarkUsed, RewardEntry, RewardState};
use programking_db::repositories::{ProgressRepo, RewardRepo};
use programking_db::KvStore;
use programking_payments::{
    Coupon, Metadata, NewCoupon, NewPromotionCode, PaymentProvider, PromotionCode,
};
use serde::Serialize;

use super::locks::UserLocks;
use crate::error::AppResult;

/// Metadata key carrying the owning user on provider objects.
pub const METADATA_USER_ID: &str = "userId";

/// Metadata key carrying the reward on provider objects.
pub const METADATA_REWARD_ID: &str = "rewardId";

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Progress plus reward state for one user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardsOverview {
    pub completed_programs: u32,
    pub rewards: RewardState,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimedReward {
    pub reward_id: RewardId,
    pub code: String,
    pub discount_percent: f64,
    pub promotion_code_id: String,
    pub claimed_at: Timestamp,
}

/// A promotion code that passed every provider-side check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeValidation {
    pub valid: bool,
    pub code: String,
    pub discount_percent: Option<f64>,
    pub promotion_code_id: String,
    pub reward_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemedCode {
    pub reward_id: RewardId,
    pub code: String,
    pub used: bool,
    pub used_at: Option<Timestamp>,
    /// `true` when the code had already been marked used before this call.
    pub already_used: bool,
}

// ---------------------------------------------------------------------------
// RewardEngine
// ---------------------------------------------------------------------------

pub struct RewardEngine {
    store: Arc<dyn KvStore>,
    payments: Arc<dyn PaymentProvider>,
    locks: Arc<UserLocks>,
}

impl RewardEngine {
    pub fn new(
        store: Arc<dyn KvStore>,
        payments: Arc<dyn PaymentProvider>,
        locks: Arc<UserLocks>,
    ) -> Self {
        Self {
            store,
            payments,
            locks,
        }
    }

    /// Completed-program count and reward map. Unknown users get zeros.
    pub async fn fetch_state(&self, user_id: &str) -> AppResult<RewardsOverview> {
        let progress = ProgressRepo::get_or_default(self.store.as_ref(), user_id).await?;
        let rewards = RewardRepo::get_state(self.store.as_ref(), user_id).await?;

        Ok(RewardsOverview {
            completed_programs: progress.completed_programs,
            rewards,
        })
    }

    /// Mint a promotion code for `reward_id` if the user has earned it.
    ///
    /// A second claim for the same reward returns
    /// [`RewardError::AlreadyClaimed`] carrying the original code whatever
    /// discount it asks for; no new code is ever minted for a claimed reward.
    pub async fn claim(
        &self,
        user_id: &str,
        reward_id: &str,
        discount_percent: f64,
    ) -> AppResult<ClaimedReward> {
        let reward_id: RewardId = reward_id.parse()?;

        let _guard = self.locks.lock(user_id).await;

        let mut state = RewardRepo::get_state(self.store.as_ref(), user_id).await?;
        if let Some(existing) = state.claimed(reward_id) {
            tracing::info!(user_id, %reward_id, "Reward already claimed");
            return Err(RewardError::AlreadyClaimed {
                code: existing.code.clone(),
            }
            .into());
        }

        validate_discount_percent(discount_percent)?;

        let progress = ProgressRepo::get_or_default(self.store.as_ref(), user_id).await?;
        if !reward_id.is_unlocked(progress.completed_programs) {
            return Err(RewardError::InsufficientProgress {
                reward_id,
                required: reward_id.required_programs(),
                completed: progress.completed_programs,
            }
            .into());
        }

        let now = Utc::now();
        let code = generate_promotion_code(user_id, reward_id, now);
        let (coupon, promo) = self
            .mint(user_id, reward_id, discount_percent, &code)
            .await?;

        state.insert(
            reward_id,
            RewardEntry {
                claimed: true,
                claimed_at: now,
                code: promo.code.clone(),
                provider_promotion_id: promo.id.clone(),
                provider_coupon_id: coupon.id.clone(),
                discount_percent: Some(discount_percent),
                used: false,
                used_at: None,
            },
        );

        if let Err(err) = RewardRepo::save_state(self.store.as_ref(), user_id, &state).await {
            // The code exists at the provider but not locally; make it unusable.
            if let Err(comp) = self.payments.deactivate_promotion_code(&promo.id).await {
                tracing::error!(
                    user_id,
                    promotion_code_id = %promo.id,
                    error = %comp,
                    "Failed to deactivate orphaned promotion code",
                );
            }
            return Err(err.into());
        }

        tracing::info!(
            user_id,
            %reward_id,
            promotion_code_id = %promo.id,
            coupon_id = %coupon.id,
            discount_percent,
            "Reward claimed",
        );

        Ok(ClaimedReward {
            reward_id,
            code: promo.code,
            discount_percent,
            promotion_code_id: promo.id,
            claimed_at: now,
        })
    }

    /// Create the coupon and its promotion code, deleting the coupon again
    /// if the promotion code cannot be created.
    async fn mint(
        &self,
        user_id: &str,
        reward_id: RewardId,
        discount_percent: f64,
        code: &str,
    ) -> AppResult<(Coupon, PromotionCode)> {
        let metadata = Metadata::from([
            (METADATA_USER_ID.to_string(), user_id.to_string()),
            (METADATA_REWARD_ID.to_string(), reward_id.to_string()),
        ]);

        let coupon = self
            .payments
            .create_coupon(NewCoupon {
                name: coupon_name(reward_id, discount_percent),
                percent_off: discount_percent,
                max_redemptions: Some(1),
                metadata: metadata.clone(),
            })
            .await?;

        let promo = match self
            .payments
            .create_promotion_code(NewPromotionCode {
                coupon_id: coupon.id.clone(),
                code: code.to_string(),
                max_redemptions: Some(1),
                metadata,
            })
            .await
        {
            Ok(promo) => promo,
            Err(err) => {
                tracing::warn!(
                    user_id,
                    %reward_id,
                    coupon_id = %coupon.id,
                    error = %err,
                    "Promotion code creation failed, deleting coupon",
                );
                if let Err(comp) = self.payments.delete_coupon(&coupon.id).await {
                    tracing::error!(
                        coupon_id = %coupon.id,
                        error = %comp,
                        "Failed to delete orphaned coupon",
                    );
                }
                return Err(err.into());
            }
        };

        Ok((coupon, promo))
    }

    /// Check a promotion code against the payment provider.
    ///
    /// Side-effect free: the code is not marked used. When `user_id` is
    /// given, codes minted for a different user are rejected; codes without
    /// an owner (generic promotions) pass.
    pub async fn validate_code(
        &self,
        code: &str,
        user_id: Option<&str>,
    ) -> AppResult<CodeValidation> {
        let code = code.trim();
        let promo = self
            .payments
            .find_promotion_code(code)
            .await?
            .ok_or_else(|| RewardError::InvalidCode(code.to_string()))?;

        if !promo.active {
            return Err(RewardError::CodeInactive.into());
        }
        if promo.is_exhausted() {
            return Err(RewardError::CodeExhausted.into());
        }
        if let (Some(user_id), Some(owner)) = (user_id, promo.metadata.get(METADATA_USER_ID)) {
            if owner != user_id {
                tracing::warn!(user_id, promotion_code_id = %promo.id, "Promotion code owner mismatch");
                return Err(RewardError::CodeNotOwned.into());
            }
        }

        Ok(CodeValidation {
            valid: true,
            discount_percent: promo.coupon.percent_off,
            reward_id: promo.metadata.get(METADATA_REWARD_ID).cloned(),
            promotion_code_id: promo.id,
            code: promo.code,
        })
    }

    /// Mark the user's reward holding `code` as used.
    ///
    /// Repeated calls succeed without changing the stored entry. This is the
    /// single redeem path behind both the explicit redeem endpoint and the
    /// post-payment hooks.
    pub async fn redeem(&self, user_id: &str, code: &str) -> AppResult<RedeemedCode> {
        let _guard = self.locks.lock(user_id).await;

        let mut state = RewardRepo::get_state(self.store.as_ref(), user_id).await?;
        let outcome = state
            .mark_used(code, Utc::now())
            .ok_or_else(|| RewardError::CodeNotFound(code.trim().to_string()))?;

        if let MarkUsed::Marked(reward_id) = outcome {
            RewardRepo::save_state(self.store.as_ref(), user_id, &state).await?;
            tracing::info!(user_id, %reward_id, "Reward code marked used");
        }

        let reward_id = outcome.reward_id();
        let entry = state
            .get(reward_id)
            .ok_or_else(|| RewardError::CodeNotFound(code.trim().to_string()))?;

        Ok(RedeemedCode {
            reward_id,
            code: entry.code.clone(),
            used: entry.used,
            used_at: entry.used_at,
            already_used: matches!(outcome, MarkUsed::AlreadyUsed(_)),
        })
    }
}
