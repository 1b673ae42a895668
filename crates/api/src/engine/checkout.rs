//! Payment intent creation with optional promotion-code discounts.

use std::sync::Arc;

use programking_core::discount::apply_percent_off;
use programking_payments::{Metadata, NewPaymentIntent, PaymentIntent, PaymentProvider};
use serde::{Deserialize, Serialize};

use super::rewards::METADATA_USER_ID;
use crate::error::AppResult;

/// Metadata keys written onto discounted payment intents.
pub const METADATA_PROMOTION_CODE: &str = "promotionCode";
pub const METADATA_PROMOTION_CODE_ID: &str = "promotionCodeId";
pub const METADATA_ORIGINAL_AMOUNT: &str = "originalAmount";
pub const METADATA_DISCOUNT_AMOUNT: &str = "discountAmount";
pub const METADATA_PERCENT_OFF: &str = "percentOff";

/// What happened to the promotion code supplied with a payment intent.
///
/// A bad code never blocks checkout; it degrades to a full-price intent
/// and the reason is reported here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DiscountOutcome {
    Discounted,
    NoDiscountApplied,
    CodeLookupFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountInfo {
    pub code: String,
    pub promotion_code_id: String,
    pub percent_off: f64,
    pub amount_off: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPaymentIntent {
    pub client_secret: Option<String>,
    pub payment_intent_id: String,
    pub original_amount: i64,
    pub final_amount: i64,
    pub discount_info: Option<DiscountInfo>,
    pub discount_outcome: DiscountOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    pub payment_intent_id: String,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    pub metadata: Metadata,
}

impl From<PaymentIntent> for PaymentStatus {
    fn from(intent: PaymentIntent) -> Self {
        Self {
            payment_intent_id: intent.id,
            status: intent.status,
            amount: intent.amount,
            currency: intent.currency,
            metadata: intent.metadata,
        }
    }
}

/// A payment provider webhook event, reduced to the fields we act on.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: PaymentEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEventData {
    /// The event subject. Its shape depends on `type`.
    pub object: serde_json::Value,
}

impl PaymentEvent {
    pub const PAYMENT_SUCCEEDED: &'static str = "payment_intent.succeeded";

    /// The `(user_id, promotion_code)` pair to redeem, if this is a
    /// successful payment that used a reward code.
    pub fn redemption(&self) -> Option<(&str, &str)> {
        if self.event_type != Self::PAYMENT_SUCCEEDED {
            return None;
        }
        let metadata = self.data.object.get("metadata")?;
        let user_id = metadata.get(METADATA_USER_ID)?.as_str()?;
        let code = metadata.get(METADATA_PROMOTION_CODE)?.as_str()?;
        Some((user_id, code))
    }
}

pub struct Checkout {
    payments: Arc<dyn PaymentProvider>,
}

impl Checkout {
    pub fn new(payments: Arc<dyn PaymentProvider>) -> Self {
        Self { payments }
    }

    /// Create a payment intent for `amount`, discounted when
    /// `promotion_code` resolves to an active percent-off code.
    pub async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
        mut metadata: Metadata,
        promotion_code: Option<&str>,
    ) -> AppResult<CreatedPaymentIntent> {
        let (discount, outcome) = match promotion_code.map(str::trim).filter(|c| !c.is_empty()) {
            None => (None, DiscountOutcome::NoDiscountApplied),
            Some(code) => match self.resolve_discount(code, amount).await {
                Ok(info) => (Some(info), DiscountOutcome::Discounted),
                Err(reason) => {
                    tracing::warn!(code, %reason, "Promotion code not applied");
                    (None, DiscountOutcome::CodeLookupFailed { reason })
                }
            },
        };

        let final_amount = discount
            .as_ref()
            .map_or(amount, |info| amount - info.amount_off);

        if let Some(info) = &discount {
            metadata.insert(METADATA_PROMOTION_CODE.into(), info.code.clone());
            metadata.insert(
                METADATA_PROMOTION_CODE_ID.into(),
                info.promotion_code_id.clone(),
            );
            metadata.insert(METADATA_ORIGINAL_AMOUNT.into(), amount.to_string());
            metadata.insert(METADATA_DISCOUNT_AMOUNT.into(), info.amount_off.to_string());
            metadata.insert(METADATA_PERCENT_OFF.into(), info.percent_off.to_string());
        }

        let intent = self
            .payments
            .create_payment_intent(NewPaymentIntent {
                amount: final_amount,
                currency: currency.to_string(),
                metadata,
            })
            .await?;

        tracing::info!(
            payment_intent_id = %intent.id,
            original_amount = amount,
            final_amount,
            discounted = discount.is_some(),
            "Payment intent created",
        );

        Ok(CreatedPaymentIntent {
            client_secret: intent.client_secret,
            payment_intent_id: intent.id,
            original_amount: amount,
            final_amount,
            discount_info: discount,
            discount_outcome: outcome,
        })
    }

    /// Look up `code` and compute its discount, or explain why it does not
    /// apply.
    async fn resolve_discount(&self, code: &str, amount: i64) -> Result<DiscountInfo, String> {
        let promo = match self.payments.find_promotion_code(code).await {
            Ok(Some(promo)) => promo,
            Ok(None) => return Err(format!("promotion code {code} not found")),
            Err(err) => return Err(format!("promotion code lookup failed: {err}")),
        };

        if !promo.active {
            return Err(format!("promotion code {code} is inactive"));
        }
        if promo.is_exhausted() {
            return Err(format!("promotion code {code} has been fully redeemed"));
        }
        let Some(percent_off) = promo.coupon.percent_off else {
            return Err(format!("promotion code {code} is not a percent-off discount"));
        };

        let breakdown = apply_percent_off(amount, percent_off);
        Ok(DiscountInfo {
            code: promo.code,
            promotion_code_id: promo.id,
            percent_off,
            amount_off: breakdown.discount_amount,
        })
    }

    pub async fn confirm_payment_status(&self, payment_intent_id: &str) -> AppResult<PaymentStatus> {
        let intent = self.payments.retrieve_payment_intent(payment_intent_id).await?;
        tracing::debug!(payment_intent_id, status = %intent.status, "Payment intent retrieved");
        Ok(intent.into())
    }
}
