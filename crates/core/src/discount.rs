//! Percent-off discount arithmetic for checkout.
//!
//! All amounts are in the smallest currency unit (cents for USD).

use serde::Serialize;

use crate::rewards::RewardError;

/// Result of applying a percent-off coupon to a charge amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountBreakdown {
    pub original_amount: i64,
    pub percent_off: f64,
    pub discount_amount: i64,
    pub final_amount: i64,
}

/// Apply `percent_off` to `amount`.
///
/// The discount is rounded to the nearest minor unit and the final amount
/// never drops below zero.
pub fn apply_percent_off(amount: i64, percent_off: f64) -> DiscountBreakdown {
    let discount_amount = ((amount as f64) * percent_off / 100.0).round() as i64;
    let discount_amount = discount_amount.clamp(0, amount.max(0));

    DiscountBreakdown {
        original_amount: amount,
        percent_off,
        discount_amount,
        final_amount: amount - discount_amount,
    }
}

/// Reject discount percentages outside `(0, 100]`.
pub fn validate_discount_percent(percent: f64) -> Result<(), RewardError> {
    if percent.is_finite() && percent > 0.0 && percent <= 100.0 {
        Ok(())
    } else {
        Err(RewardError::InvalidDiscount(percent))
    }
}
