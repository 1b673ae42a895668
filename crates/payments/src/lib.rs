//! Payment provider integration.
//!
//! [`PaymentProvider`] is the narrow contract the reward and checkout
//! workflows need: coupons, promotion codes and payment intents.
//! [`stripe::StripeClient`] implements it over the Stripe REST API;
//! [`memory::InMemoryPayments`] is a process-local stand-in for tests.

pub mod memory;
pub mod stripe;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use memory::InMemoryPayments;
pub use stripe::{StripeClient, StripeConfig};

/// String-to-string metadata attached to provider objects.
pub type Metadata = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider rejected the call.
    #[error("Payment provider error ({status}): {message}")]
    Api { status: u16, message: String },

    /// An object id that cannot be a provider id. Never sent upstream.
    #[error("Invalid provider object id: {0:?}")]
    InvalidId(String),
}

/// Check that `id` looks like a provider object id (`[A-Za-z0-9_]+`).
///
/// Ids are interpolated into request paths, so anything else is rejected
/// before a request is built.
pub fn check_object_id(id: &str) -> Result<&str, PaymentError> {
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        Ok(id)
    } else {
        Err(PaymentError::InvalidId(id.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Provider objects
// ---------------------------------------------------------------------------

/// A provider-side discount definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: String,
    #[serde(default)]
    pub percent_off: Option<f64>,
    #[serde(default)]
    pub amount_off: Option<i64>,
    #[serde(default = "default_true")]
    pub valid: bool,
}

/// A redeemable code pointing at a [`Coupon`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionCode {
    pub id: String,
    pub code: String,
    pub active: bool,
    #[serde(default)]
    pub times_redeemed: u32,
    #[serde(default)]
    pub max_redemptions: Option<u32>,
    pub coupon: Coupon,
    #[serde(default)]
    pub metadata: Metadata,
}

impl PromotionCode {
    /// Whether the provider's redemption counter has reached its limit.
    pub fn is_exhausted(&self) -> bool {
        self.max_redemptions
            .is_some_and(|max| self.times_redeemed >= max)
    }
}

/// A pending or completed charge attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub metadata: Metadata,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub name: String,
    pub percent_off: f64,
    pub max_redemptions: Option<u32>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone)]
pub struct NewPromotionCode {
    pub coupon_id: String,
    pub code: String,
    pub max_redemptions: Option<u32>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone)]
pub struct NewPaymentIntent {
    /// Amount in the smallest currency unit.
    pub amount: i64,
    pub currency: String,
    pub metadata: Metadata,
}

// ---------------------------------------------------------------------------
// PaymentProvider
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a single-use (`duration = once`) percent-off coupon.
    async fn create_coupon(&self, input: NewCoupon) -> Result<Coupon, PaymentError>;

    async fn delete_coupon(&self, coupon_id: &str) -> Result<(), PaymentError>;

    async fn create_promotion_code(
        &self,
        input: NewPromotionCode,
    ) -> Result<PromotionCode, PaymentError>;

    /// Look up a promotion code by its literal customer-facing string.
    async fn find_promotion_code(&self, code: &str) -> Result<Option<PromotionCode>, PaymentError>;

    async fn deactivate_promotion_code(&self, promotion_code_id: &str)
        -> Result<(), PaymentError>;

    async fn create_payment_intent(
        &self,
        input: NewPaymentIntent,
    ) -> Result<PaymentIntent, PaymentError>;

    async fn retrieve_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<PaymentIntent, PaymentError>;
}
