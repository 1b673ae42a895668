//! Process-local [`PaymentProvider`] for tests and offline development.
//!
//! Mirrors the provider behaviour the workflows depend on: promotion code
//! lookups are case-insensitive, redemption counters only move when
//! [`InMemoryPayments::redeem`] is called, and single operations can be
//! made to fail to exercise compensation paths.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    check_object_id, Coupon, NewCoupon, NewPaymentIntent, NewPromotionCode, PaymentError,
    PaymentIntent, PaymentProvider, PromotionCode,
};

/// Provider operations that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateCoupon,
    DeleteCoupon,
    CreatePromotionCode,
    FindPromotionCode,
    DeactivatePromotionCode,
    CreatePaymentIntent,
    RetrievePaymentIntent,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    coupons: BTreeMap<String, Coupon>,
    promotion_codes: BTreeMap<String, PromotionCode>,
    payment_intents: BTreeMap<String, PaymentIntent>,
    failing: HashSet<Operation>,
}

impl Inner {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}_{:06}", self.next_id)
    }

    fn check(&mut self, op: Operation) -> Result<(), PaymentError> {
        if self.failing.remove(&op) {
            return Err(PaymentError::Api {
                status: 500,
                message: format!("Injected failure for {op:?}"),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryPayments {
    inner: Mutex<Inner>,
}

impl InMemoryPayments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call to `op` fail with a provider error.
    pub async fn fail_next(&self, op: Operation) {
        self.inner.lock().await.failing.insert(op);
    }

    /// Simulate a checkout redeeming `code` at the provider.
    pub async fn redeem(&self, code: &str) -> Option<PromotionCode> {
        let mut inner = self.inner.lock().await;
        let promo = inner
            .promotion_codes
            .values_mut()
            .find(|p| p.code.eq_ignore_ascii_case(code))?;
        promo.times_redeemed += 1;
        Some(promo.clone())
    }

    pub async fn coupon_count(&self) -> usize {
        self.inner.lock().await.coupons.len()
    }

    pub async fn promotion_codes(&self) -> Vec<PromotionCode> {
        self.inner
            .lock()
            .await
            .promotion_codes
            .values()
            .cloned()
            .collect()
    }

    pub async fn payment_intents(&self) -> Vec<PaymentIntent> {
        self.inner
            .lock()
            .await
            .payment_intents
            .values()
            .cloned()
            .collect()
    }

    /// Overwrite the status of a stored payment intent.
    pub async fn set_payment_intent_status(&self, payment_intent_id: &str, status: &str) {
        if let Some(intent) = self
            .inner
            .lock()
            .await
            .payment_intents
            .get_mut(payment_intent_id)
        {
            intent.status = status.to_string();
        }
    }
}

fn not_found(what: &str, id: &str) -> PaymentError {
    PaymentError::Api {
        status: 404,
        message: format!("No such {what}: '{id}'"),
    }
}

#[async_trait]
impl PaymentProvider for InMemoryPayments {
    async fn create_coupon(&self, input: NewCoupon) -> Result<Coupon, PaymentError> {
        let mut inner = self.inner.lock().await;
        inner.check(Operation::CreateCoupon)?;
        let coupon = Coupon {
            id: inner.next_id("coupon"),
            percent_off: Some(input.percent_off),
            amount_off: None,
            valid: true,
        };
        inner.coupons.insert(coupon.id.clone(), coupon.clone());
        Ok(coupon)
    }

    async fn delete_coupon(&self, coupon_id: &str) -> Result<(), PaymentError> {
        let mut inner = self.inner.lock().await;
        inner.check(Operation::DeleteCoupon)?;
        inner
            .coupons
            .remove(coupon_id)
            .map(|_| ())
            .ok_or_else(|| not_found("coupon", coupon_id))
    }

    async fn create_promotion_code(
        &self,
        input: NewPromotionCode,
    ) -> Result<PromotionCode, PaymentError> {
        let mut inner = self.inner.lock().await;
        inner.check(Operation::CreatePromotionCode)?;

        let coupon = inner
            .coupons
            .get(&input.coupon_id)
            .cloned()
            .ok_or_else(|| not_found("coupon", &input.coupon_id))?;
        if inner
            .promotion_codes
            .values()
            .any(|p| p.active && p.code.eq_ignore_ascii_case(&input.code))
        {
            return Err(PaymentError::Api {
                status: 400,
                message: "An active promotion code with this code already exists".into(),
            });
        }

        let promo = PromotionCode {
            id: inner.next_id("promo"),
            code: input.code,
            active: true,
            times_redeemed: 0,
            max_redemptions: input.max_redemptions,
            coupon,
            metadata: input.metadata,
        };
        inner.promotion_codes.insert(promo.id.clone(), promo.clone());
        Ok(promo)
    }

    async fn find_promotion_code(&self, code: &str) -> Result<Option<PromotionCode>, PaymentError> {
        let mut inner = self.inner.lock().await;
        inner.check(Operation::FindPromotionCode)?;
        Ok(inner
            .promotion_codes
            .values()
            .find(|p| p.code.eq_ignore_ascii_case(code))
            .cloned())
    }

    async fn deactivate_promotion_code(
        &self,
        promotion_code_id: &str,
    ) -> Result<(), PaymentError> {
        let mut inner = self.inner.lock().await;
        inner.check(Operation::DeactivatePromotionCode)?;
        let promo = inner
            .promotion_codes
            .get_mut(promotion_code_id)
            .ok_or_else(|| not_found("promotion code", promotion_code_id))?;
        promo.active = false;
        Ok(())
    }

    async fn create_payment_intent(
        &self,
        input: NewPaymentIntent,
    ) -> Result<PaymentIntent, PaymentError> {
        let mut inner = self.inner.lock().await;
        inner.check(Operation::CreatePaymentIntent)?;
        let id = inner.next_id("pi");
        let intent = PaymentIntent {
            client_secret: Some(format!("{id}_secret")),
            id,
            status: "requires_payment_method".into(),
            amount: input.amount,
            currency: input.currency.to_lowercase(),
            metadata: input.metadata,
        };
        inner.payment_intents.insert(intent.id.clone(), intent.clone());
        Ok(intent)
    }

    async fn retrieve_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        check_object_id(payment_intent_id)?;
        let mut inner = self.inner.lock().await;
        inner.check(Operation::RetrievePaymentIntent)?;
        inner
            .payment_intents
            .get(payment_intent_id)
            .cloned()
            .ok_or_else(|| not_found("payment_intent", payment_intent_id))
    }
}
