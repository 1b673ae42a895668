//! Stripe REST implementation of [`PaymentProvider`].
//!
//! Requests are form-encoded with the secret key as bearer token. The API
//! version is pinned so promotion codes keep embedding their coupon.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{
    check_object_id, Coupon, Metadata, NewCoupon, NewPaymentIntent, NewPromotionCode,
    PaymentError, PaymentIntent, PaymentProvider, PromotionCode,
};

/// Default Stripe API base URL.
const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Pinned `Stripe-Version` header.
const STRIPE_API_VERSION: &str = "2024-06-20";

/// HTTP request timeout for a single provider call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

// ---------------------------------------------------------------------------
// StripeConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub api_base: String,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `STRIPE_SECRET_KEY` is not set.
    ///
    /// | Variable            | Required | Default                  |
    /// |---------------------|----------|--------------------------|
    /// | `STRIPE_SECRET_KEY` | yes      | -                        |
    /// | `STRIPE_API_BASE`   | no       | `https://api.stripe.com` |
    pub fn from_env() -> Option<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY").ok()?;
        Some(Self {
            secret_key,
            api_base: std::env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// ---------------------------------------------------------------------------
// StripeClient
// ---------------------------------------------------------------------------

pub struct StripeClient {
    client: reqwest::Client,
    config: StripeConfig,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Result<Self, PaymentError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.config.api_base.trim_end_matches('/'))
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(&self.config.secret_key)
            .header("Stripe-Version", STRIPE_API_VERSION)
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, PaymentError> {
        let response = self
            .request(reqwest::Method::POST, path)
            .form(params)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Turn a provider response into `T`, or a [`PaymentError::Api`]
    /// carrying the provider's own error message.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PaymentError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .ok()
            .and_then(|e| e.error.message)
            .unwrap_or(body);
        Err(PaymentError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Flatten metadata into Stripe's `metadata[key]=value` form fields.
fn metadata_params(params: &mut Vec<(String, String)>, metadata: &Metadata) {
    for (key, value) in metadata {
        params.push((format!("metadata[{key}]"), value.clone()));
    }
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_coupon(&self, input: NewCoupon) -> Result<Coupon, PaymentError> {
        let mut params = vec![
            ("percent_off".to_string(), input.percent_off.to_string()),
            ("duration".to_string(), "once".to_string()),
            ("name".to_string(), input.name),
        ];
        if let Some(max) = input.max_redemptions {
            params.push(("max_redemptions".to_string(), max.to_string()));
        }
        metadata_params(&mut params, &input.metadata);

        let coupon: Coupon = self.post_form("coupons", &params).await?;
        tracing::debug!(coupon_id = %coupon.id, "Stripe coupon created");
        Ok(coupon)
    }

    async fn delete_coupon(&self, coupon_id: &str) -> Result<(), PaymentError> {
        let path = format!("coupons/{}", check_object_id(coupon_id)?);
        let response = self
            .request(reqwest::Method::DELETE, &path)
            .send()
            .await?;
        let _: serde_json::Value = Self::parse_response(response).await?;
        Ok(())
    }

    async fn create_promotion_code(
        &self,
        input: NewPromotionCode,
    ) -> Result<PromotionCode, PaymentError> {
        let mut params = vec![
            ("coupon".to_string(), input.coupon_id),
            ("code".to_string(), input.code),
        ];
        if let Some(max) = input.max_redemptions {
            params.push(("max_redemptions".to_string(), max.to_string()));
        }
        metadata_params(&mut params, &input.metadata);

        let promo: PromotionCode = self.post_form("promotion_codes", &params).await?;
        tracing::debug!(promotion_code_id = %promo.id, "Stripe promotion code created");
        Ok(promo)
    }

    async fn find_promotion_code(&self, code: &str) -> Result<Option<PromotionCode>, PaymentError> {
        let response = self
            .request(reqwest::Method::GET, "promotion_codes")
            .query(&[("code", code), ("limit", "1")])
            .send()
            .await?;
        let list: ListResponse<PromotionCode> = Self::parse_response(response).await?;
        Ok(list.data.into_iter().next())
    }

    async fn deactivate_promotion_code(
        &self,
        promotion_code_id: &str,
    ) -> Result<(), PaymentError> {
        let params = vec![("active".to_string(), "false".to_string())];
        let _: PromotionCode = self
            .post_form(
                &format!("promotion_codes/{}", check_object_id(promotion_code_id)?),
                &params,
            )
            .await?;
        Ok(())
    }

    async fn create_payment_intent(
        &self,
        input: NewPaymentIntent,
    ) -> Result<PaymentIntent, PaymentError> {
        let mut params = vec![
            ("amount".to_string(), input.amount.to_string()),
            ("currency".to_string(), input.currency.to_lowercase()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];
        metadata_params(&mut params, &input.metadata);

        self.post_form("payment_intents", &params).await
    }

    async fn retrieve_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("payment_intents/{}", check_object_id(payment_intent_id)?),
            )
            .send()
            .await?;
        Self::parse_response(response).await
    }
}
