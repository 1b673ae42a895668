//! Supabase auth REST implementation of [`IdentityProvider`].

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::{IdentityError, IdentityProvider, IdentityUser, NewUser, Session};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Service-role key for admin user creation.
    pub service_role_key: String,
    /// Public anon key for password sign-in.
    pub anon_key: String,
}

impl SupabaseConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` unless `SUPABASE_URL`, `SUPABASE_SERVICE_ROLE_KEY` and
    /// `SUPABASE_ANON_KEY` are all set.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            url: std::env::var("SUPABASE_URL").ok()?,
            service_role_key: std::env::var("SUPABASE_SERVICE_ROLE_KEY").ok()?,
            anon_key: std::env::var("SUPABASE_ANON_KEY").ok()?,
        })
    }
}

/// The provider reports errors under different field names per endpoint.
#[derive(Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
}

pub struct SupabaseAuth {
    client: reqwest::Client,
    config: SupabaseConfig,
}

impl SupabaseAuth {
    pub fn new(config: SupabaseConfig) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.config.url.trim_end_matches('/'))
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, IdentityError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|e| e.msg.or(e.message).or(e.error_description))
            .unwrap_or(body);
        Err(IdentityError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuth {
    async fn create_user(&self, input: NewUser) -> Result<IdentityUser, IdentityError> {
        let body = json!({
            "email": input.email,
            "password": input.password,
            "user_metadata": input.metadata,
            // No mail server is wired up for confirmations.
            "email_confirm": true,
        });

        let response = self
            .client
            .post(self.url("admin/users"))
            .header("apikey", &self.config.service_role_key)
            .bearer_auth(&self.config.service_role_key)
            .json(&body)
            .send()
            .await?;

        let user: IdentityUser = Self::parse_response(response).await?;
        tracing::info!(user_id = %user.id, "Identity user created");
        Ok(user)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, IdentityError> {
        let response = self
            .client
            .post(self.url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.config.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        Self::parse_response(response).await
    }
}
