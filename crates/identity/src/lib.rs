//! Hosted identity provider integration.
//!
//! Account creation and password sign-in are delegated to the provider;
//! this service never stores credentials. [`supabase::SupabaseAuth`] talks
//! to the provider's REST API, [`memory::InMemoryIdentity`] backs tests.

pub mod memory;
pub mod supabase;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use memory::InMemoryIdentity;
pub use supabase::{SupabaseAuth, SupabaseConfig};

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Identity provider error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl IdentityError {
    /// Whether the provider rejected the input (4xx) rather than failing.
    pub fn is_client_error(&self) -> bool {
        matches!(self, IdentityError::Api { status, .. } if (400..500).contains(status))
    }
}

/// A provider-side user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

/// Tokens issued by a successful sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    /// Free-form profile data stored with the account (e.g. `name`).
    pub metadata: serde_json::Value,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a confirmed account.
    async fn create_user(&self, input: NewUser) -> Result<IdentityUser, IdentityError>;

    /// Exchange an email and password for a session.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, IdentityError>;
}
