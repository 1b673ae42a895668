//! Process-local [`IdentityProvider`] for tests and offline development.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{IdentityError, IdentityProvider, IdentityUser, NewUser, Session};

struct Account {
    user: IdentityUser,
    password: String,
}

/// Accounts keyed by lowercased email.
#[derive(Default)]
pub struct InMemoryIdentity {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    async fn create_user(&self, input: NewUser) -> Result<IdentityUser, IdentityError> {
        let key = input.email.to_lowercase();
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&key) {
            return Err(IdentityError::Api {
                status: 422,
                message: "A user with this email address has already been registered".into(),
            });
        }

        let user = IdentityUser {
            id: Uuid::new_v4().to_string(),
            email: Some(input.email),
            user_metadata: input.metadata,
        };
        accounts.insert(
            key,
            Account {
                user: user.clone(),
                password: input.password,
            },
        );
        Ok(user)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, IdentityError> {
        let accounts = self.accounts.read().await;
        match accounts.get(&email.to_lowercase()) {
            Some(account) if account.password == password => Ok(Session {
                access_token: format!("access-{}", account.user.id),
                refresh_token: format!("refresh-{}", Uuid::new_v4()),
                expires_in: 3600,
                token_type: "bearer".into(),
            }),
            _ => Err(IdentityError::Api {
                status: 400,
                message: "Invalid login credentials".into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            password: "hunter22".into(),
            metadata: json!({"name": "Sam"}),
        }
    }

    #[tokio::test]
    async fn create_then_sign_in() {
        let identity = InMemoryIdentity::new();
        let user = identity.create_user(new_user("sam@example.com")).await.unwrap();

        let session = identity
            .sign_in_with_password("SAM@example.com", "hunter22")
            .await
            .unwrap();
        assert_eq!(session.access_token, format!("access-{}", user.id));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_client_error() {
        let identity = InMemoryIdentity::new();
        identity.create_user(new_user("sam@example.com")).await.unwrap();

        let err = identity
            .create_user(new_user("sam@example.com"))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let identity = InMemoryIdentity::new();
        identity.create_user(new_user("sam@example.com")).await.unwrap();

        let err = identity
            .sign_in_with_password("sam@example.com", "nope")
            .await
            .unwrap_err();
        assert_matches!(err, IdentityError::Api { status: 400, .. });
    }
}
