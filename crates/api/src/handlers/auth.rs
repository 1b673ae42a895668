use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use programking_db::models::profile::UserProfile;
use programking_db::repositories::ProfileRepo;
use programking_identity::{IdentityUser, NewUser, Session};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user: IdentityUser,
    pub session: Session,
}

/// Split a display name into first and last name at the first space.
fn split_name(name: &str) -> (String, String) {
    let name = name.trim();
    match name.split_once(char::is_whitespace) {
        Some((first, last)) => (first.to_string(), last.trim().to_string()),
        None => (name.to_string(), String::new()),
    }
}

/// POST /auth/signup
///
/// Create a confirmed account, sign it in and seed an initial profile.
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    let name = input.name.unwrap_or_default();

    let user = state
        .identity
        .create_user(NewUser {
            email: input.email.clone(),
            password: input.password.clone(),
            metadata: json!({ "name": name }),
        })
        .await?;

    let session = state
        .identity
        .sign_in_with_password(&input.email, &input.password)
        .await?;

    let (first_name, last_name) = split_name(&name);
    let profile = UserProfile {
        first_name,
        last_name,
        email: input.email,
        user_image: None,
        updated_at: Utc::now(),
    };
    ProfileRepo::save(state.store.as_ref(), &user.id, &profile).await?;

    tracing::info!(user_id = %user.id, "User signed up");

    Ok((StatusCode::CREATED, Json(SignupResponse { user, session })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_split_at_first_space() {
        assert_eq!(
            split_name("Ada King Lovelace"),
            ("Ada".to_string(), "King Lovelace".to_string())
        );
        assert_eq!(split_name(" Ada "), ("Ada".to_string(), String::new()));
        assert_eq!(split_name(""), (String::new(), String::new()));
    }
}
