use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use programking_core::error::CoreError;
use programking_db::models::profile::UserProfile;
use programking_db::repositories::ProfileRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[serde(default)]
    pub user_image: Option<String>,
}

/// GET /profile/{user_id}
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserProfile>> {
    let profile = ProfileRepo::find(state.store.as_ref(), &user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Profile",
                id: user_id.clone(),
            })
        })?;
    Ok(Json(profile))
}

/// POST /profile/update
///
/// Overwrites the stored profile; fields left out of the body are cleared.
pub async fn update_profile(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserProfile>> {
    let profile = UserProfile {
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
        user_image: input.user_image,
        updated_at: Utc::now(),
    };
    ProfileRepo::save(state.store.as_ref(), &input.user_id, &profile).await?;

    tracing::info!(user_id = %input.user_id, "Profile updated");
    Ok(Json(profile))
}
