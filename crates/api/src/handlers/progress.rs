use axum::extract::{Path, State};
use axum::Json;
use programking_db::models::progress::UserProgress;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompleteProgramRequest {
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "programId is required"))]
    pub program_id: String,
}

/// GET /progress/{user_id}
pub async fn get_progress(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserProgress>> {
    Ok(Json(state.progress.get(&user_id).await?))
}

/// POST /progress/complete
///
/// Idempotent: completing a program twice counts it once.
pub async fn complete_program(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CompleteProgramRequest>,
) -> AppResult<Json<UserProgress>> {
    let progress = state
        .progress
        .record_completion(&input.user_id, &input.program_id)
        .await?;
    Ok(Json(progress))
}
