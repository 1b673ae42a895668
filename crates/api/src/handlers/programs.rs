//! CRUD handlers for opaque program documents.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use programking_core::error::CoreError;
use programking_db::models::program::{program_id, with_program_id};
use programking_db::repositories::ProgramRepo;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::state::AppState;

fn not_found(id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Program",
        id: id.to_string(),
    })
}

fn require_object(document: Value, id: &str) -> AppResult<Value> {
    with_program_id(document, id)
        .ok_or_else(|| AppError::BadRequest("Program body must be a JSON object".into()))
}

/// GET /programs
pub async fn list_programs(State(state): State<AppState>) -> AppResult<Json<Vec<Value>>> {
    let programs = ProgramRepo::list(state.store.as_ref()).await?;
    Ok(Json(programs))
}

/// GET /programs/{id}
pub async fn get_program(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let program = ProgramRepo::find(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(program))
}

/// POST /programs
///
/// Stores the document under its `id` field, generating a UUID when absent.
pub async fn create_program(
    State(state): State<AppState>,
    JsonBody(document): JsonBody<Value>,
) -> AppResult<impl IntoResponse> {
    let id = program_id(&document)
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let document = require_object(document, &id)?;

    ProgramRepo::save(state.store.as_ref(), &id, document.clone()).await?;
    tracing::info!(program_id = %id, "Program created");

    Ok((StatusCode::CREATED, Json(document)))
}

/// PUT /programs/{id}
///
/// Replaces the whole document. The path id wins over any `id` in the body.
pub async fn update_program(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(document): JsonBody<Value>,
) -> AppResult<Json<Value>> {
    let document = require_object(document, &id)?;
    if ProgramRepo::find(state.store.as_ref(), &id).await?.is_none() {
        return Err(not_found(&id));
    }

    ProgramRepo::save(state.store.as_ref(), &id, document.clone()).await?;
    tracing::info!(program_id = %id, "Program updated");

    Ok(Json(document))
}

/// DELETE /programs/{id}
pub async fn delete_program(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !ProgramRepo::delete(state.store.as_ref(), &id).await? {
        return Err(not_found(&id));
    }
    tracing::info!(program_id = %id, "Program deleted");
    Ok(StatusCode::NO_CONTENT)
}
