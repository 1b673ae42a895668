use axum::routing::{get, post};
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

/// Progress routes mounted at `/progress`.
///
/// ```text
/// POST /complete   -> complete_program
/// GET  /{user_id}  -> get_progress
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/complete", post(progress::complete_program))
        .route("/{user_id}", get(progress::get_progress))
}
