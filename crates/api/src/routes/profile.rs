use axum::routing::{get, post};
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Profile routes mounted at `/profile`.
///
/// ```text
/// POST /update     -> update_profile
/// GET  /{user_id}  -> get_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/update", post(profile::update_profile))
        .route("/{user_id}", get(profile::get_profile))
}
