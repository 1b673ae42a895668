use axum::routing::{get, post};
use axum::Router;

use crate::handlers::rewards;
use crate::state::AppState;

/// Reward routes mounted at `/rewards`.
///
/// ```text
/// GET  /{user_id}  -> get_rewards
/// POST /claim      -> claim_reward
/// POST /validate   -> validate_code
/// POST /redeem     -> redeem_code
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/claim", post(rewards::claim_reward))
        .route("/validate", post(rewards::validate_code))
        .route("/redeem", post(rewards::redeem_code))
        .route("/{user_id}", get(rewards::get_rewards))
}
