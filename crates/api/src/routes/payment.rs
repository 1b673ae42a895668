use axum::routing::post;
use axum::Router;

use crate::handlers::payment;
use crate::state::AppState;

/// Payment routes mounted at `/payment`.
///
/// ```text
/// POST /create-intent   -> create_intent
/// POST /confirm         -> confirm_payment
/// POST /mark-code-used  -> mark_code_used
/// POST /webhook         -> webhook
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-intent", post(payment::create_intent))
        .route("/confirm", post(payment::confirm_payment))
        .route("/mark-code-used", post(payment::mark_code_used))
        .route("/webhook", post(payment::webhook))
}
