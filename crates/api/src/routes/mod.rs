pub mod auth;
pub mod health;
pub mod payment;
pub mod profile;
pub mod programs;
pub mod progress;
pub mod rewards;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the API route tree, nested under the configured prefix.
///
/// Route hierarchy:
///
/// ```text
/// /health                          liveness + store check
///
/// /rewards/{user_id}               progress and reward state
/// /rewards/claim                   mint a reward promotion code
/// /rewards/validate                check a promotion code at the provider
/// /rewards/redeem                  mark a reward code used
///
/// /progress/complete               record a program completion
/// /progress/{user_id}              completion record
///
/// /programs                        list, create
/// /programs/{id}                   get, replace, delete
///
/// /profile/update                  overwrite a profile
/// /profile/{user_id}               get a profile
///
/// /payment/create-intent           payment intent with optional discount
/// /payment/confirm                 payment intent status
/// /payment/mark-code-used          mark a reward code used
/// /payment/webhook                 provider webhook (signed)
///
/// /auth/signup                     create account + session
/// /enquiries                       contact-form email
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/rewards", rewards::router())
        .nest("/progress", progress::router())
        .nest("/programs", programs::router())
        .nest("/profile", profile::router())
        .nest("/payment", payment::router())
        .nest("/auth", auth::router())
        .route("/enquiries", post(handlers::enquiries::send_enquiry))
}
