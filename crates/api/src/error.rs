use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use programking_core::error::CoreError;
use programking_core::rewards::RewardError;
use programking_db::StoreError;
use programking_events::EmailError;
use programking_identity::IdentityError;
use programking_payments::PaymentError;
use serde_json::{json, Map, Value};

/// Application-level error type for HTTP handlers and workflows.
///
/// Wraps the domain and upstream errors of every crate and implements
/// [`IntoResponse`] to produce `{ "error", "code", "details"? }` bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `programking_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A reward workflow rule violation.
    #[error(transparent)]
    Reward(#[from] RewardError),

    /// The key-value store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The payment provider failed or rejected a call.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// The identity provider failed or rejected a call.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Email delivery failed.
    #[error(transparent)]
    Email(#[from] EmailError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Everything needed to render an error body.
struct ErrorParts {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<String>,
    extra: Map<String, Value>,
}

impl ErrorParts {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
            extra: Map::new(),
        }
    }

    fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn extra(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let parts = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Reward(reward) => classify_reward_error(reward),

            // --- Upstream failures ---
            AppError::Store(err) => {
                tracing::error!(error = %err, "Key-value store error");
                ErrorParts::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "Storage operation failed",
                )
                .details(err.to_string())
            }
            AppError::Payment(PaymentError::Api {
                status: 404,
                message,
            }) => ErrorParts::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Payment resource not found")
                .details(message.clone()),
            AppError::Payment(PaymentError::InvalidId(id)) => ErrorParts::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("Invalid id: {id}"),
            ),
            AppError::Payment(err) => {
                tracing::error!(error = %err, "Payment provider error");
                ErrorParts::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PAYMENT_PROVIDER_ERROR",
                    "Payment provider request failed",
                )
                .details(err.to_string())
            }
            AppError::Identity(err) if err.is_client_error() => ErrorParts::new(
                StatusCode::BAD_REQUEST,
                "IDENTITY_REJECTED",
                "Identity provider rejected the request",
            )
            .details(identity_message(err)),
            AppError::Identity(err) => {
                tracing::error!(error = %err, "Identity provider error");
                ErrorParts::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IDENTITY_PROVIDER_ERROR",
                    "Identity provider request failed",
                )
                .details(err.to_string())
            }
            AppError::Email(err) => {
                tracing::error!(error = %err, "Email delivery error");
                ErrorParts::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EMAIL_ERROR",
                    "Failed to send email",
                )
                .details(err.to_string())
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                ErrorParts::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ErrorParts::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                )
            }
        };

        let mut body = json!({
            "error": parts.message,
            "code": parts.code,
        });
        if let Some(details) = parts.details {
            body["details"] = Value::String(details);
        }
        if let Value::Object(map) = &mut body {
            map.extend(parts.extra);
        }

        (parts.status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> ErrorParts {
    match err {
        CoreError::NotFound { entity, id } => ErrorParts::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => {
            ErrorParts::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
    }
}

fn classify_reward_error(err: &RewardError) -> ErrorParts {
    let message = err.to_string();
    match err {
        RewardError::AlreadyClaimed { code } => {
            ErrorParts::new(StatusCode::BAD_REQUEST, "ALREADY_CLAIMED", message)
                .extra("promotionCode", json!(code))
        }
        RewardError::InvalidReward(_) => {
            ErrorParts::new(StatusCode::BAD_REQUEST, "INVALID_REWARD", message)
        }
        RewardError::InsufficientProgress {
            required,
            completed,
            ..
        } => ErrorParts::new(StatusCode::BAD_REQUEST, "INSUFFICIENT_PROGRESS", message)
            .extra("required", json!(required))
            .extra("completed", json!(completed)),
        RewardError::InvalidDiscount(_) => {
            ErrorParts::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
        }
        RewardError::InvalidCode(_) => ErrorParts::new(StatusCode::NOT_FOUND, "INVALID_CODE", message),
        RewardError::CodeInactive => ErrorParts::new(StatusCode::BAD_REQUEST, "CODE_INACTIVE", message),
        RewardError::CodeExhausted => {
            ErrorParts::new(StatusCode::BAD_REQUEST, "CODE_EXHAUSTED", message)
        }
        RewardError::CodeNotOwned => {
            ErrorParts::new(StatusCode::BAD_REQUEST, "CODE_NOT_OWNED", message)
        }
        RewardError::CodeNotFound(_) => {
            ErrorParts::new(StatusCode::NOT_FOUND, "CODE_NOT_FOUND", message)
        }
    }
}

fn identity_message(err: &IdentityError) -> String {
    match err {
        IdentityError::Api { message, .. } => message.clone(),
        other => other.to_string(),
    }
}
