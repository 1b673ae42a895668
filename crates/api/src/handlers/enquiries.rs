use axum::extract::State;
use axum::Json;
use programking_events::Enquiry;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct EnquiryRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 5000, message = "message must be 1 to 5000 characters"))]
    pub message: String,
}

impl From<EnquiryRequest> for Enquiry {
    fn from(input: EnquiryRequest) -> Self {
        Self {
            name: input.name,
            email: input.email,
            phone: input.phone,
            subject: input.subject,
            message: input.message,
        }
    }
}

/// POST /enquiries
///
/// Forward a contact-form submission by email.
pub async fn send_enquiry(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<EnquiryRequest>,
) -> AppResult<Json<Value>> {
    let mailer = state
        .mailer
        .as_ref()
        .ok_or_else(|| AppError::InternalError("Enquiry email is not configured".into()))?;

    let enquiry = Enquiry::from(input);
    mailer.send(&enquiry).await?;

    tracing::info!(from = %enquiry.email, "Enquiry sent");
    Ok(Json(json!({ "success": true })))
}
