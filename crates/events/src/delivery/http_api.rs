//! Enquiry delivery via a JSON email API.
//!
//! Posts `{from, to, subject, text, reply_to}` with a bearer key, the shape
//! accepted by Resend-compatible providers.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::{EmailError, EnquiryMailer};
use crate::enquiry::Enquiry;

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: String,
    text: String,
    reply_to: &'a str,
}

pub struct HttpApiDelivery {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from_address: String,
    to_address: String,
}

impl HttpApiDelivery {
    pub fn new(
        api_url: String,
        api_key: String,
        from_address: String,
        to_address: String,
    ) -> Result<Self, EmailError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_url,
            api_key,
            from_address,
            to_address,
        })
    }

    fn payload<'a>(&'a self, enquiry: &'a Enquiry) -> SendEmailRequest<'a> {
        SendEmailRequest {
            from: &self.from_address,
            to: [&self.to_address],
            subject: enquiry.email_subject(),
            text: enquiry.email_body(),
            reply_to: &enquiry.email,
        }
    }
}

#[async_trait]
impl EnquiryMailer for HttpApiDelivery {
    async fn send(&self, enquiry: &Enquiry) -> Result<(), EmailError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&self.payload(enquiry))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %body, "Email API rejected enquiry");
            return Err(EmailError::Api {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(from = %enquiry.email, "Enquiry email sent via HTTP API");
        Ok(())
    }
}
