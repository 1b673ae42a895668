//! Email delivery channels for enquiries.

pub mod http_api;
pub mod recording;
pub mod smtp;

use std::sync::Arc;

use async_trait::async_trait;

use crate::enquiry::Enquiry;
use http_api::HttpApiDelivery;
use smtp::SmtpDelivery;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),

    /// The HTTP email API request failed (network, DNS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The HTTP email API returned a non-2xx status.
    #[error("Email API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default HTTP email API endpoint.
const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com/emails";

/// Default sender address when `EMAIL_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "ProgramKing <noreply@programking.app>";

#[derive(Debug, Clone)]
pub enum EmailTransport {
    /// JSON email API authenticated with a bearer key.
    HttpApi { api_url: String, api_key: String },
    Smtp {
        host: String,
        port: u16,
        user: Option<String>,
        password: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Where enquiries are delivered.
    pub to_address: String,
    /// RFC 5322 "From" address.
    pub from_address: String,
    pub transport: EmailTransport,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `ENQUIRY_TO` is not set or neither transport is
    /// configured; enquiries are then rejected as unavailable.
    ///
    /// | Variable        | Required | Default                          |
    /// |-----------------|----------|----------------------------------|
    /// | `ENQUIRY_TO`    | yes      | -                                |
    /// | `EMAIL_FROM`    | no       | `ProgramKing <noreply@...>`      |
    /// | `EMAIL_API_KEY` | one of   | - (selects the HTTP API)         |
    /// | `EMAIL_API_URL` | no       | `https://api.resend.com/emails`  |
    /// | `SMTP_HOST`     | one of   | - (selects SMTP)                 |
    /// | `SMTP_PORT`     | no       | `587`                            |
    /// | `SMTP_USER`     | no       | -                                |
    /// | `SMTP_PASSWORD` | no       | -                                |
    pub fn from_env() -> Option<Self> {
        let to_address = std::env::var("ENQUIRY_TO").ok()?;

        let transport = if let Ok(api_key) = std::env::var("EMAIL_API_KEY") {
            EmailTransport::HttpApi {
                api_url: std::env::var("EMAIL_API_URL")
                    .unwrap_or_else(|_| DEFAULT_EMAIL_API_URL.to_string()),
                api_key,
            }
        } else {
            EmailTransport::Smtp {
                host: std::env::var("SMTP_HOST").ok()?,
                port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_SMTP_PORT),
                user: std::env::var("SMTP_USER").ok(),
                password: std::env::var("SMTP_PASSWORD").ok(),
            }
        };

        Some(Self {
            to_address,
            from_address: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            transport,
        })
    }
}

// ---------------------------------------------------------------------------
// EnquiryMailer
// ---------------------------------------------------------------------------

#[async_trait]
pub trait EnquiryMailer: Send + Sync {
    async fn send(&self, enquiry: &Enquiry) -> Result<(), EmailError>;
}

/// Build the mailer selected by `config.transport`.
pub fn build_mailer(config: EmailConfig) -> Result<Arc<dyn EnquiryMailer>, EmailError> {
    match config.transport.clone() {
        EmailTransport::HttpApi { api_url, api_key } => Ok(Arc::new(HttpApiDelivery::new(
            api_url,
            api_key,
            config.from_address,
            config.to_address,
        )?)),
        EmailTransport::Smtp {
            host,
            port,
            user,
            password,
        } => Ok(Arc::new(SmtpDelivery::new(
            &host,
            port,
            user.zip(password),
            &config.from_address,
            &config.to_address,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_returns_none_without_recipient() {
        std::env::remove_var("ENQUIRY_TO");
        assert!(EmailConfig::from_env().is_none());
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[test]
    fn email_error_display_api() {
        let err = EmailError::Api {
            status: 422,
            body: "invalid from".into(),
        };
        assert_eq!(err.to_string(), "Email API returned HTTP 422: invalid from");
    }
}
