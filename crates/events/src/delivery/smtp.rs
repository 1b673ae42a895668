//! Enquiry delivery via SMTP.
//!
//! [`SmtpDelivery`] wraps the `lettre` async SMTP transport. The transport
//! and both mailboxes are built once at startup so a misconfigured address
//! fails fast instead of on the first enquiry.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{EmailError, EnquiryMailer};
use crate::enquiry::Enquiry;

pub struct SmtpDelivery {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpDelivery {
    pub fn new(
        host: &str,
        port: u16,
        credentials: Option<(String, String)>,
        from_address: &str,
        to_address: &str,
    ) -> Result<Self, EmailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?.port(port);
        if let Some((user, pass)) = credentials {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        Ok(Self {
            mailer: builder.build(),
            from: from_address.parse()?,
            to: to_address.parse()?,
        })
    }
}

#[async_trait]
impl EnquiryMailer for SmtpDelivery {
    async fn send(&self, enquiry: &Enquiry) -> Result<(), EmailError> {
        let reply_to: Mailbox = enquiry.email.parse()?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .reply_to(reply_to)
            .subject(enquiry.email_subject())
            .header(ContentType::TEXT_PLAIN)
            .body(enquiry.email_body())
            .map_err(|e| EmailError::Build(e.to_string()))?;

        self.mailer.send(email).await?;

        tracing::info!(from = %enquiry.email, "Enquiry email sent via SMTP");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_invalid_sender_address() {
        let result = SmtpDelivery::new("smtp.example.com", 587, None, "not-an-email", "a@b.co");
        assert!(matches!(result, Err(EmailError::Address(_))));
    }
}
